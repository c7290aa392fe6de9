//! Focus-Toggle Controller — pick up a frame or card and look at it.
//!
//! Each interactive object owns one controller. The controller's only
//! job is pose targeting: when focused, the target is a camera-relative
//! inspection pose (held at arm's length, clamped above a height floor);
//! otherwise it is the immutable resting pose, lifted slightly while
//! hovered. The actual pose chases the target with frame-rate-independent
//! exponential smoothing, position and rotation at distinct rates.
//!
//! The single-selection invariant lives in `FocusArbiter`: one slot,
//! owned by the director. Controllers never know about each other.

use glam::{EulerRot, Quat, Vec3};

use crate::config::{FocusConfig, ObjectConfig, ObjectKind};
use crate::math::smoothing_alpha;
use crate::types::{CameraPose, Pose};

pub struct FocusController {
    id: String,
    kind: ObjectKind,
    resting: Pose,
    hovered: bool,
    pose: Pose,
}

impl FocusController {
    pub fn new(object: &ObjectConfig) -> Self {
        let resting = Pose::new(
            Vec3::from_array(object.position),
            Quat::from_euler(
                EulerRot::XYZ,
                object.rotation[0],
                object.rotation[1],
                object.rotation[2],
            ),
            Vec3::splat(object.scale),
        );
        Self {
            id: object.id.clone(),
            kind: object.kind,
            resting,
            hovered: false,
            pose: resting,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn resting(&self) -> Pose {
        self.resting
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Pointer entered; focused objects do not re-enter the hover state.
    pub fn pointer_enter(&mut self, focused: bool) {
        if !focused {
            self.hovered = true;
        }
    }

    pub fn pointer_leave(&mut self) {
        self.hovered = false;
    }

    /// Losing focus also clears any stale hover.
    pub fn deactivated(&mut self) {
        self.hovered = false;
    }

    /// The pose this controller is currently steering toward.
    pub fn target_pose(&self, camera: &CameraPose, focused: bool, config: &FocusConfig) -> Pose {
        if focused {
            let tuning = config.tuning(self.kind);
            let mut position = camera.position + camera.forward() * tuning.camera_distance;
            position.y -= tuning.down_offset;
            if position.y < tuning.height_floor {
                position.y = tuning.height_floor;
            }
            let offset = Quat::from_euler(
                EulerRot::XYZ,
                tuning.rotation_offset[0],
                tuning.rotation_offset[1],
                tuning.rotation_offset[2],
            );
            Pose::new(position, camera.rotation * offset, Vec3::ONE)
        } else {
            let mut position = self.resting.position;
            if self.hovered {
                position.y += config.hover_lift;
            }
            Pose::new(position, self.resting.rotation, self.resting.scale)
        }
    }

    /// Advance the animated pose one frame and return it.
    pub fn update(
        &mut self,
        dt: f32,
        camera: &CameraPose,
        focused: bool,
        config: &FocusConfig,
    ) -> Pose {
        let target = self.target_pose(camera, focused, config);
        let pos_alpha = smoothing_alpha(config.position_rate, dt);
        let rot_alpha = smoothing_alpha(config.rotation_rate, dt);
        let scale_alpha = smoothing_alpha(config.scale_rate, dt);

        self.pose.position = self.pose.position.lerp(target.position, pos_alpha);
        self.pose.rotation = self.pose.rotation.slerp(target.rotation, rot_alpha);
        self.pose.scale = self.pose.scale.lerp(target.scale, scale_alpha);
        self.pose
    }
}

// ---------------------------------------------------------------------------
// Single-slot focus arbitration
// ---------------------------------------------------------------------------

/// At most one object is focused across the whole set. The slot holds
/// the active id; toggling a new id in evicts the previous holder.
#[derive(Debug, Default)]
pub struct FocusArbiter {
    active: Option<String>,
}

impl FocusArbiter {
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.as_deref() == Some(id)
    }

    /// Toggle `id`: focus it (returning the evicted previous holder) or,
    /// if it already held the slot, clear it (returning `id` itself).
    pub fn toggle(&mut self, id: &str) -> Option<String> {
        if self.is_active(id) {
            self.active.take()
        } else {
            self.active.replace(id.to_string())
        }
    }

    pub fn clear(&mut self) -> Option<String> {
        self.active.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn frame(id: &str) -> FocusController {
        FocusController::new(&ObjectConfig {
            id: id.into(),
            kind: ObjectKind::Frame,
            position: [0.0, 0.735, 3.0],
            rotation: [0.0, 5.6, 0.0],
            scale: 0.75,
        })
    }

    fn camera_at(position: Vec3, rotation: Quat) -> CameraPose {
        CameraPose { position, rotation }
    }

    #[test]
    fn arbiter_holds_at_most_one_id() {
        let mut slot = FocusArbiter::default();
        assert_eq!(slot.toggle("a"), None);
        assert!(slot.is_active("a"));

        // Focusing B evicts A in the same operation.
        let evicted = slot.toggle("b");
        assert_eq!(evicted.as_deref(), Some("a"));
        assert!(slot.is_active("b"));
        assert!(!slot.is_active("a"));

        // Toggling the holder clears the slot.
        let evicted = slot.toggle("b");
        assert_eq!(evicted.as_deref(), Some("b"));
        assert_eq!(slot.active(), None);
    }

    #[test]
    fn focused_height_never_drops_below_the_floor() {
        let ctrl = frame("f");
        let config = FocusConfig::default();
        // Camera low and pitched straight down.
        let camera = camera_at(Vec3::new(0.0, 1.0, 0.0), Quat::from_rotation_x(-PI / 2.0));
        let target = ctrl.target_pose(&camera, true, &config);
        assert_eq!(target.position.y, config.frame.height_floor);
    }

    #[test]
    fn focused_target_sits_ahead_of_the_camera() {
        let ctrl = frame("f");
        let config = FocusConfig::default();
        // Identity rotation looks down -Z.
        let camera = camera_at(Vec3::new(0.0, 2.0, 5.0), Quat::IDENTITY);
        let target = ctrl.target_pose(&camera, true, &config);
        assert!((target.position.z - (5.0 - config.frame.camera_distance)).abs() < 1e-5);
        assert!((target.position.y - (2.0 - config.frame.down_offset)).abs() < 1e-5);
        assert_eq!(target.scale, Vec3::ONE);
    }

    #[test]
    fn hover_lifts_the_resting_pose() {
        let mut ctrl = frame("f");
        let config = FocusConfig::default();
        let camera = camera_at(Vec3::ZERO, Quat::IDENTITY);

        ctrl.pointer_enter(false);
        let target = ctrl.target_pose(&camera, false, &config);
        assert!((target.position.y - (0.735 + config.hover_lift)).abs() < 1e-6);

        ctrl.pointer_leave();
        let target = ctrl.target_pose(&camera, false, &config);
        assert!((target.position.y - 0.735).abs() < 1e-6);
    }

    #[test]
    fn focused_objects_do_not_hover() {
        let mut ctrl = frame("f");
        ctrl.pointer_enter(true);
        assert!(!ctrl.is_hovered());
        ctrl.pointer_enter(false);
        assert!(ctrl.is_hovered());
        ctrl.deactivated();
        assert!(!ctrl.is_hovered());
    }

    #[test]
    fn update_converges_on_the_target() {
        let mut ctrl = frame("f");
        let config = FocusConfig::default();
        let camera = camera_at(Vec3::new(0.0, 2.0, 5.0), Quat::IDENTITY);
        let target = ctrl.target_pose(&camera, true, &config);

        for _ in 0..300 {
            ctrl.update(1.0 / 60.0, &camera, true, &config);
        }
        let pose = ctrl.pose();
        assert!(pose.position.distance(target.position) < 1e-3);
        assert!(pose.scale.distance(Vec3::ONE) < 1e-3);

        // Releasing focus steers back toward rest.
        for _ in 0..300 {
            ctrl.update(1.0 / 60.0, &camera, false, &config);
        }
        let pose = ctrl.pose();
        assert!(pose.position.distance(ctrl.resting().position) < 1e-3);
        assert!(pose.scale.distance(ctrl.resting().scale) < 1e-3);
    }
}
