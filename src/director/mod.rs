//! Director — the runtime orchestration controller.
//!
//! Owns every piece of core state (phase machine, typewriter, timeline,
//! focus arbitration) and wires them together. The host feeds it input
//! events and one clock tick per frame; it feeds back edge-triggered
//! `Effect`s and forwards continuous values to the `RenderTarget`.
//!
//! Per-tick ordering is part of the contract: the phase machine's gating
//! is read first, the timeline runs against it, the timeline's completion
//! event is applied to the phase machine, and only then are that tick's
//! values forwarded — a consumer never observes a completion signal
//! paired with stale pre-completion transforms.

use glam::{Quat, Vec3};

use crate::config::ExperienceConfig;
use crate::focus::{FocusArbiter, FocusController};
use crate::phase::{Phase, PhaseInput, PhaseMachine};
use crate::timeline::{Timeline, TimelineTick};
use crate::types::{CameraPose, Effect, InputEvent, RenderTarget};
use crate::typewriter::Typewriter;

/// Ids of the choreographed (non-interactive) scene objects.
pub const CAKE_ID: &str = "cake";
pub const TABLE_ID: &str = "table";
pub const CANDLE_ID: &str = "candle";

pub struct Director {
    config: ExperienceConfig,
    phase: PhaseMachine,
    typewriter: Typewriter,
    timeline: Timeline,
    arbiter: FocusArbiter,
    objects: Vec<FocusController>,
}

impl Director {
    pub fn new(config: ExperienceConfig) -> Self {
        let typewriter = Typewriter::new(
            config.script.lines.clone(),
            config.script.char_delay_ms as f64 / 1000.0,
            config.script.post_typing_delay_ms as f64 / 1000.0,
            config.script.cursor_blink_ms as f64 / 1000.0,
        );
        let timeline = Timeline::new(config.timeline.clone());
        let phase = PhaseMachine::new(config.gate.no_messages.len());
        let objects = config.objects.iter().map(FocusController::new).collect();
        Self {
            config,
            phase,
            typewriter,
            timeline,
            arbiter: FocusArbiter::default(),
            objects,
        }
    }

    pub fn config(&self) -> &ExperienceConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase.phase()
    }

    pub fn typewriter(&self) -> &Typewriter {
        &self.typewriter
    }

    pub fn candle_lit(&self) -> bool {
        self.phase.candle_lit()
    }

    pub fn fireworks_active(&self) -> bool {
        self.phase.fireworks_active()
    }

    pub fn no_click_count(&self) -> usize {
        self.phase.no_click_count()
    }

    pub fn no_control_visible(&self) -> bool {
        self.phase.no_control_visible()
    }

    pub fn active_object(&self) -> Option<&str> {
        self.arbiter.active()
    }

    pub fn objects(&self) -> &[FocusController] {
        &self.objects
    }

    /// Route one discrete input event.
    pub fn handle_event(&mut self, event: InputEvent) -> Vec<Effect> {
        match event {
            InputEvent::Trigger => self.phase.apply(PhaseInput::Trigger),
            InputEvent::Yes => self.phase.apply(PhaseInput::Yes),
            InputEvent::No => self.phase.apply(PhaseInput::No),
            InputEvent::PointerEnter { id } => {
                if self.phase.allows_focus() {
                    let focused = self.arbiter.is_active(&id);
                    if let Some(ctrl) = self.controller_mut(&id) {
                        ctrl.pointer_enter(focused);
                    }
                }
                Vec::new()
            }
            InputEvent::PointerLeave { id } => {
                if let Some(ctrl) = self.controller_mut(&id) {
                    ctrl.pointer_leave();
                }
                Vec::new()
            }
            InputEvent::Click { id } => {
                if self.phase.allows_focus() && self.objects.iter().any(|o| o.id() == id) {
                    if let Some(prev) = self.arbiter.toggle(&id) {
                        // Covers both eviction and toggling the holder off.
                        if let Some(ctrl) = self.controller_mut(&prev) {
                            ctrl.deactivated();
                        }
                    }
                }
                Vec::new()
            }
            InputEvent::Reset => {
                self.reset();
                Vec::new()
            }
        }
    }

    /// Advance one frame: `now` is the monotonic elapsed-time clock,
    /// `dt` the frame delta, `camera` the current camera pose.
    pub fn tick(
        &mut self,
        now: f64,
        dt: f32,
        camera: &CameraPose,
        target: &mut dyn RenderTarget,
    ) -> Vec<Effect> {
        let mut effects = Vec::new();

        if self.phase.phase() == Phase::Typing {
            let tw = self.typewriter.tick(now);
            if tw.ready {
                effects.extend(self.phase.apply(PhaseInput::TypingReady));
            }
        }

        let is_playing = self.phase.is_playing();
        let tl = self.timeline.tick(is_playing, now);
        if tl.completed_event {
            effects.extend(self.phase.apply(PhaseInput::SceneFinished));
        }

        self.forward_scene(&tl, target);

        for ctrl in &mut self.objects {
            let focused = self.arbiter.is_active(ctrl.id());
            let pose = ctrl.update(dt, camera, focused, &self.config.focus);
            target.set_transform(ctrl.id(), pose.position, pose.rotation, pose.scale);
        }

        effects
    }

    /// Full experience reset back to Idle. Pending deadlines die with it;
    /// the timeline clears itself on its next non-playing tick.
    pub fn reset(&mut self) {
        log::debug!("experience reset");
        self.phase.reset();
        self.typewriter.reset();
        if let Some(prev) = self.arbiter.clear() {
            if let Some(ctrl) = self.controller_mut(&prev) {
                ctrl.deactivated();
            }
        }
    }

    fn controller_mut(&mut self, id: &str) -> Option<&mut FocusController> {
        self.objects.iter_mut().find(|o| o.id() == id)
    }

    fn forward_scene(&self, tick: &TimelineTick, target: &mut dyn RenderTarget) {
        let scene = &tick.scene;
        target.set_transform(
            CAKE_ID,
            Vec3::new(0.0, scene.cake_y as f32, 0.0),
            Quat::from_rotation_y(scene.cake_spin as f32),
            Vec3::ONE,
        );
        target.set_transform(
            TABLE_ID,
            Vec3::new(0.0, 0.0, scene.table_z as f32),
            Quat::IDENTITY,
            Vec3::ONE,
        );
        target.set_transform(
            CANDLE_ID,
            Vec3::new(0.0, scene.candle_y as f32, 0.0),
            Quat::IDENTITY,
            Vec3::ONE,
        );
        target.set_visible(CANDLE_ID, scene.candle_visible);

        if let Some(progress) = tick.progress_emit {
            let progress = progress as f32;
            let lighting = &self.config.lighting;
            target.set_light_intensity(&lighting.ambient_name, (1.0 - progress) * lighting.ambient_max);
            target.set_light_intensity(
                &lighting.environment_name,
                lighting.environment_scale * progress,
            );
            target.set_light_intensity(
                &lighting.background_name,
                lighting.background_scale * progress,
            );
        }
        if let Some(opacity) = tick.opacity_emit {
            target.set_background_opacity(opacity as f32);
        }
    }
}
