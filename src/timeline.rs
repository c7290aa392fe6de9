//! Timeline Animation Engine — the reveal choreography.
//!
//! Maps a single elapsed-time scalar, each frame, to per-object transform
//! values and lighting scalars via a fixed schedule of overlapping
//! windows. The engine understands time and easing; it never deals with
//! terminals, cameras, or user input.
//!
//! State is an explicit typed record (`start`, `completed`, `notified`),
//! and each tick returns plain data: the computed scene plus any emitted
//! signals. No callbacks, no ambient flags.

use crate::config::TimelineConfig;
use crate::math::{clamp, ease_out_cubic, lerp};

const TAU: f64 = std::f64::consts::TAU;

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

/// One sub-animation window measured from the animation start instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    pub start: f64,
    pub duration: f64,
}

impl Window {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// Local progress in `[0, 1]`: 0 before the window opens, 1 after it
    /// closes. A zero-or-negative duration degrades to an instantaneous
    /// step at the window's offset.
    pub fn progress(&self, elapsed: f64) -> f64 {
        if self.duration <= 0.0 {
            return if elapsed >= self.start { 1.0 } else { 0.0 };
        }
        clamp((elapsed - self.start) / self.duration, 0.0, 1.0)
    }
}

/// The full reveal schedule, derived once from configuration.
///
/// Offsets are computed, not configured, so the cross-window constraints
/// hold for any timing values: the table arrives `table_lead_gap_secs`
/// before the cake settles, and the candle drops only after both.
#[derive(Debug, Clone)]
pub struct Schedule {
    pub cake_descent: Window,
    pub table_slide: Window,
    pub candle_drop: Window,
    pub background_fade: Window,
    pub total: f64,
    config: TimelineConfig,
}

impl Schedule {
    pub fn new(config: TimelineConfig) -> Self {
        let cake_descent = Window {
            start: 0.0,
            duration: config.cake_descent_secs,
        };
        let table_slide = Window {
            start: config.cake_descent_secs - config.table_slide_secs - config.table_lead_gap_secs,
            duration: config.table_slide_secs,
        };
        let candle_drop = Window {
            start: cake_descent.end().max(table_slide.end()) + config.candle_drop_delay_secs,
            duration: config.candle_drop_secs,
        };
        let fade_end = (candle_drop.start - config.background_fade_offset_secs)
            .max(config.background_fade_secs);
        let background_fade = Window {
            start: (fade_end - config.background_fade_secs).max(0.0),
            duration: config.background_fade_secs,
        };
        let total = candle_drop.end();
        Self {
            cake_descent,
            table_slide,
            candle_drop,
            background_fade,
            total,
            config,
        }
    }
}

// ---------------------------------------------------------------------------
// Per-tick output
// ---------------------------------------------------------------------------

/// Computed scene values for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneState {
    pub cake_y: f64,
    /// Cake yaw in radians; one full turn over the descent.
    pub cake_spin: f64,
    pub table_z: f64,
    pub candle_y: f64,
    pub candle_visible: bool,
    pub background_opacity: f64,
    pub environment_progress: f64,
}

/// Everything one tick produces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineTick {
    pub scene: SceneState,
    /// Background opacity, only when it moved more than the epsilon.
    pub opacity_emit: Option<f64>,
    /// Environment progress, only when it moved more than the epsilon.
    pub progress_emit: Option<f64>,
    /// One-shot completion event; fires exactly once per play cycle.
    pub completed_event: bool,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct Timeline {
    schedule: Schedule,
    /// Clock value captured on the first playing tick; the schedule is
    /// measured from here, not from construction time.
    start: Option<f64>,
    completed: bool,
    notified: bool,
    last_opacity: f64,
    last_progress: f64,
}

impl Timeline {
    pub fn new(config: TimelineConfig) -> Self {
        Self {
            schedule: Schedule::new(config),
            start: None,
            completed: false,
            notified: false,
            last_opacity: 1.0,
            last_progress: 0.0,
        }
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Advance one frame.
    ///
    /// While `is_playing` is false the engine forces opacity 1 and
    /// progress 0 and clears its run state, so toggling playback back on
    /// always begins a fresh run. Once the clamped elapsed time reaches
    /// the schedule total, every attribute snaps to its exact end value
    /// and the completion event fires exactly once; all later ticks are
    /// idempotent.
    pub fn tick(&mut self, is_playing: bool, clock: f64) -> TimelineTick {
        if !is_playing {
            self.start = None;
            self.completed = false;
            self.notified = false;
            return TimelineTick {
                scene: self.rest_scene(),
                opacity_emit: self.gate_opacity(1.0),
                progress_emit: self.gate_progress(0.0),
                completed_event: false,
            };
        }

        if self.completed {
            let completed_event = !self.notified;
            self.notified = true;
            return TimelineTick {
                scene: self.end_scene(),
                opacity_emit: self.gate_opacity(0.0),
                progress_emit: self.gate_progress(1.0),
                completed_event,
            };
        }

        let start = *self.start.get_or_insert(clock);
        let elapsed = clamp(clock - start, 0.0, self.schedule.total);

        if elapsed >= self.schedule.total {
            self.completed = true;
            let completed_event = !self.notified;
            self.notified = true;
            if completed_event {
                log::debug!("reveal timeline completed after {:.2}s", self.schedule.total);
            }
            return TimelineTick {
                scene: self.end_scene(),
                opacity_emit: self.gate_opacity(0.0),
                progress_emit: self.gate_progress(1.0),
                completed_event,
            };
        }

        let scene = self.scene_at(elapsed);
        TimelineTick {
            scene,
            opacity_emit: self.gate_opacity(scene.background_opacity),
            progress_emit: self.gate_progress(scene.environment_progress),
            completed_event: false,
        }
    }

    fn scene_at(&self, elapsed: f64) -> SceneState {
        let c = &self.schedule.config;

        let cake_ease = ease_out_cubic(self.schedule.cake_descent.progress(elapsed));
        let cake_y = lerp(c.cake_start_y, c.cake_end_y, cake_ease);
        let cake_spin = cake_ease * TAU;

        // Before its window opens the table holds the window's start value.
        let table_ease = ease_out_cubic(self.schedule.table_slide.progress(elapsed));
        let table_z = lerp(c.table_start_z, c.table_end_z, table_ease);

        let candle_visible = elapsed >= self.schedule.candle_drop.start;
        let candle_ease = ease_out_cubic(self.schedule.candle_drop.progress(elapsed));
        let candle_y = lerp(c.candle_start_y, c.candle_end_y, candle_ease);

        let (background_opacity, environment_progress) =
            if elapsed < self.schedule.background_fade.start {
                (1.0, 0.0)
            } else {
                let eased = ease_out_cubic(self.schedule.background_fade.progress(elapsed));
                (1.0 - eased, eased)
            };

        SceneState {
            cake_y,
            cake_spin,
            table_z,
            candle_y,
            candle_visible,
            background_opacity,
            environment_progress,
        }
    }

    /// Scene before any run: everything primed at its start value.
    fn rest_scene(&self) -> SceneState {
        let c = &self.schedule.config;
        SceneState {
            cake_y: c.cake_start_y,
            cake_spin: 0.0,
            table_z: c.table_start_z,
            candle_y: c.candle_start_y,
            candle_visible: false,
            background_opacity: 1.0,
            environment_progress: 0.0,
        }
    }

    /// Exact end values; the full cake turn lands back at spin zero.
    fn end_scene(&self) -> SceneState {
        let c = &self.schedule.config;
        SceneState {
            cake_y: c.cake_end_y,
            cake_spin: 0.0,
            table_z: c.table_end_z,
            candle_y: c.candle_end_y,
            candle_visible: true,
            background_opacity: 0.0,
            environment_progress: 1.0,
        }
    }

    fn gate_opacity(&mut self, value: f64) -> Option<f64> {
        let value = clamp(value, 0.0, 1.0);
        if (value - self.last_opacity).abs() > self.schedule.config.emit_epsilon {
            self.last_opacity = value;
            Some(value)
        } else {
            None
        }
    }

    fn gate_progress(&mut self, value: f64) -> Option<f64> {
        let value = clamp(value, 0.0, 1.0);
        if (value - self.last_progress).abs() > self.schedule.config.emit_epsilon {
            self.last_progress = value;
            Some(value)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimelineConfig;

    fn timeline() -> Timeline {
        Timeline::new(TimelineConfig::default())
    }

    #[test]
    fn schedule_offsets_match_the_stock_choreography() {
        let s = Schedule::new(TimelineConfig::default());
        assert_eq!(s.cake_descent.end(), 3.0);
        assert!((s.table_slide.start - 2.2).abs() < 1e-9);
        assert!((s.candle_drop.start - 4.0).abs() < 1e-9);
        assert!((s.total - 5.2).abs() < 1e-9);
        // Fade finishes exactly when the candle drop begins.
        assert!((s.background_fade.end() - s.candle_drop.start).abs() < 1e-9);
    }

    #[test]
    fn not_playing_forces_idle_outputs() {
        let mut tl = timeline();
        let tick = tl.tick(false, 123.0);
        assert_eq!(tick.scene.background_opacity, 1.0);
        assert_eq!(tick.scene.environment_progress, 0.0);
        assert!(!tick.completed_event);
        // Cake primed at its start height, candle hidden.
        assert_eq!(tick.scene.cake_y, 10.0);
        assert!(!tick.scene.candle_visible);
    }

    #[test]
    fn start_is_captured_lazily() {
        let mut tl = timeline();
        tl.tick(false, 50.0);
        let tick = tl.tick(true, 100.0);
        // First playing tick is elapsed zero, not elapsed 100.
        assert_eq!(tick.scene.cake_y, 10.0);
        let tick = tl.tick(true, 101.5);
        assert!(tick.scene.cake_y < 10.0 && tick.scene.cake_y > 0.0);
    }

    #[test]
    fn table_holds_start_value_before_its_window() {
        let mut tl = timeline();
        tl.tick(true, 0.0);
        let tick = tl.tick(true, 1.0);
        assert_eq!(tick.scene.table_z, 30.0);
        let tick = tl.tick(true, 2.5);
        assert!(tick.scene.table_z < 30.0);
    }

    #[test]
    fn candle_becomes_visible_when_its_window_opens() {
        let mut tl = timeline();
        tl.tick(true, 0.0);
        assert!(!tl.tick(true, 3.9).scene.candle_visible);
        let tick = tl.tick(true, 4.1);
        assert!(tick.scene.candle_visible);
        assert!(tick.scene.candle_y < 5.0);
    }

    #[test]
    fn completion_fires_exactly_once_and_snaps_end_values() {
        let mut tl = timeline();
        tl.tick(true, 10.0);
        let tick = tl.tick(true, 20.0);
        assert!(tick.completed_event);
        assert_eq!(tick.scene.cake_y, 0.0);
        assert_eq!(tick.scene.cake_spin, 0.0);
        assert_eq!(tick.scene.table_z, 0.0);
        assert_eq!(tick.scene.candle_y, 0.0);
        assert!(tick.scene.candle_visible);
        assert_eq!(tick.scene.background_opacity, 0.0);
        assert_eq!(tick.scene.environment_progress, 1.0);

        for i in 0..10 {
            let tick = tl.tick(true, 21.0 + i as f64);
            assert!(!tick.completed_event, "duplicate completion event");
            assert_eq!(tick.scene.background_opacity, 0.0);
            assert_eq!(tick.scene.environment_progress, 1.0);
        }
        assert!(tl.is_completed());
    }

    #[test]
    fn interrupting_playback_resets_the_run() {
        let mut tl = timeline();
        tl.tick(true, 0.0);
        tl.tick(true, 2.0);
        tl.tick(false, 3.0);
        // Restart: elapsed counts from the new start instant.
        let tick = tl.tick(true, 10.0);
        assert_eq!(tick.scene.cake_y, 10.0);
        assert!(!tl.is_completed());
        // A restarted run can complete (and notify) again.
        let tick = tl.tick(true, 30.0);
        assert!(tick.completed_event);
    }

    #[test]
    fn emissions_are_epsilon_gated() {
        let mut tl = timeline();
        tl.tick(true, 0.0);
        // Before the fade window nothing changed from the initial 1/0.
        let tick = tl.tick(true, 1.0);
        assert_eq!(tick.opacity_emit, None);
        assert_eq!(tick.progress_emit, None);
        // Deep inside the fade both signals move.
        let tick = tl.tick(true, 3.6);
        assert!(tick.opacity_emit.is_some());
        assert!(tick.progress_emit.is_some());
        // A negligible step does not re-emit.
        let tick = tl.tick(true, 3.6001);
        assert_eq!(tick.opacity_emit, None);
    }

    #[test]
    fn zero_duration_window_steps() {
        let mut config = TimelineConfig::default();
        config.table_slide_secs = 0.0;
        let mut tl = Timeline::new(config);
        tl.tick(true, 0.0);
        let before = tl.tick(true, 2.0).scene.table_z;
        assert_eq!(before, 30.0);
        let after = tl.tick(true, 2.95).scene.table_z;
        assert_eq!(after, 0.0);
    }
}
