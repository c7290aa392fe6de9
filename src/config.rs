//! Experience configuration — the human-authored semantic input.
//!
//! One consolidated structure holding everything that was previously a
//! scattered constant: the typed script, gate messages, the timeline
//! schedule, object resting poses, focus tuning, camera orbit and light
//! levels. Loaded from JSON at startup and never mutated at runtime;
//! `ExperienceConfig::default()` is the stock birthday experience.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceConfig {
    pub script: ScriptConfig,
    pub gate: GateConfig,
    pub timeline: TimelineConfig,
    pub objects: Vec<ObjectConfig>,
    pub focus: FocusConfig,
    pub camera: CameraConfig,
    pub lighting: LightingConfig,
}

impl Default for ExperienceConfig {
    fn default() -> Self {
        Self {
            script: ScriptConfig::default(),
            gate: GateConfig::default(),
            timeline: TimelineConfig::default(),
            objects: default_objects(),
            focus: FocusConfig::default(),
            camera: CameraConfig::default(),
            lighting: LightingConfig::default(),
        }
    }
}

impl ExperienceConfig {
    /// Report configuration values the defined edge-case policies will
    /// have to absorb (empty script, degenerate windows). These are
    /// warnings, not errors: the core handles all of them.
    pub fn lint(&self) -> Vec<String> {
        let mut notes = Vec::new();
        if self.script.lines.iter().all(|l| l.is_empty()) {
            notes.push("script has no typable text; typing completes immediately".into());
        }
        let t = &self.timeline;
        for (name, d) in [
            ("cake_descent_secs", t.cake_descent_secs),
            ("table_slide_secs", t.table_slide_secs),
            ("candle_drop_secs", t.candle_drop_secs),
            ("background_fade_secs", t.background_fade_secs),
        ] {
            if d <= 0.0 {
                notes.push(format!("{name} is not positive; window degrades to a step"));
            }
        }
        if self.gate.no_messages.is_empty() {
            notes.push("no_messages is empty; the \"no\" control is hidden from the start".into());
        }
        let mut ids: Vec<&str> = self.objects.iter().map(|o| o.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        if ids.len() != self.objects.len() {
            notes.push("duplicate object ids; focus toggles will hit the first match".into());
        }
        notes
    }
}

// ---------------------------------------------------------------------------
// Typing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    /// Typed greeting, one entry per line. Empty strings are paragraph
    /// breaks and are never partially typed.
    pub lines: Vec<String>,
    /// Delay between typed characters, milliseconds.
    pub char_delay_ms: u64,
    /// Pause after the last character before the continue hint, ms.
    pub post_typing_delay_ms: u64,
    /// Cursor blink half-period, milliseconds.
    pub cursor_blink_ms: u64,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            lines: [
                "✨ hi ✨",
                "",
                "💝 today is your birthday 💝",
                "",
                "🎂 so i made you this",
                "hope you like it 🎁",
                "",
                "💖 ٩(◕‿◕)۶ 💖",
            ]
            .map(String::from)
            .to_vec(),
            char_delay_ms: 100,
            post_typing_delay_ms: 1000,
            cursor_blink_ms: 480,
        }
    }
}

// ---------------------------------------------------------------------------
// Gate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub question: String,
    /// Messages revealed one per "no" click. When all are shown the
    /// "no" control disappears, leaving only "yes".
    pub no_messages: Vec<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            question: "Are you ready for what's next?".into(),
            no_messages: [
                "please click yes 🥺",
                "kok kamu ga siap?",
                "ayolah... 🥺",
                "please please please 🙏",
                "tombol no nya aku ilangin dehh biar yes aja 😤",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

// ---------------------------------------------------------------------------
// Timeline schedule
// ---------------------------------------------------------------------------

/// Constants defining the reveal choreography. Window offsets are derived
/// from these (see `timeline::Schedule`), never configured directly, so
/// the cross-window constraints (the table finishing slightly before the
/// candle drops) always hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub cake_start_y: f64,
    pub cake_end_y: f64,
    pub cake_descent_secs: f64,

    pub table_start_z: f64,
    pub table_end_z: f64,
    pub table_slide_secs: f64,
    /// Gap between the table arriving and the cake descent ending.
    pub table_lead_gap_secs: f64,

    pub candle_start_y: f64,
    pub candle_end_y: f64,
    pub candle_drop_secs: f64,
    /// Pause after both cake and table settle before the candle drops.
    pub candle_drop_delay_secs: f64,

    pub background_fade_secs: f64,
    /// How far before the candle drop the fade should finish.
    pub background_fade_offset_secs: f64,

    /// Minimum change in opacity/progress worth emitting downstream.
    pub emit_epsilon: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            cake_start_y: 10.0,
            cake_end_y: 0.0,
            cake_descent_secs: 3.0,
            table_start_z: 30.0,
            table_end_z: 0.0,
            table_slide_secs: 0.7,
            table_lead_gap_secs: 0.1,
            candle_start_y: 5.0,
            candle_end_y: 0.0,
            candle_drop_secs: 1.2,
            candle_drop_delay_secs: 1.0,
            background_fade_secs: 1.0,
            background_fade_offset_secs: 0.0,
            emit_epsilon: 0.005,
        }
    }
}

// ---------------------------------------------------------------------------
// Interactive objects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// Framed photo; inspected at arm's length with a corrective tilt.
    Frame,
    /// Flat card; inspected close up, facing the camera squarely.
    Card,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectConfig {
    pub id: String,
    pub kind: ObjectKind,
    /// Resting position, world space.
    pub position: [f32; 3],
    /// Resting orientation as XYZ Euler angles, radians.
    pub rotation: [f32; 3],
    #[serde(default = "default_scale")]
    pub scale: f32,
}

fn default_scale() -> f32 {
    1.0
}

fn default_objects() -> Vec<ObjectConfig> {
    let frame = |id: &str, position: [f32; 3], yaw: f32, scale: f32| ObjectConfig {
        id: id.into(),
        kind: ObjectKind::Frame,
        position,
        rotation: [0.0, yaw, 0.0],
        scale,
    };
    vec![
        frame("frame1", [0.0, 0.735, 3.0], 5.6, 0.75),
        frame("frame2", [0.0, 0.735, -3.0], 4.0, 0.75),
        frame("frame3", [-1.5, 0.735, 2.5], 5.4, 0.75),
        frame("frame4", [-1.5, 0.735, -2.5], 4.2, 0.75),
        frame("cake_frame", [0.0, 0.45, 0.42], 0.0, 0.25),
        ObjectConfig {
            id: "confetti_card".into(),
            kind: ObjectKind::Card,
            position: [1.0, 0.081, -2.0],
            rotation: [-PI / 2.0, 0.0, PI / 3.0],
            scale: 1.0,
        },
    ]
}

// ---------------------------------------------------------------------------
// Focus tuning
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusTuning {
    /// Distance from the camera to hold the object when focused.
    pub camera_distance: f32,
    /// Fixed downward offset from the camera-relative point.
    pub down_offset: f32,
    /// Focused height never drops below this, however steeply the
    /// camera points down.
    pub height_floor: f32,
    /// Corrective rotation (XYZ Euler, radians) composed onto the camera
    /// orientation so the object faces the viewer straight.
    pub rotation_offset: [f32; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    pub frame: FocusTuning,
    pub card: FocusTuning,
    /// Lift applied to the resting pose while hovered.
    pub hover_lift: f32,
    /// Exponential smoothing rates (per second).
    pub position_rate: f32,
    pub rotation_rate: f32,
    pub scale_rate: f32,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            frame: FocusTuning {
                camera_distance: 1.8,
                down_offset: 0.05,
                height_floor: 0.8,
                rotation_offset: [0.475, PI, 0.0],
            },
            card: FocusTuning {
                camera_distance: 0.9,
                down_offset: 0.05,
                height_floor: 0.8,
                rotation_offset: [0.0, 0.0, 0.0],
            },
            hover_lift: 0.04,
            position_rate: 12.0,
            rotation_rate: 10.0,
            scale_rate: 12.0,
        }
    }
}

impl Default for FocusTuning {
    fn default() -> Self {
        FocusConfig::default().frame
    }
}

impl FocusConfig {
    pub fn tuning(&self, kind: ObjectKind) -> &FocusTuning {
        match kind {
            ObjectKind::Frame => &self.frame,
            ObjectKind::Card => &self.card,
        }
    }
}

// ---------------------------------------------------------------------------
// Camera + lighting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub target: [f32; 3],
    pub radius: f32,
    pub height: f32,
    pub azimuth: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            target: [0.0, 1.0, 0.0],
            radius: 3.0,
            height: 1.0,
            azimuth: PI / 2.0,
            min_distance: 2.0,
            max_distance: 8.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub ambient_name: String,
    /// Ambient intensity at zero environment progress.
    pub ambient_max: f32,
    pub environment_name: String,
    pub environment_scale: f32,
    pub background_name: String,
    pub background_scale: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_name: "ambient".into(),
            ambient_max: 0.8,
            environment_name: "environment".into(),
            environment_scale: 0.1,
            background_name: "background".into(),
            background_scale: 0.05,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_json() {
        let config = ExperienceConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: ExperienceConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.script.lines, config.script.lines);
        assert_eq!(back.objects.len(), config.objects.len());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: ExperienceConfig =
            serde_json::from_str(r#"{"script": {"char_delay_ms": 50}}"#).unwrap();
        assert_eq!(config.script.char_delay_ms, 50);
        assert_eq!(config.script.post_typing_delay_ms, 1000);
        assert_eq!(config.objects.len(), 6);
    }

    #[test]
    fn lint_flags_degenerate_windows() {
        let mut config = ExperienceConfig::default();
        config.timeline.table_slide_secs = 0.0;
        config.script.lines = vec![String::new()];
        let notes = config.lint();
        assert!(notes.iter().any(|n| n.contains("table_slide_secs")));
        assert!(notes.iter().any(|n| n.contains("typable")));
    }
}
