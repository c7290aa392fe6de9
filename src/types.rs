//! Shared boundary types for the reveal experience.
//!
//! This module defines the contracts between layers:
//! - Host → Core: `InputEvent` (discrete user input) and the frame clock.
//! - Core → Host: `Effect` (edge-triggered side requests) and the
//!   `RenderTarget` trait (continuous per-frame outputs).
//!
//! The core never touches a terminal or a GPU; it only talks through
//! these types.

use glam::{Quat, Vec3};

// ---------------------------------------------------------------------------
// Transforms
// ---------------------------------------------------------------------------

/// Position, orientation and scale of one scene object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Pose {
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }
}

/// Camera position and orientation as supplied by the host each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl CameraPose {
    /// World-space forward direction (cameras look down negative Z).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }
}

// ---------------------------------------------------------------------------
// Host → Core
// ---------------------------------------------------------------------------

/// Discrete user input routed into the director.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// The single advance key (Space in the terminal host).
    Trigger,
    /// "Yes" on the gate prompt.
    Yes,
    /// "No" on the gate prompt.
    No,
    /// Pointer entered an interactive object.
    PointerEnter { id: String },
    /// Pointer left an interactive object.
    PointerLeave { id: String },
    /// Pointer click on an interactive object.
    Click { id: String },
    /// Full experience reset back to Idle.
    Reset,
}

// ---------------------------------------------------------------------------
// Core → Host
// ---------------------------------------------------------------------------

/// Edge-triggered side requests emitted by the core.
///
/// Effects are requests, not commands: the host may fail to honor one
/// (no audio device, say) and the core never hears about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start background music, best-effort.
    StartAudio,
    /// Typing finished; show the "press space to continue" hint.
    ShowContinueHint,
    /// Show the yes/no gate prompt.
    ShowGatePrompt,
    /// Reveal the first `count` entries of the no-click message list.
    RevealNoMessage { count: usize },
    /// The reveal timeline has been armed.
    StartScene,
    /// Reveal finished; show the "blow out the candle" hint.
    ShowCandleHint,
    /// The candle went out.
    BlowOutCandle,
    /// Launch the celebration particle burst.
    StartFireworks,
}

/// Render collaborator consumed by the core, implemented by the host.
///
/// Implementations must tolerate ids they do not know yet: an object
/// that is not mounted this tick is skipped, not an error, and picks up
/// the next forwarded value once it appears.
pub trait RenderTarget {
    fn set_transform(&mut self, id: &str, position: Vec3, rotation: Quat, scale: Vec3);
    fn set_visible(&mut self, id: &str, visible: bool);
    fn set_light_intensity(&mut self, name: &str, value: f32);
    fn set_background_opacity(&mut self, value: f32);
}
