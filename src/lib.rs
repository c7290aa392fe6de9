//! birthday-reveal — a scripted, time-driven reveal experience.
//!
//! A typed greeting, a yes/no gate, a choreographed reveal (cake
//! descending onto a sliding table while the lighting crossfades), and
//! afterwards a couple of user-triggered interactions: blowing out the
//! candle, picking up photos and cards for a close look.
//!
//! The crate is split into a pure, deterministic core and a thin
//! presentation layer:
//! - `math`, `timeline`, `typewriter`, `phase`, `focus` — state machines
//!   and interpolation, testable with no terminal or clock.
//! - `director` — the orchestrator wiring the core together behind the
//!   `InputEvent`/`Effect`/`RenderTarget` boundary in `types`.
//! - `config` — the consolidated, JSON-loadable experience script.
//! - `host` — the crossterm front end that drives the director.

pub mod config;
pub mod director;
pub mod focus;
pub mod host;
pub mod math;
pub mod phase;
pub mod timeline;
pub mod types;
pub mod typewriter;
