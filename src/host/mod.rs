//! Host — the terminal presentation layer.
//!
//! Everything the core computes is visualized here and nowhere else:
//! the typed overlay, the gate prompt, the hints, and a live readout of
//! the 3D scene state (transforms, lighting, background opacity). The
//! host owns the frame clock (an `Instant` plus the event-poll timeout),
//! the orbit camera, and the keyboard mapping; it implements
//! `RenderTarget` over a retained `SceneView` so a value forwarded once
//! stays visible until the core forwards a new one.

use std::collections::HashMap;
use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use crossterm::{cursor, event, execute, queue, style, terminal};
use glam::{Mat4, Quat, Vec3};

use crate::director::{Director, CAKE_ID, CANDLE_ID, TABLE_ID};
use crate::phase::Phase;
use crate::types::{CameraPose, Effect, InputEvent, RenderTarget};

/// Target frame interval for the event-poll timeout (~60 fps).
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

const MIN_TERM_WIDTH: u16 = 72;
const MIN_TERM_HEIGHT: u16 = 24;

const ORBIT_STEP: f32 = 0.1;
const HEIGHT_STEP: f32 = 0.25;
const RADIUS_STEP: f32 = 0.25;
const MIN_HEIGHT: f32 = 0.0;
const MAX_HEIGHT: f32 = 6.0;

// ---------------------------------------------------------------------------
// Retained render state
// ---------------------------------------------------------------------------

/// The host's copy of everything the core has forwarded so far.
#[derive(Default)]
struct SceneView {
    transforms: HashMap<String, (Vec3, Quat, Vec3)>,
    visible: HashMap<String, bool>,
    lights: HashMap<String, f32>,
    background_opacity: f32,
}

impl SceneView {
    fn new() -> Self {
        Self {
            background_opacity: 1.0,
            ..Self::default()
        }
    }
}

impl RenderTarget for SceneView {
    fn set_transform(&mut self, id: &str, position: Vec3, rotation: Quat, scale: Vec3) {
        self.transforms
            .insert(id.to_string(), (position, rotation, scale));
    }

    fn set_visible(&mut self, id: &str, visible: bool) {
        self.visible.insert(id.to_string(), visible);
    }

    fn set_light_intensity(&mut self, name: &str, value: f32) {
        self.lights.insert(name.to_string(), value);
    }

    fn set_background_opacity(&mut self, value: f32) {
        self.background_opacity = value;
    }
}

// ---------------------------------------------------------------------------
// Host
// ---------------------------------------------------------------------------

pub struct Host {
    director: Director,
    view: SceneView,
    azimuth: f32,
    radius: f32,
    height: f32,
    /// Object slot (index into the configured objects) the pointer keys
    /// act on; digits click, `h` toggles hover.
    pointer_slot: Option<usize>,
    audio_playing: bool,
}

impl Host {
    pub fn new(director: Director) -> Self {
        let camera = &director.config().camera;
        let (azimuth, radius, height) = (camera.azimuth, camera.radius, camera.height);
        Self {
            director,
            view: SceneView::new(),
            azimuth,
            radius,
            height,
            pointer_slot: None,
            audio_playing: false,
        }
    }

    /// Run the experience in the terminal.
    ///
    /// Sets up the terminal, enters the frame loop, and restores the
    /// terminal on exit (even on error).
    pub fn run(&mut self) -> Result<()> {
        let (term_w, term_h) = terminal::size()?;
        if term_w < MIN_TERM_WIDTH || term_h < MIN_TERM_HEIGHT {
            bail!(
                "Terminal too small: need {}x{}, have {}x{}",
                MIN_TERM_WIDTH,
                MIN_TERM_HEIGHT,
                term_w,
                term_h,
            );
        }

        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
        )?;

        let result = self.frame_loop(&mut stdout);

        let _ = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();

        result
    }

    fn frame_loop(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        let start = Instant::now();
        let mut last = 0.0f64;

        loop {
            if event::poll(FRAME_INTERVAL)? {
                match event::read()? {
                    event::Event::Key(key) => {
                        if key.kind == event::KeyEventKind::Press && !self.handle_key(key.code) {
                            break;
                        }
                    }
                    event::Event::Resize(_, _) => {
                        execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
                    }
                    _ => {}
                }
            }

            let now = start.elapsed().as_secs_f64();
            let dt = (now - last) as f32;
            last = now;

            let camera = self.camera_pose();
            let effects = self.director.tick(now, dt, &camera, &mut self.view);
            for effect in effects {
                self.apply_effect(&effect);
            }

            self.render(stdout, now)?;
        }

        Ok(())
    }

    /// Returns false when the loop should exit.
    fn handle_key(&mut self, code: event::KeyCode) -> bool {
        use event::KeyCode::*;
        match code {
            Char('q') | Esc => return false,
            Char(' ') => self.send(InputEvent::Trigger),
            Char('y') => self.send(InputEvent::Yes),
            Char('n') => self.send(InputEvent::No),
            Char('r') => self.send(InputEvent::Reset),
            Char(c) if c.is_ascii_digit() => {
                let slot = (c as usize).wrapping_sub('1' as usize);
                if let Some(id) = self.object_id(slot) {
                    self.pointer_slot = Some(slot);
                    self.send(InputEvent::Click { id });
                }
            }
            Char('h') => {
                if let Some(slot) = self.pointer_slot {
                    if let Some(id) = self.object_id(slot) {
                        let hovered = self.director.objects()[slot].is_hovered();
                        let ev = if hovered {
                            InputEvent::PointerLeave { id }
                        } else {
                            InputEvent::PointerEnter { id }
                        };
                        self.send(ev);
                    }
                }
            }
            Left => self.azimuth -= ORBIT_STEP,
            Right => self.azimuth += ORBIT_STEP,
            Up => self.height = (self.height + HEIGHT_STEP).min(MAX_HEIGHT),
            Down => self.height = (self.height - HEIGHT_STEP).max(MIN_HEIGHT),
            Char('+') | Char('=') => {
                let max = self.director.config().camera.max_distance;
                self.radius = (self.radius + RADIUS_STEP).min(max);
            }
            Char('-') => {
                let min = self.director.config().camera.min_distance;
                self.radius = (self.radius - RADIUS_STEP).max(min);
            }
            _ => {}
        }
        true
    }

    fn send(&mut self, event: InputEvent) {
        let effects = self.director.handle_event(event);
        for effect in effects {
            self.apply_effect(&effect);
        }
    }

    fn apply_effect(&mut self, effect: &Effect) {
        match effect {
            // Best-effort: the terminal has no audio device, so "playing"
            // is an indicator in the status line. A failure to do even
            // that would be swallowed here.
            Effect::StartAudio => self.audio_playing = true,
            // The remaining effects are edge notifications; the host
            // renders hints and bursts straight from the director's
            // state each frame, so there is nothing to latch.
            _ => {}
        }
    }

    fn object_id(&self, slot: usize) -> Option<String> {
        self.director
            .objects()
            .get(slot)
            .map(|o| o.id().to_string())
    }

    fn camera_pose(&self) -> CameraPose {
        let target = Vec3::from_array(self.director.config().camera.target);
        let offset = Vec3::new(
            self.azimuth.sin() * self.radius,
            self.height,
            self.azimuth.cos() * self.radius,
        );
        let position = target + offset;
        let view = Mat4::look_at_rh(position, target, Vec3::Y);
        CameraPose {
            position,
            rotation: Quat::from_mat4(&view.inverse()),
        }
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    fn render(&self, stdout: &mut io::Stdout, now: f64) -> Result<()> {
        self.render_menubar(stdout)?;

        let mut row: u16 = 2;
        match self.director.phase() {
            Phase::Idle => {
                clear_row(stdout, row)?;
                queue!(
                    stdout,
                    cursor::MoveTo(2, row),
                    style::Print("press space to begin"),
                )?;
                row += 1;
            }
            Phase::Typing | Phase::AwaitingContinue => {
                row = self.render_overlay(stdout, row, now)?;
            }
            Phase::Gate => {
                row = self.render_gate(stdout, row)?;
            }
            Phase::ScenePlaying | Phase::SceneComplete | Phase::Celebration => {
                row = self.render_scene(stdout, row)?;
            }
        }

        let (_, term_h) = terminal::size()?;
        for y in row..term_h.saturating_sub(1) {
            clear_row(stdout, y)?;
        }
        self.render_status(stdout, now, term_h.saturating_sub(1))?;
        stdout.flush()?;
        Ok(())
    }

    fn render_menubar(&self, stdout: &mut io::Stdout) -> Result<()> {
        let items = "[Space] advance  [y/n] gate  [1-6] pick up  [h] hover  [arrows] orbit  [r] reset  [q] quit";
        clear_row(stdout, 0)?;
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            style::SetAttribute(style::Attribute::Dim),
            style::Print(format!(" {items}")),
            style::SetAttribute(style::Attribute::Reset),
        )?;
        Ok(())
    }

    /// Typed greeting plus blinking cursor and the continue hint.
    fn render_overlay(&self, stdout: &mut io::Stdout, mut row: u16, now: f64) -> Result<u16> {
        let tw = self.director.typewriter();
        let cursor_on = tw.cursor_visible(now);
        let cursor_line = tw.cursor_line();

        for (i, line) in tw.visible_lines().iter().enumerate() {
            clear_row(stdout, row)?;
            let caret = if cursor_on && i == cursor_line { "_" } else { "" };
            queue!(
                stdout,
                cursor::MoveTo(4, row),
                style::Print(format!("{line}{caret}")),
            )?;
            row += 1;
        }

        row += 1;
        clear_row(stdout, row)?;
        if self.director.phase() == Phase::AwaitingContinue {
            queue!(
                stdout,
                cursor::MoveTo(4, row),
                style::SetAttribute(style::Attribute::Dim),
                style::Print("press space to continue"),
                style::SetAttribute(style::Attribute::Reset),
            )?;
        }
        Ok(row + 1)
    }

    /// The yes/no gate with its accumulating plea messages.
    fn render_gate(&self, stdout: &mut io::Stdout, mut row: u16) -> Result<u16> {
        let gate = &self.director.config().gate;

        clear_row(stdout, row)?;
        queue!(
            stdout,
            cursor::MoveTo(4, row),
            style::SetAttribute(style::Attribute::Bold),
            style::Print(&gate.question),
            style::SetAttribute(style::Attribute::Reset),
        )?;
        row += 2;

        clear_row(stdout, row)?;
        let options = if self.director.no_control_visible() {
            "[y] ✨ Yes    v.s.    [n] 🤔 No"
        } else {
            "[y] ✨ Yes"
        };
        queue!(stdout, cursor::MoveTo(4, row), style::Print(options))?;
        row += 2;

        for msg in gate.no_messages.iter().take(self.director.no_click_count()) {
            clear_row(stdout, row)?;
            queue!(
                stdout,
                cursor::MoveTo(6, row),
                style::SetAttribute(style::Attribute::Dim),
                style::Print(msg),
                style::SetAttribute(style::Attribute::Reset),
            )?;
            row += 1;
        }
        Ok(row)
    }

    /// Live readout of the choreographed scene and interactive objects.
    fn render_scene(&self, stdout: &mut io::Stdout, mut row: u16) -> Result<u16> {
        for id in [CAKE_ID, TABLE_ID, CANDLE_ID] {
            clear_row(stdout, row)?;
            if let Some((pos, rot, _)) = self.view.transforms.get(id) {
                let visible = *self.view.visible.get(id).unwrap_or(&true);
                let shown = if visible { "" } else { "  (hidden)" };
                let (_, yaw, _) = rot.to_euler(glam::EulerRot::YXZ);
                queue!(
                    stdout,
                    cursor::MoveTo(2, row),
                    style::Print(format!(
                        "{id:<8} x {:+6.2}  y {:+6.2}  z {:+6.2}  yaw {:+6.1}°{shown}",
                        pos.x,
                        pos.y,
                        pos.z,
                        yaw.to_degrees(),
                    )),
                )?;
            }
            row += 1;
        }

        row += 1;
        for (i, obj) in self.director.objects().iter().enumerate() {
            clear_row(stdout, row)?;
            let state = if self.director.active_object() == Some(obj.id()) {
                "FOCUSED"
            } else if obj.is_hovered() {
                "hovered"
            } else {
                "resting"
            };
            let pose = obj.pose();
            queue!(
                stdout,
                cursor::MoveTo(2, row),
                style::Print(format!(
                    "[{}] {:<14} {state:<8} x {:+6.2}  y {:+6.2}  z {:+6.2}",
                    i + 1,
                    obj.id(),
                    pose.position.x,
                    pose.position.y,
                    pose.position.z,
                )),
            )?;
            row += 1;
        }

        row += 1;
        clear_row(stdout, row)?;
        queue!(
            stdout,
            cursor::MoveTo(2, row),
            style::Print(format!(
                "overlay {}  ambient {:.2}  env {:.2}  bg {:.2}",
                bar(self.view.background_opacity),
                self.view.lights.get("ambient").unwrap_or(&0.8),
                self.view.lights.get("environment").unwrap_or(&0.0),
                self.view.lights.get("background").unwrap_or(&0.0),
            )),
        )?;
        row += 2;

        clear_row(stdout, row)?;
        match self.director.phase() {
            Phase::SceneComplete if self.director.candle_lit() => {
                queue!(
                    stdout,
                    cursor::MoveTo(2, row),
                    style::Print("🕯️  press space to blow out the candle"),
                )?;
            }
            Phase::Celebration => {
                queue!(
                    stdout,
                    cursor::MoveTo(2, row),
                    style::Print("🎆 happy birthday! 🎆"),
                )?;
            }
            _ => {}
        }
        Ok(row + 1)
    }

    fn render_status(&self, stdout: &mut io::Stdout, now: f64, y: u16) -> Result<()> {
        let audio = if self.audio_playing { " | ♪" } else { "" };
        let candle = if self.director.candle_lit() {
            "lit"
        } else {
            "out"
        };
        clear_row(stdout, y)?;
        queue!(
            stdout,
            cursor::MoveTo(0, y),
            style::SetAttribute(style::Attribute::Dim),
            style::Print(format!(
                " {:?} | t {now:>6.1}s | candle {candle}{audio} ",
                self.director.phase(),
            )),
            style::SetAttribute(style::Attribute::Reset),
        )?;
        Ok(())
    }
}

fn clear_row(stdout: &mut io::Stdout, y: u16) -> Result<()> {
    queue!(
        stdout,
        cursor::MoveTo(0, y),
        terminal::Clear(terminal::ClearType::CurrentLine),
    )?;
    Ok(())
}

/// Ten-cell intensity bar for a `[0, 1]` scalar.
fn bar(value: f32) -> String {
    let filled = (value.clamp(0.0, 1.0) * 10.0).round() as usize;
    let mut s = String::with_capacity(10);
    for i in 0..10 {
        s.push(if i < filled { '█' } else { '·' });
    }
    s
}
