//! Narrative Phase State Machine — the top-level script of the evening.
//!
//! Exactly one phase is active at a time and every transition is
//! edge-triggered: user input or a completion signal from the typewriter
//! or the timeline. Time never moves the phase directly. Any input with
//! no defined transition is a no-op, and the phase never regresses
//! except through a full reset.

use crate::types::Effect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Typing,
    AwaitingContinue,
    Gate,
    ScenePlaying,
    SceneComplete,
    Celebration,
}

/// Inputs the machine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseInput {
    /// The single advance key.
    Trigger,
    /// "Yes" on the gate.
    Yes,
    /// "No" on the gate.
    No,
    /// The typewriter's one-shot ready signal.
    TypingReady,
    /// The timeline's one-shot completion event.
    SceneFinished,
}

pub struct PhaseMachine {
    phase: Phase,
    no_clicks: usize,
    no_message_cap: usize,
    candle_lit: bool,
    fireworks_active: bool,
}

impl PhaseMachine {
    pub fn new(no_message_cap: usize) -> Self {
        Self {
            phase: Phase::Idle,
            no_clicks: 0,
            no_message_cap,
            candle_lit: true,
            fireworks_active: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Gates the timeline engine; stays true through completion so the
    /// engine can hold its terminal values.
    pub fn is_playing(&self) -> bool {
        matches!(
            self.phase,
            Phase::ScenePlaying | Phase::SceneComplete | Phase::Celebration
        )
    }

    /// Focus toggles are legal only once the scene exists.
    pub fn allows_focus(&self) -> bool {
        self.is_playing()
    }

    pub fn no_click_count(&self) -> usize {
        self.no_clicks
    }

    /// The "no" control disappears once every message has been revealed.
    pub fn no_control_visible(&self) -> bool {
        self.no_clicks < self.no_message_cap
    }

    pub fn candle_lit(&self) -> bool {
        self.candle_lit
    }

    pub fn fireworks_active(&self) -> bool {
        self.fireworks_active
    }

    /// Full experience reset, back to Idle with all derived state cleared.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.no_clicks = 0;
        self.candle_lit = true;
        self.fireworks_active = false;
    }

    /// Apply one input; returns the side effects the host should attempt.
    pub fn apply(&mut self, input: PhaseInput) -> Vec<Effect> {
        use Phase::*;
        use PhaseInput::*;

        let effects = match (self.phase, input) {
            (Idle, Trigger) => {
                self.goto(Typing);
                // Audio is best-effort; the host swallows failures.
                vec![Effect::StartAudio]
            }
            (Typing, TypingReady) => {
                self.goto(AwaitingContinue);
                vec![Effect::ShowContinueHint]
            }
            (AwaitingContinue, Trigger) => {
                self.goto(Gate);
                vec![Effect::ShowGatePrompt]
            }
            (Gate, Yes) => {
                self.goto(ScenePlaying);
                vec![Effect::StartScene]
            }
            (Gate, No) => {
                if self.no_clicks < self.no_message_cap {
                    self.no_clicks += 1;
                    vec![Effect::RevealNoMessage {
                        count: self.no_clicks,
                    }]
                } else {
                    Vec::new()
                }
            }
            (ScenePlaying, SceneFinished) => {
                self.goto(SceneComplete);
                vec![Effect::ShowCandleHint]
            }
            (SceneComplete, Trigger) if self.candle_lit => {
                self.candle_lit = false;
                self.fireworks_active = true;
                self.goto(Celebration);
                vec![Effect::BlowOutCandle, Effect::StartFireworks]
            }
            _ => Vec::new(),
        };
        effects
    }

    fn goto(&mut self, next: Phase) {
        log::debug!("phase {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }
}
