//! Typewriter Sequencer — types the greeting one character at a time.
//!
//! Progress is a `(line_index, char_index)` cursor over a static script.
//! Blank lines are paragraph breaks: they are never partially typed and
//! are skipped atomically, consuming no delay tick. An empty script is a
//! single empty line, complete from the start.
//!
//! All timing is deadline-based against the caller's clock: `tick(now)`
//! consumes however many character steps are due, and the one-shot
//! ready signal fires once `post_typing_delay` has elapsed after
//! completion. Resetting drops any pending deadline, so a reset mid-wait
//! can never produce a stale signal.

/// Line/character granularity is Unicode scalar values; the stock script
/// is emoji-heavy, so byte indexing would split characters.
pub struct Typewriter {
    lines: Vec<String>,
    line_index: usize,
    char_index: usize,
    char_delay: f64,
    post_delay: f64,
    blink_interval: f64,
    next_step_due: Option<f64>,
    ready_due: Option<f64>,
    ready_emitted: bool,
}

/// What one tick produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypewriterTick {
    /// At least one character (or line advance) happened.
    pub stepped: bool,
    /// One-shot: typing finished and the post-completion delay elapsed.
    pub ready: bool,
}

impl Typewriter {
    pub fn new(lines: Vec<String>, char_delay: f64, post_delay: f64, blink_interval: f64) -> Self {
        let lines = if lines.is_empty() {
            vec![String::new()]
        } else {
            lines
        };
        let mut tw = Self {
            lines,
            line_index: 0,
            char_index: 0,
            char_delay,
            post_delay,
            blink_interval,
            next_step_due: None,
            ready_due: None,
            ready_emitted: false,
        };
        tw.skip_blank_lines();
        tw
    }

    pub fn reset(&mut self) {
        self.line_index = 0;
        self.char_index = 0;
        self.next_step_due = None;
        self.ready_due = None;
        self.ready_emitted = false;
        self.skip_blank_lines();
    }

    pub fn is_complete(&self) -> bool {
        self.line_index >= self.lines.len()
    }

    /// Advance past any run of blank lines at the cursor.
    fn skip_blank_lines(&mut self) {
        while self.line_index < self.lines.len() && self.lines[self.line_index].is_empty() {
            self.line_index += 1;
        }
    }

    fn current_line_len(&self) -> usize {
        self.lines
            .get(self.line_index)
            .map_or(0, |l| l.chars().count())
    }

    /// One discrete advance: type one character, or move to the next
    /// non-blank line when the current one is fully typed.
    pub fn step(&mut self) {
        if self.is_complete() {
            return;
        }
        if self.char_index < self.current_line_len() {
            self.char_index += 1;
        } else {
            self.line_index += 1;
            self.char_index = 0;
            self.skip_blank_lines();
        }
    }

    /// Consume all steps due at `now` and surface the one-shot ready
    /// signal once the post-completion delay has passed.
    pub fn tick(&mut self, now: f64) -> TypewriterTick {
        let mut stepped = false;

        if !self.is_complete() {
            let mut due = *self.next_step_due.get_or_insert(now + self.char_delay);
            while now >= due && !self.is_complete() {
                self.step();
                stepped = true;
                due += self.char_delay;
            }
            self.next_step_due = Some(due);
        }

        let mut ready = false;
        if self.is_complete() {
            let ready_due = *self.ready_due.get_or_insert(now + self.post_delay);
            if !self.ready_emitted && now >= ready_due {
                self.ready_emitted = true;
                ready = true;
            }
        }

        TypewriterTick { stepped, ready }
    }

    /// Cursor visibility at `now`; an even blink half-period shows it.
    /// Pure function of time, independent of typing progress.
    pub fn cursor_visible(&self, now: f64) -> bool {
        if self.blink_interval <= 0.0 {
            return true;
        }
        ((now / self.blink_interval).floor() as i64) % 2 == 0
    }

    /// Line the cursor sits on: the furthest-typed line, or the last
    /// line once complete.
    pub fn cursor_line(&self) -> usize {
        if self.is_complete() {
            self.lines.len().saturating_sub(1)
        } else {
            self.line_index
        }
    }

    /// The script as currently revealed: full lines before the cursor,
    /// a partial current line, empty strings after.
    pub fn visible_lines(&self) -> Vec<String> {
        self.lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                if self.is_complete() || i < self.line_index {
                    line.clone()
                } else if i == self.line_index {
                    line.chars().take(self.char_index).collect()
                } else {
                    String::new()
                }
            })
            .collect()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}
