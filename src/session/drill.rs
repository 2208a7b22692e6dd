use std::time::Instant;

use crate::engine::charset::CharIndex;
use crate::text::layout::TextLayout;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrillPhase {
    AwaitingStart,
    Typing,
    Completed,
    Canceled,
}

impl DrillPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, DrillPhase::Completed | DrillPhase::Canceled)
    }
}

/// Session record for one round over a laid-out text.
///
/// Per-position arrays are parallel to `layout.chars()`. `typed` and
/// `time_ms` hold the first attempt at each position only.
pub struct DrillState<'a> {
    layout: &'a TextLayout,
    pub phase: DrillPhase,
    pub typed: Vec<Option<CharIndex>>,
    pub time_ms: Vec<f64>,
    pub errored: Vec<bool>,
    pub errors: usize,
    /// Global index of the character to type next.
    pub cursor: usize,
    pub line: usize,
    pub line_offset: usize,
    /// Set after a mismatch until the position is typed correctly.
    pub(crate) retrying: bool,
    pub last_accepted_at: Option<Instant>,
}

impl<'a> DrillState<'a> {
    pub fn new(layout: &'a TextLayout) -> Self {
        let n = layout.char_count();
        Self {
            layout,
            phase: DrillPhase::AwaitingStart,
            typed: vec![None; n],
            time_ms: vec![0.0; n],
            errored: vec![false; n],
            errors: 0,
            cursor: 0,
            line: 0,
            line_offset: 0,
            retrying: false,
            last_accepted_at: None,
        }
    }

    pub fn layout(&self) -> &'a TextLayout {
        self.layout
    }

    pub fn expected(&self) -> Option<CharIndex> {
        self.layout.chars().get(self.cursor).copied()
    }

    pub fn is_complete(&self) -> bool {
        self.phase == DrillPhase::Completed
    }

    /// Moves past the current character. Returns false when that was the
    /// last character of the last line.
    pub(crate) fn advance(&mut self) -> bool {
        let lines = self.layout.lines();
        self.cursor += 1;
        self.line_offset += 1;
        if self.line_offset >= lines[self.line].char_count {
            if self.line + 1 >= lines.len() {
                return false;
            }
            self.line += 1;
            self.line_offset = 0;
        }
        true
    }

    /// Milliseconds since the last accepted key (or the start of typing).
    pub fn current_key_ms(&self, now: Instant) -> f64 {
        match self.last_accepted_at {
            Some(since) => now.saturating_duration_since(since).as_secs_f64() * 1000.0,
            None => 0.0,
        }
    }
}
