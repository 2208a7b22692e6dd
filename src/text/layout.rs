use thiserror::Error;

use crate::engine::charset::CharIndex;
use crate::text::word_list::WordList;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("cannot lay out an empty word selection")]
    EmptySelection,
    #[error("terminal size {rows}x{cols} is too small to lay out text")]
    InvalidTerminalSize { rows: u16, cols: u16 },
    #[error("word index {index} is out of range for a list of {len} words")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Absolute terminal cell, zero-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TermPos {
    pub row: u16,
    pub col: u16,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    pub anchor: TermPos,
    /// Characters on this line, including the trailing separator of a
    /// line that was closed because the next word did not fit.
    pub char_count: usize,
    pub word_count: usize,
    /// Global index of the line's first character.
    pub start: usize,
}

/// Word selection wrapped into centered lines.
///
/// Owns its flattened character sequence so a session can hold it
/// independently of the word list it was built from.
#[derive(Clone, Debug)]
pub struct TextLayout {
    chars: Vec<CharIndex>,
    lines: Vec<Line>,
    /// Global character index -> (line, offset within line).
    positions: Vec<(usize, usize)>,
}

impl TextLayout {
    pub fn new(
        words: &WordList,
        indices: &[usize],
        rows: u16,
        cols: u16,
        margin: u16,
    ) -> Result<Self, LayoutError> {
        if indices.is_empty() {
            return Err(LayoutError::EmptySelection);
        }
        if rows == 0 || cols == 0 {
            return Err(LayoutError::InvalidTerminalSize { rows, cols });
        }

        let usable = (cols as usize).saturating_sub(2 * margin as usize);
        let separator = CharIndex::SPACE;

        let mut chars: Vec<CharIndex> = Vec::new();
        let mut lines: Vec<Line> = Vec::new();
        let mut current = Line {
            anchor: TermPos { row: 0, col: 0 },
            char_count: 0,
            word_count: 0,
            start: 0,
        };

        for &index in indices {
            let word = words.get(index).ok_or(LayoutError::IndexOutOfRange {
                index,
                len: words.len(),
            })?;

            // A word wider than the usable width still gets a line of its own.
            if current.word_count > 0 && current.char_count + word.len() + 1 >= usable {
                chars.push(separator);
                current.char_count += 1;
                let start = chars.len();
                lines.push(std::mem::replace(
                    &mut current,
                    Line {
                        anchor: TermPos { row: 0, col: 0 },
                        char_count: 0,
                        word_count: 0,
                        start,
                    },
                ));
            }

            if current.word_count > 0 {
                chars.push(separator);
                current.char_count += 1;
            }
            chars.extend(word.bytes().filter_map(CharIndex::from_byte));
            current.char_count += word.len();
            current.word_count += 1;
        }
        lines.push(current);

        let n_lines = lines.len();
        let top = (rows as usize).saturating_sub(n_lines) / 2;
        let mut positions = Vec::with_capacity(chars.len());
        for (i, line) in lines.iter_mut().enumerate() {
            line.anchor = TermPos {
                row: clamp_u16(i + top),
                col: clamp_u16((cols as usize).saturating_sub(line.char_count) / 2),
            };
            positions.extend((0..line.char_count).map(|offset| (i, offset)));
        }

        tracing::debug!(
            words = indices.len(),
            lines = n_lines,
            chars = chars.len(),
            rows,
            cols,
            "laid out drill text"
        );

        Ok(Self {
            chars,
            lines,
            positions,
        })
    }

    pub fn chars(&self) -> &[CharIndex] {
        &self.chars
    }

    pub fn char_count(&self) -> usize {
        self.chars.len()
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn word_count(&self) -> usize {
        self.lines.iter().map(|l| l.word_count).sum()
    }

    /// (line, offset) of a global character index.
    pub fn position(&self, index: usize) -> Option<(usize, usize)> {
        self.positions.get(index).copied()
    }

    /// Screen cell of a global character index.
    pub fn screen_pos(&self, index: usize) -> Option<TermPos> {
        let (line, offset) = self.position(index)?;
        let anchor = self.lines[line].anchor;
        Some(TermPos {
            row: anchor.row,
            col: clamp_u16(anchor.col as usize + offset),
        })
    }
}

fn clamp_u16(value: usize) -> u16 {
    value.min(u16::MAX as usize) as u16
}
