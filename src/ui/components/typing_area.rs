use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Widget;

use typtr::session::drill::DrillState;

use crate::ui::theme::Theme;

/// Drill text drawn at the layout's own anchors, relative to `area`.
pub struct TypingArea<'a> {
    drill: &'a DrillState<'a>,
    theme: &'a Theme,
}

impl<'a> TypingArea<'a> {
    pub fn new(drill: &'a DrillState<'a>, theme: &'a Theme) -> Self {
        Self { drill, theme }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CellState {
    Typed { corrected: bool },
    Cursor,
    Pending,
}

/// What to draw for position `idx`: typed spaces become `_`.
fn cell(drill: &DrillState<'_>, idx: usize) -> (char, CellState) {
    let ch = drill.layout().chars()[idx].to_char();
    if idx < drill.cursor {
        let glyph = if ch == ' ' { '_' } else { ch };
        (
            glyph,
            CellState::Typed {
                corrected: drill.errored[idx],
            },
        )
    } else if idx == drill.cursor && !drill.is_complete() {
        (ch, CellState::Cursor)
    } else {
        (ch, CellState::Pending)
    }
}

impl Widget for TypingArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = self.drill.layout();
        let theme = self.theme;

        for idx in 0..layout.char_count() {
            let Some(pos) = layout.screen_pos(idx) else {
                break;
            };
            let x = area.x.saturating_add(pos.col);
            let y = area.y.saturating_add(pos.row);
            if x >= area.right() || y >= area.bottom() {
                continue;
            }
            let (glyph, state) = cell(self.drill, idx);
            let style = match state {
                CellState::Typed { corrected: false } => Style::default().fg(theme.text_correct),
                CellState::Typed { corrected: true } => Style::default()
                    .fg(theme.text_corrected)
                    .add_modifier(Modifier::BOLD),
                CellState::Cursor => Style::default()
                    .fg(theme.text_cursor_fg)
                    .bg(theme.text_cursor_bg),
                CellState::Pending => Style::default().fg(theme.text_pending),
            };
            buf.set_string(x, y, glyph.to_string(), style);
        }
    }
}
