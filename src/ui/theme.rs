use ratatui::style::Color;

/// Colors for the drill screen. Terminal palette colors only, so the
/// user's terminal theme decides the exact shades.
#[derive(Clone, Debug)]
pub struct Theme {
    pub text_correct: Color,
    pub text_corrected: Color,
    pub text_pending: Color,
    pub text_cursor_fg: Color,
    pub text_cursor_bg: Color,
    pub accent: Color,
    pub muted: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text_correct: Color::Green,
            text_corrected: Color::Red,
            text_pending: Color::Reset,
            text_cursor_fg: Color::Black,
            text_cursor_bg: Color::White,
            accent: Color::Green,
            muted: Color::DarkGray,
        }
    }
}
