pub mod components;
pub mod theme;

use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Paragraph;

use typtr::session::drill::{DrillPhase, DrillState};

use crate::app::App;
use components::stats_panel::StatsPanel;
use components::typing_area::TypingArea;
use theme::Theme;

pub fn draw(frame: &mut Frame, app: &App, drill: &DrillState<'_>, theme: &Theme) {
    let area = frame.area();

    match drill.phase {
        DrillPhase::AwaitingStart => {
            let panel = StatsPanel::new(&app.rankings, app.last_result.as_ref(), theme);
            frame.render_widget(panel, area);
        }
        DrillPhase::Typing => {
            let readout = format!(
                "Current key time: {:.2} ms",
                drill.current_key_ms(Instant::now())
            );
            let row = Rect::new(area.x, area.y.saturating_add(1), area.width, area.height.min(1));
            frame.render_widget(
                Paragraph::new(readout).style(Style::default().fg(theme.muted)),
                row.intersection(area),
            );
        }
        DrillPhase::Completed | DrillPhase::Canceled => {}
    }

    // Drawn last so the text stays readable when the panel overlaps it.
    frame.render_widget(TypingArea::new(drill, theme), area);
}
