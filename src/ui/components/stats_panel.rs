use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use typtr::engine::WORST_N;
use typtr::engine::charset::CharIndex;
use typtr::engine::ngram_stats::BigramKey;
use typtr::engine::ranking::{RankingSummary, Weakness};
use typtr::session::result::DrillResult;

use crate::ui::theme::Theme;

/// Start screen: prompt, last round summary and the weakness rankings.
pub struct StatsPanel<'a> {
    rankings: &'a RankingSummary,
    last: Option<&'a DrillResult>,
    theme: &'a Theme,
}

impl<'a> StatsPanel<'a> {
    pub fn new(
        rankings: &'a RankingSummary,
        last: Option<&'a DrillResult>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            rankings,
            last,
            theme,
        }
    }
}

pub fn summary_lines(result: &DrillResult) -> [String; 2] {
    [
        format!(
            "Accuracy: {:5.2}% ({} / {})",
            result.accuracy,
            result.correct(),
            result.n_chars
        ),
        format!(
            "Average speed: {:5.1} cpm / {:5.1} wpm",
            result.cpm, result.wpm
        ),
    ]
}

/// `'a'` with its error rate, or `'a'?` when the key has no data.
fn format_entry(label: &str, error_rate: f64, has_data: bool) -> String {
    if has_data {
        format!("'{label}' {:.0}%", error_rate * 100.0)
    } else {
        format!("'{label}'?")
    }
}

pub fn format_chars(list: &[Weakness<CharIndex>]) -> String {
    list.iter()
        .map(|w| format_entry(&w.key.to_char().to_string(), w.error_rate, w.has_data()))
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn format_bigrams(list: &[Weakness<BigramKey>]) -> String {
    if list.is_empty() {
        return "-".to_string();
    }
    list.iter()
        .map(|w| format_entry(&w.key.as_string(), w.error_rate, w.has_data()))
        .collect::<Vec<_>>()
        .join("  ")
}

impl Widget for StatsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let heading = Style::default()
            .fg(self.theme.accent)
            .add_modifier(Modifier::BOLD);
        let muted = Style::default().fg(self.theme.muted);

        let mut lines = vec![Line::from(Span::styled("Press [space] to start", heading))];
        match self.last {
            Some(result) => lines.extend(summary_lines(result).map(Line::from)),
            None => lines.push(Line::from(Span::styled("No rounds yet", muted))),
        }
        lines.push(Line::default());

        let rows = [
            (format!("Worst {WORST_N} chars:"), format_chars(&self.rankings.worst_chars)),
            (format!("Worst {WORST_N} bigrams:"), format_bigrams(&self.rankings.worst_bigrams)),
            (format!("Best {WORST_N} chars:"), format_chars(&self.rankings.best_chars)),
            (format!("Best {WORST_N} bigrams:"), format_bigrams(&self.rankings.best_bigrams)),
        ];
        for (label, values) in rows {
            lines.push(Line::from(vec![
                Span::styled(format!("{label:<18}"), heading),
                Span::raw(values),
            ]));
        }

        Paragraph::new(lines).render(area, buf);
    }
}
