use packdex_core::CollectionStats;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use crate::theme::Theme;

/// Gallery header: collection totals plus how many cards the filters let through
pub struct StatsBar {
    pub stats: CollectionStats,
    pub shown: usize,
    pub renderable: usize,
}

impl StatsBar {
    pub fn new(stats: CollectionStats) -> Self {
        Self {
            stats,
            shown: 0,
            renderable: 0,
        }
    }

    pub fn shown(mut self, shown: usize, renderable: usize) -> Self {
        self.shown = shown;
        self.renderable = renderable;
        self
    }
}

fn counter(label: &str, value: usize, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{}: ", label), Style::default().fg(Theme::MUTED_TEXT)),
        Span::styled(
            value.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ])
}

impl Widget for StatsBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        let chunks = Layout::horizontal([
            Constraint::Ratio(1, 5),
            Constraint::Ratio(1, 5),
            Constraint::Ratio(1, 5),
            Constraint::Ratio(1, 5),
            Constraint::Ratio(1, 5),
        ])
        .split(area);

        let percent = if self.stats.total == 0 {
            0
        } else {
            self.stats.owned * 100 / self.stats.total
        };
        let owned_line = Line::from(vec![
            Span::styled("Owned: ", Style::default().fg(Theme::MUTED_TEXT)),
            Span::styled(
                format!("{}/{}", self.stats.owned, self.stats.total),
                Style::default()
                    .fg(Theme::OWNED)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" ({}%)", percent), Style::default().fg(Theme::DIM_TEXT)),
        ]);

        let lines = [
            owned_line,
            counter("Wanted", self.stats.wanted, Theme::WANTED),
            counter("Trade", self.stats.trade, Theme::TRADE),
            counter("Shown", self.shown, Theme::BRIGHT_TEXT),
            counter("With art", self.renderable, Theme::MUTED_TEXT),
        ];
        for (chunk, line) in chunks.iter().zip(lines.iter()) {
            buf.set_line(chunk.x, chunk.y, line, chunk.width);
        }
    }
}
