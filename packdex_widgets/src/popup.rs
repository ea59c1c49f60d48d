use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Widget};

use crate::theme::Theme;

/// A centered popup overlay with an optional highlighted line
pub struct PopupWidget {
    pub title: String,
    pub lines: Vec<(String, Style)>,
    pub width_percent: u16,
    pub height_percent: u16,
    pub cursor: Option<usize>,
}

impl PopupWidget {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
            width_percent: 60,
            height_percent: 40,
            cursor: None,
        }
    }

    pub fn line(mut self, text: impl Into<String>, style: Style) -> Self {
        self.lines.push((text.into(), style));
        self
    }

    pub fn size(mut self, width_percent: u16, height_percent: u16) -> Self {
        self.width_percent = width_percent;
        self.height_percent = height_percent;
        self
    }

    /// Highlight line `index` as the current choice
    pub fn cursor(mut self, index: usize) -> Self {
        self.cursor = Some(index);
        self
    }
}

impl Widget for PopupWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup_area = centered_rect(self.width_percent, self.height_percent, area);
        Clear.render(popup_area, buf);

        let title_line = Line::from(Span::styled(
            format!(" {} ", self.title),
            Style::default()
                .fg(Theme::GOLD)
                .add_modifier(Modifier::BOLD),
        ));

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(Theme::CARD_SELECTED))
            .style(Style::default().bg(Theme::PANEL_BG))
            .title(title_line)
            .title_alignment(Alignment::Center)
            .padding(Padding::horizontal(2));

        let inner = block.inner(popup_area);
        block.render(popup_area, buf);

        // Keep the cursor line in view
        let visible = inner.height as usize;
        let skip = match self.cursor {
            Some(c) if visible > 0 && c >= visible => c + 1 - visible,
            _ => 0,
        };

        for (row, (i, (text, style))) in self.lines.iter().enumerate().skip(skip).enumerate() {
            let y = inner.y + row as u16;
            if y >= inner.bottom() {
                break;
            }
            let (prefix, style) = if self.cursor == Some(i) {
                (
                    "> ",
                    style
                        .fg(Theme::CARD_SELECTED)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                ("  ", *style)
            };
            buf.set_stringn(
                inner.x,
                y,
                format!("{}{}", prefix, text),
                inner.width as usize,
                style,
            );
        }
    }
}

/// Helper to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x.min(100) / 100;
    let height = area.height * percent_y.min(100) / 100;
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 50);
        assert_eq!(centered_rect(60, 40, area), Rect::new(20, 15, 60, 20));
        assert_eq!(centered_rect(150, 100, area), area);
    }

    #[test]
    fn test_cursor_line_is_marked() {
        let area = Rect::new(0, 0, 40, 12);
        let mut buf = Buffer::empty(area);
        PopupWidget::new("Set")
            .line("All sets", Style::default())
            .line("Genetic Apex", Style::default())
            .size(100, 100)
            .cursor(1)
            .render(area, &mut buf);

        let rendered: String = (0..area.width)
            .map(|x| buf[(x, 2)].symbol().to_string())
            .collect();
        assert!(rendered.contains("> Genetic Apex"));
    }
}
