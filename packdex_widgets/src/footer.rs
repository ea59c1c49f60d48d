use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::theme::Theme;

/// `[key] Label  [key] Label` footer line
pub struct KeyHints<'a> {
    hints: &'a [(&'a str, &'a str)],
}

impl<'a> KeyHints<'a> {
    pub fn new(hints: &'a [(&'a str, &'a str)]) -> Self {
        Self { hints }
    }

    pub fn line(&self) -> Line<'a> {
        let mut spans = Vec::with_capacity(self.hints.len() * 3);
        for (i, (key, label)) in self.hints.iter().enumerate() {
            let open = if i == 0 { "[" } else { "  [" };
            spans.push(Span::styled(open, Style::default().fg(Theme::DIM_TEXT)));
            spans.push(Span::styled(*key, Style::default().fg(Theme::GOLD)));
            spans.push(Span::styled(
                format!("] {}", label),
                Style::default().fg(Theme::DIM_TEXT),
            ));
        }
        Line::from(spans)
    }
}

impl Widget for KeyHints<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.line())
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

/// Outcome of the last action, shown above the key hints
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Info(String),
    Error(String),
}

impl StatusMessage {
    pub fn text(&self) -> &str {
        match self {
            StatusMessage::Info(text) | StatusMessage::Error(text) => text,
        }
    }
}

pub struct StatusLine<'a> {
    message: Option<&'a StatusMessage>,
}

impl<'a> StatusLine<'a> {
    pub fn new(message: Option<&'a StatusMessage>) -> Self {
        Self { message }
    }
}

impl Widget for StatusLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(message) = self.message else {
            return;
        };
        let style = match message {
            StatusMessage::Info(_) => Style::default().fg(Theme::MUTED_TEXT),
            StatusMessage::Error(_) => Style::default()
                .fg(Theme::ERROR)
                .add_modifier(Modifier::BOLD),
        };
        Paragraph::new(Line::from(Span::styled(message.text(), style)))
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}
