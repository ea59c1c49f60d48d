use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use ratatui::Frame;

use packdex_widgets::footer::KeyHints;
use packdex_widgets::popup::centered_rect;
use packdex_widgets::theme::Theme;

use crate::app::{DexState, ScreenAction};
use crate::screens::Screen;

const HINTS: [(&str, &str); 3] = [("Enter", "Import"), ("Esc", "Cancel"), ("Ctrl-U", "Clear")];

/// Path prompt for importing a card database file
pub struct ImportScreen {
    pub input: String,
}

impl ImportScreen {
    pub fn new(suggested: impl Into<String>) -> Self {
        Self {
            input: suggested.into(),
        }
    }
}

impl Screen for ImportScreen {
    fn render(&mut self, frame: &mut Frame, area: Rect, state: &DexState) {
        let chunks = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).split(area);
        let dialog = centered_rect(70, 50, chunks[0]);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(Theme::CARD_SELECTED))
            .title(Span::styled(
                " Import card database ",
                Style::default()
                    .fg(Theme::GOLD)
                    .add_modifier(Modifier::BOLD),
            ))
            .title_alignment(Alignment::Center);
        let inner = block.inner(dialog);
        frame.render_widget(block, dialog);

        let intro = if state.collection.is_loaded() {
            "Replace the current collection with a database file."
        } else {
            "No card database yet. Import one to get started."
        };
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(intro, Style::default().fg(Theme::MUTED_TEXT))),
            Line::from(""),
            Line::from(vec![
                Span::styled("File: ", Style::default().fg(Theme::DIM_TEXT)),
                Span::styled(
                    format!("{}_", self.input),
                    Style::default()
                        .fg(Theme::BRIGHT_TEXT)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
        frame.render_widget(KeyHints::new(&HINTS), chunks[1]);
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &DexState) -> Option<ScreenAction> {
        match key.code {
            KeyCode::Enter => {
                let path = self.input.trim();
                if path.is_empty() {
                    return Some(ScreenAction::Notify("Type the path of a database file".into()));
                }
                return Some(ScreenAction::Import(Some(PathBuf::from(path))));
            }
            KeyCode::Esc => return Some(ScreenAction::Import(None)),
            KeyCode::Char('u')
                if key
                    .modifiers
                    .contains(crossterm::event::KeyModifiers::CONTROL) =>
            {
                self.input.clear();
            }
            KeyCode::Char(c) => self.input.push(c),
            KeyCode::Backspace => {
                self.input.pop();
            }
            _ => {}
        }
        None
    }
}
