use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use packdex_core::{PackFilter, ProcessedPack};
use packdex_widgets::footer::KeyHints;
use packdex_widgets::pack_row::{PackRow, PACK_ROW_HEIGHT};
use packdex_widgets::popup::PopupWidget;
use packdex_widgets::theme::Theme;

use crate::app::{DexState, ScreenAction};
use crate::screens::Screen;

const HINTS: [(&str, &str); 9] = [
    ("\u{2190}\u{2192}", "Tab"),
    ("Space", "Select"),
    ("s", "Share"),
    ("S", "Share ready"),
    ("a", "Share selected"),
    ("/", "Card"),
    ("f/r/n", "Set/Rarity/Top"),
    ("Tab", "Gallery"),
    ("q", "Quit"),
];

const SINGLE_SHARE_DELAY: Duration = Duration::from_millis(500);
const BATCH_SHARE_DELAY: Duration = Duration::from_millis(1000);

/// Which shares a confirmed request stamps
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareRequest {
    One(String),
    AllReady(PackFilter),
    Selected,
}

impl ShareRequest {
    pub fn delay(&self) -> Duration {
        match self {
            ShareRequest::One(_) => SINGLE_SHARE_DELAY,
            ShareRequest::AllReady(_) | ShareRequest::Selected => BATCH_SHARE_DELAY,
        }
    }
}

/// A share waiting out its delay; applied in one step when it elapses
#[derive(Debug, Clone)]
struct PendingShare {
    request: ShareRequest,
    started: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Ready,
    CoolingDown,
}

#[derive(Debug, Clone)]
enum Mode {
    Browse,
    Search,
    SetPicker { options: Vec<String>, cursor: usize },
}

pub struct PacksScreen {
    pub filter: PackFilter,
    pub cursor: usize,
    tab: Tab,
    mode: Mode,
    pending: Option<PendingShare>,
}

impl PacksScreen {
    pub fn new() -> Self {
        Self {
            filter: PackFilter::default(),
            cursor: 0,
            tab: Tab::Ready,
            mode: Mode::Browse,
            pending: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Check the pending share against the clock; yields the share action once
    /// its delay has passed
    pub fn tick(&mut self, now: Instant) -> Option<ScreenAction> {
        let pending = self.pending.as_ref()?;
        if now.saturating_duration_since(pending.started) < pending.request.delay() {
            return None;
        }
        self.pending
            .take()
            .map(|pending| ScreenAction::Share(pending.request))
    }

    fn queue(&mut self, request: ShareRequest) -> Option<ScreenAction> {
        self.queue_at(request, Instant::now())
    }

    fn queue_at(&mut self, request: ShareRequest, started: Instant) -> Option<ScreenAction> {
        if self.is_pending() {
            return None;
        }
        self.pending = Some(PendingShare { request, started });
        Some(ScreenAction::Notify("Sharing\u{2026}".into()))
    }

    fn visible<'a>(&self, ready: &'a [ProcessedPack], expired: &'a [ProcessedPack]) -> &'a [ProcessedPack] {
        match self.tab {
            Tab::Ready => ready,
            Tab::CoolingDown => expired,
        }
    }

    fn is_row_pending(&self, pack: &ProcessedPack, state: &DexState) -> bool {
        match self.pending.as_ref().map(|p| &p.request) {
            Some(ShareRequest::One(id)) => *id == pack.id,
            Some(ShareRequest::AllReady(_)) => self.tab == Tab::Ready,
            Some(ShareRequest::Selected) => state.board.is_selected(&pack.id),
            None => false,
        }
    }

    fn cycle_top_cards(&mut self) {
        self.filter.top_cards = match self.filter.top_cards {
            None => Some(0),
            Some(n) if n < 5 => Some(n + 1),
            Some(_) => None,
        };
    }

    fn filter_summary(&self, selected: usize) -> Line<'static> {
        let muted = Style::default().fg(Theme::MUTED_TEXT);
        let mut spans = vec![Span::styled(
            self.filter.set.clone().unwrap_or_else(|| "All sets".into()),
            Style::default()
                .fg(Theme::GOLD)
                .add_modifier(Modifier::BOLD),
        )];
        spans.push(Span::styled(format!("  {}", self.filter.min_rarity), muted));
        if let Some(top) = self.filter.top_cards {
            spans.push(Span::styled(format!("  top {}", top), muted));
        }
        let searching = matches!(self.mode, Mode::Search);
        if searching || !self.filter.card_name.is_empty() {
            let cursor = if searching { "_" } else { "" };
            spans.push(Span::styled(
                format!("  /{}{}", self.filter.card_name, cursor),
                Style::default().fg(Theme::BRIGHT_TEXT),
            ));
        }
        if selected > 0 {
            spans.push(Span::styled(
                format!("  {} selected", selected),
                Style::default().fg(Theme::CARD_SELECTED),
            ));
        }
        Line::from(spans)
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => self.filter.card_name.push(c),
            KeyCode::Backspace => {
                self.filter.card_name.pop();
            }
            KeyCode::Esc => {
                self.filter.card_name.clear();
                self.mode = Mode::Browse;
            }
            KeyCode::Enter => self.mode = Mode::Browse,
            _ => return,
        }
        self.cursor = 0;
    }

    fn handle_picker_key(&mut self, key: KeyEvent) {
        let Mode::SetPicker { options, cursor } = &mut self.mode else {
            return;
        };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => *cursor = cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if *cursor + 1 < options.len() {
                    *cursor += 1;
                }
            }
            KeyCode::Enter => {
                // First option is "All sets"
                let set = match *cursor {
                    0 => None,
                    i => options.get(i).cloned(),
                };
                self.filter.set = set;
                self.mode = Mode::Browse;
                self.cursor = 0;
            }
            KeyCode::Esc => self.mode = Mode::Browse,
            _ => {}
        }
    }
}

impl Screen for PacksScreen {
    fn render(&mut self, frame: &mut Frame, area: Rect, state: &DexState) {
        let view = state.board.view(&self.filter, state.now);
        let rows = self.visible(&view.ready, &view.expired);
        self.cursor = self.cursor.min(rows.len().saturating_sub(1));

        let chunks = Layout::vertical([
            Constraint::Length(1), // Tabs
            Constraint::Length(2), // Filters
            Constraint::Min(0),    // Packs
            Constraint::Length(1), // Footer
        ])
        .split(area);

        let tab_style = |tab: Tab| {
            if tab == self.tab {
                Style::default()
                    .fg(Theme::CARD_SELECTED)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(Theme::MUTED_TEXT)
            }
        };
        let tabs = Line::from(vec![
            Span::styled(format!("Ready ({})", view.ready.len()), tab_style(Tab::Ready)),
            Span::styled("   ", Style::default()),
            Span::styled(
                format!("Cooling down ({})", view.expired.len()),
                tab_style(Tab::CoolingDown),
            ),
        ]);
        frame.render_widget(Paragraph::new(tabs).alignment(Alignment::Center), chunks[0]);

        let filter_block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Theme::CARD_BORDER));
        let filter_inner = filter_block.inner(chunks[1]);
        frame.render_widget(filter_block, chunks[1]);
        frame.render_widget(
            Paragraph::new(self.filter_summary(state.board.selected_count())),
            filter_inner,
        );

        let list = chunks[2];
        if rows.is_empty() {
            let hint = match (self.tab, self.filter.is_active()) {
                (_, true) => "No pack matches these filters; press c to clear",
                (Tab::Ready, false) => "No pack is ready to share",
                (Tab::CoolingDown, false) => "No pack is cooling down",
            };
            frame.render_widget(
                Paragraph::new(Span::styled(hint, Style::default().fg(Theme::MUTED_TEXT)))
                    .alignment(Alignment::Center),
                list,
            );
        } else {
            let per_page = ((list.height / PACK_ROW_HEIGHT) as usize).max(1);
            let first = (self.cursor / per_page) * per_page;
            for (offset, pack) in rows.iter().skip(first).take(per_page).enumerate() {
                let row_area = Rect::new(
                    list.x,
                    list.y + offset as u16 * PACK_ROW_HEIGHT,
                    list.width,
                    PACK_ROW_HEIGHT.min(list.height),
                );
                let row = PackRow::new(pack, state.now)
                    .highlighted(first + offset == self.cursor)
                    .checked(state.board.is_selected(&pack.id))
                    .pending(self.is_row_pending(pack, state));
                frame.render_widget(row, row_area);
            }
        }

        frame.render_widget(KeyHints::new(&HINTS), chunks[3]);

        if let Mode::SetPicker { options, cursor } = &self.mode {
            let popup = options
                .iter()
                .fold(PopupWidget::new("Filter by set"), |popup, name| {
                    popup.line(name.clone(), Style::default().fg(Theme::MUTED_TEXT))
                })
                .size(40, 50)
                .cursor(*cursor);
            frame.render_widget(popup, area);
        }
    }

    fn handle_key(&mut self, key: KeyEvent, state: &DexState) -> Option<ScreenAction> {
        match self.mode {
            Mode::Search => {
                self.handle_search_key(key);
                return None;
            }
            Mode::SetPicker { .. } => {
                self.handle_picker_key(key);
                return None;
            }
            Mode::Browse => {}
        }

        let view = state.board.view(&self.filter, state.now);
        let rows = self.visible(&view.ready, &view.expired);
        let current = rows.get(self.cursor).map(|p| p.id.clone());

        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Char('h') | KeyCode::Char('l') => {
                self.tab = match self.tab {
                    Tab::Ready => Tab::CoolingDown,
                    Tab::CoolingDown => Tab::Ready,
                };
                self.cursor = 0;
            }
            KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor + 1 < rows.len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Char(' ') => return current.map(ScreenAction::ToggleSelected),
            KeyCode::Char('s') | KeyCode::Enter => {
                if self.tab == Tab::CoolingDown {
                    return Some(ScreenAction::Notify("That pack is still cooling down".into()));
                }
                return current.and_then(|id| self.queue(ShareRequest::One(id)));
            }
            KeyCode::Char('S') => {
                if view.ready.is_empty() {
                    return Some(ScreenAction::Notify("No pack is ready to share".into()));
                }
                let filter = self.filter.clone();
                return self.queue(ShareRequest::AllReady(filter));
            }
            KeyCode::Char('a') => {
                if state.board.selected_count() == 0 {
                    return Some(ScreenAction::Notify("No pack selected".into()));
                }
                return self.queue(ShareRequest::Selected);
            }

            KeyCode::Char('/') => self.mode = Mode::Search,
            KeyCode::Char('f') => {
                let mut options = vec!["All sets".to_string()];
                options.extend(state.board.set_names());
                let cursor = self
                    .filter
                    .set
                    .as_ref()
                    .and_then(|set| options.iter().position(|o| o == set))
                    .unwrap_or(0);
                self.mode = Mode::SetPicker { options, cursor };
            }
            KeyCode::Char('r') => {
                self.filter.min_rarity = self.filter.min_rarity.next();
                self.cursor = 0;
            }
            KeyCode::Char('n') => {
                self.cycle_top_cards();
                self.cursor = 0;
            }
            KeyCode::Char('c') => {
                self.filter = PackFilter::default();
                self.cursor = 0;
            }

            KeyCode::Tab => return Some(ScreenAction::SwitchScreen),
            KeyCode::Char('q') => return Some(ScreenAction::Quit),
            _ => {}
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_single_share_waits_half_a_second() {
        let start = Instant::now();
        let mut screen = PacksScreen::new();
        assert!(screen.queue_at(ShareRequest::One("p1".into()), start).is_some());
        // A second request while one is pending is ignored
        assert!(screen.queue_at(ShareRequest::Selected, start).is_none());

        assert!(screen.tick(start + ms(499)).is_none());
        let action = screen.tick(start + ms(500));
        assert!(matches!(action, Some(ScreenAction::Share(ShareRequest::One(id))) if id == "p1"));
        assert!(!screen.is_pending());
    }

    #[test]
    fn test_batch_share_waits_a_second() {
        let start = Instant::now();
        let mut screen = PacksScreen::new();
        screen.queue_at(ShareRequest::AllReady(PackFilter::default()), start);
        assert!(screen.tick(start + ms(999)).is_none());
        assert!(screen.tick(start + ms(1000)).is_some());
        assert!(screen.tick(start + ms(1033)).is_none());
    }

    #[test]
    fn test_share_delay_ignores_tick_count() {
        let start = Instant::now();
        let mut screen = PacksScreen::new();
        screen.queue_at(ShareRequest::One("p1".into()), start);
        // Many fast loop passes (key repeat) inside the delay change nothing
        for _ in 0..100 {
            assert!(screen.tick(start + ms(10)).is_none());
        }
        assert!(screen.tick(start + ms(500)).is_some());
    }

    #[test]
    fn test_top_cards_filter_cycles_back_to_none() {
        let mut screen = PacksScreen::new();
        let mut seen = Vec::new();
        for _ in 0..7 {
            screen.cycle_top_cards();
            seen.push(screen.filter.top_cards);
        }
        assert_eq!(
            seen,
            [Some(0), Some(1), Some(2), Some(3), Some(4), Some(5), None]
        );
    }
}
