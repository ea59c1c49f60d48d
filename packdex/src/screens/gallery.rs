use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use packdex_core::filter::{available_packs, filter_cards, set_names};
use packdex_core::{FilterCriteria, FilteredCards, GalleryCard, PackSelection, SetSelection};
use packdex_widgets::card::{CardTile, CARD_HEIGHT, CARD_WIDTH};
use packdex_widgets::footer::KeyHints;
use packdex_widgets::popup::PopupWidget;
use packdex_widgets::stats::StatsBar;
use packdex_widgets::theme::Theme;

use crate::app::{DexState, ScreenAction};
use crate::screens::Screen;

const HINTS: [(&str, &str); 10] = [
    ("\u{2190}\u{2191}\u{2193}\u{2192}", "Move"),
    ("o/w/t", "Owned/Wanted/Trade"),
    ("s", "Set"),
    ("p", "Pack"),
    ("O/W/M/T", "Filters"),
    ("/", "Search"),
    ("Enter", "Details"),
    ("i/e", "Import/Export"),
    ("Tab", "Packs"),
    ("q", "Quit"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PickerKind {
    Set,
    Pack,
}

#[derive(Debug, Clone)]
struct Picker {
    kind: PickerKind,
    options: Vec<(String, PickerChoice)>,
    cursor: usize,
}

#[derive(Debug, Clone)]
enum PickerChoice {
    Set(SetSelection),
    Pack(PackSelection),
}

#[derive(Debug, Clone)]
enum Mode {
    Browse,
    Search,
    Picker(Picker),
    Details,
}

/// Filtered cards, valid for one collection revision and one set of criteria
struct Cache {
    revision: u64,
    criteria: FilterCriteria,
    filtered: FilteredCards,
}

pub struct GalleryScreen {
    pub criteria: FilterCriteria,
    pub cursor: usize,
    scroll: usize,
    columns: usize,
    mode: Mode,
    cache: Option<Cache>,
}

impl GalleryScreen {
    pub fn new() -> Self {
        Self {
            criteria: FilterCriteria::default(),
            cursor: 0,
            scroll: 0,
            columns: 1,
            mode: Mode::Browse,
            cache: None,
        }
    }

    /// Recompute the filtered list when the collection or the filters changed
    fn refresh(&mut self, state: &DexState) {
        let revision = state.collection.revision();
        let fresh = self
            .cache
            .as_ref()
            .is_some_and(|cache| cache.revision == revision && cache.criteria == self.criteria);
        if fresh {
            return;
        }
        let filtered = match state.collection.get() {
            Some(db) => filter_cards(db, &self.criteria, state.assets.as_ref()),
            None => FilteredCards::default(),
        };
        self.cursor = self.cursor.min(filtered.len().saturating_sub(1));
        self.cache = Some(Cache {
            revision,
            criteria: self.criteria.clone(),
            filtered,
        });
    }

    fn shown(&self) -> usize {
        self.cache.as_ref().map_or(0, |cache| cache.filtered.len())
    }

    fn current(&self) -> Option<&GalleryCard> {
        self.cache
            .as_ref()
            .and_then(|cache| cache.filtered.cards.get(self.cursor))
    }

    fn current_key(&self) -> Option<String> {
        self.current().map(|card| card.key.clone())
    }

    fn move_cursor(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let next = self.cursor as isize + delta;
        self.cursor = next.clamp(0, len as isize - 1) as usize;
    }

    fn open_set_picker(&mut self, state: &DexState) {
        let Some(db) = state.collection.get() else {
            return;
        };
        let mut options = vec![(SetSelection::All.to_string(), PickerChoice::Set(SetSelection::All))];
        options.extend(set_names(db).into_iter().map(|name| {
            (
                name.clone(),
                PickerChoice::Set(SetSelection::Named(name)),
            )
        }));
        let cursor = options
            .iter()
            .position(|(_, choice)| matches!(choice, PickerChoice::Set(s) if *s == self.criteria.set))
            .unwrap_or(0);
        self.mode = Mode::Picker(Picker {
            kind: PickerKind::Set,
            options,
            cursor,
        });
    }

    fn open_pack_picker(&mut self, state: &DexState) -> Option<ScreenAction> {
        let db = state.collection.get()?;
        let packs = available_packs(db, &self.criteria.set);
        if packs.is_empty() {
            return Some(ScreenAction::Notify(
                "This set has no sub-packs to choose from".into(),
            ));
        }
        let mut options = vec![(PackSelection::All.to_string(), PickerChoice::Pack(PackSelection::All))];
        options.extend(
            packs
                .into_iter()
                .map(|pack| (pack.to_string(), PickerChoice::Pack(pack))),
        );
        let cursor = options
            .iter()
            .position(|(_, choice)| matches!(choice, PickerChoice::Pack(p) if *p == self.criteria.pack))
            .unwrap_or(0);
        self.mode = Mode::Picker(Picker {
            kind: PickerKind::Pack,
            options,
            cursor,
        });
        None
    }

    fn apply_choice(&mut self, choice: PickerChoice) {
        match choice {
            PickerChoice::Set(set) => {
                if set != self.criteria.set {
                    self.criteria.pack = PackSelection::All;
                }
                self.criteria.set = set;
            }
            PickerChoice::Pack(pack) => self.criteria.pack = pack,
        }
        self.cursor = 0;
        self.scroll = 0;
    }

    fn handle_picker_key(&mut self, key: KeyEvent) {
        let Mode::Picker(picker) = &mut self.mode else {
            return;
        };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                picker.cursor = picker.cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if picker.cursor + 1 < picker.options.len() {
                    picker.cursor += 1;
                }
            }
            KeyCode::Enter => {
                let choice = picker.options.get(picker.cursor).map(|(_, c)| c.clone());
                self.mode = Mode::Browse;
                if let Some(choice) = choice {
                    self.apply_choice(choice);
                }
            }
            KeyCode::Esc => self.mode = Mode::Browse,
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => self.criteria.name.push(c),
            KeyCode::Backspace => {
                self.criteria.name.pop();
            }
            KeyCode::Esc => {
                self.criteria.name.clear();
                self.mode = Mode::Browse;
            }
            KeyCode::Enter => self.mode = Mode::Browse,
            _ => return,
        }
        self.cursor = 0;
        self.scroll = 0;
    }

    fn filter_summary(&self) -> Line<'static> {
        let mut spans = vec![
            Span::styled(
                self.criteria.set.to_string(),
                Style::default()
                    .fg(Theme::GOLD)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" / ", Style::default().fg(Theme::DIM_TEXT)),
            Span::styled(self.criteria.pack.to_string(), Style::default().fg(Theme::MUTED_TEXT)),
        ];
        let toggles = [
            ("owned", self.criteria.owned, Theme::OWNED),
            ("wanted", self.criteria.wanted, Theme::WANTED),
            ("missing", self.criteria.missing, Theme::CARD_MISSING),
            ("trade", self.criteria.trade, Theme::TRADE),
        ];
        for (label, on, color) in toggles {
            if on {
                spans.push(Span::styled(format!("  +{}", label), Style::default().fg(color)));
            }
        }
        let searching = matches!(self.mode, Mode::Search);
        if searching || !self.criteria.name.is_empty() {
            let cursor = if searching { "_" } else { "" };
            spans.push(Span::styled(
                format!("  /{}{}", self.criteria.name, cursor),
                Style::default().fg(Theme::BRIGHT_TEXT),
            ));
        }
        Line::from(spans)
    }

    fn render_grid(&mut self, frame: &mut Frame, area: Rect) {
        let len = self.shown();
        if len == 0 {
            let toggles = self.criteria.active_toggles();
            let hint = if self.criteria.set == SetSelection::None {
                "Press s to pick a set".to_string()
            } else if toggles > 0 {
                format!("No cards match; press c to clear {} status filter(s)", toggles)
            } else {
                "No cards match these filters".to_string()
            };
            let empty = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(hint, Style::default().fg(Theme::MUTED_TEXT))),
            ])
            .alignment(Alignment::Center);
            frame.render_widget(empty, area);
            return;
        }

        if area.width < CARD_WIDTH || area.height < CARD_HEIGHT {
            let small = Paragraph::new(Span::styled(
                "Terminal too small to show cards",
                Style::default().fg(Theme::MUTED_TEXT),
            ))
            .alignment(Alignment::Center);
            frame.render_widget(small, area);
            return;
        }

        self.columns = (area.width / CARD_WIDTH) as usize;
        let visible_rows = (area.height / CARD_HEIGHT) as usize;
        let cursor_row = self.cursor / self.columns;
        if cursor_row < self.scroll {
            self.scroll = cursor_row;
        } else if cursor_row >= self.scroll + visible_rows {
            self.scroll = cursor_row + 1 - visible_rows;
        }

        let Some(cache) = &self.cache else {
            return;
        };
        let first = self.scroll * self.columns;
        let last = (first + visible_rows * self.columns).min(len);
        for (offset, entry) in cache.filtered.cards[first..last].iter().enumerate() {
            let row = (offset / self.columns) as u16;
            let col = (offset % self.columns) as u16;
            let tile_area = Rect::new(
                area.x + col * CARD_WIDTH,
                area.y + row * CARD_HEIGHT,
                CARD_WIDTH,
                CARD_HEIGHT,
            );
            let tile = CardTile::new(&entry.key, &entry.card)
                .has_image(entry.image.is_some())
                .selected(first + offset == self.cursor);
            frame.render_widget(tile, tile_area);
        }
    }

    fn render_details(&self, frame: &mut Frame, area: Rect) {
        let Some(entry) = self.current() else {
            return;
        };
        let card = &entry.card;
        let muted = Style::default().fg(Theme::MUTED_TEXT);
        let rarity = card
            .rarity
            .rarity()
            .map(|r| format!("{} ({})", r.symbols(), r.code()))
            .unwrap_or_else(|| "unknown".to_string());
        let image = entry
            .image
            .as_ref()
            .map(|img| img.to_string())
            .unwrap_or_else(|| "no image".to_string());

        let popup = PopupWidget::new(card.name.clone())
            .line(format!("Key       {}", entry.key), muted)
            .line(format!("Number    {}", card.number), muted)
            .line(format!("Set       {}", card.set_base_name), muted)
            .line(format!("Pack      {}", card.set_display_name), muted)
            .line(format!("Rarity    {}", rarity), Style::default().fg(Theme::GOLD))
            .line(format!("Owned     {}", yes_no(card.owned)), Style::default().fg(Theme::OWNED))
            .line(
                format!("Wanted    {} (desirability {})", yes_no(card.is_wanted()), card.desirability),
                Style::default().fg(Theme::WANTED),
            )
            .line(
                format!("Trade     {}", yes_no(card.trade_desirability)),
                Style::default().fg(Theme::TRADE),
            )
            .line(
                format!(
                    "Source    {}{}",
                    if card.obtainable { "obtainable " } else { "" },
                    if card.tradable { "tradable" } else { "" }
                ),
                muted,
            )
            .line(format!("Image     {}", image), Style::default().fg(Theme::DIM_TEXT))
            .size(70, 60);
        frame.render_widget(popup, area);
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

impl Screen for GalleryScreen {
    fn render(&mut self, frame: &mut Frame, area: Rect, state: &DexState) {
        self.refresh(state);
        let (shown, renderable) = self
            .cache
            .as_ref()
            .map_or((0, 0), |cache| {
                (cache.filtered.len(), cache.filtered.renderable_count())
            });
        let stats = state
            .collection
            .get()
            .map(|db| db.stats())
            .unwrap_or_default();

        let chunks = Layout::vertical([
            Constraint::Length(1), // Stats
            Constraint::Length(2), // Filters
            Constraint::Min(0),    // Grid
            Constraint::Length(1), // Footer
        ])
        .split(area);

        frame.render_widget(StatsBar::new(stats).shown(shown, renderable), chunks[0]);

        let filter_block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Theme::CARD_BORDER));
        let filter_inner = filter_block.inner(chunks[1]);
        frame.render_widget(filter_block, chunks[1]);
        frame.render_widget(Paragraph::new(self.filter_summary()), filter_inner);

        self.render_grid(frame, chunks[2]);
        frame.render_widget(KeyHints::new(&HINTS), chunks[3]);

        match &self.mode {
            Mode::Picker(picker) => {
                let title = match picker.kind {
                    PickerKind::Set => "Choose set",
                    PickerKind::Pack => "Choose pack",
                };
                let popup = picker
                    .options
                    .iter()
                    .fold(PopupWidget::new(title), |popup, (label, _)| {
                        popup.line(label.clone(), Style::default().fg(Theme::MUTED_TEXT))
                    })
                    .size(40, 50)
                    .cursor(picker.cursor);
                frame.render_widget(popup, area);
            }
            Mode::Details => self.render_details(frame, area),
            Mode::Browse | Mode::Search => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent, state: &DexState) -> Option<ScreenAction> {
        match self.mode {
            Mode::Picker(_) => {
                self.handle_picker_key(key);
                return None;
            }
            Mode::Search => {
                self.handle_search_key(key);
                return None;
            }
            Mode::Details => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                    self.mode = Mode::Browse;
                }
                return None;
            }
            Mode::Browse => {}
        }

        self.refresh(state);
        let len = self.shown();
        let columns = self.columns as isize;
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(-1, len),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(1, len),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-columns, len),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(columns, len),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = len.saturating_sub(1),
            KeyCode::Enter => {
                if self.current().is_some() {
                    self.mode = Mode::Details;
                }
            }

            KeyCode::Char('o') => return self.current_key().map(ScreenAction::ToggleOwned),
            KeyCode::Char('w') => return self.current_key().map(ScreenAction::ToggleWanted),
            KeyCode::Char('t') => return self.current_key().map(ScreenAction::ToggleTrade),

            KeyCode::Char('s') => self.open_set_picker(state),
            KeyCode::Char('p') => return self.open_pack_picker(state),
            KeyCode::Char('O') => self.criteria.owned = !self.criteria.owned,
            KeyCode::Char('W') => self.criteria.wanted = !self.criteria.wanted,
            KeyCode::Char('M') => self.criteria.missing = !self.criteria.missing,
            KeyCode::Char('T') => self.criteria.trade = !self.criteria.trade,
            KeyCode::Char('c') => {
                self.criteria = FilterCriteria {
                    set: self.criteria.set.clone(),
                    ..Default::default()
                };
            }
            KeyCode::Char('/') => self.mode = Mode::Search,

            KeyCode::Char('i') => return Some(ScreenAction::OpenImport),
            KeyCode::Char('e') => return Some(ScreenAction::Export),
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
    use packdex_core::{
        CardDatabase, CardRecord, CardStore, Collection, FileStore, NoAssets, PackBoard, Rarity,
        SavedPacks,
    };
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn state_with_card(dir: &std::path::Path) -> DexState {
        let store = FileStore::in_dir(dir);
        let mut db = CardDatabase::new();
        db.insert(
            "a1-096",
            CardRecord::new("Pikachu ex", "Genetic Apex", Rarity::DoubleRare),
        );
        store.save(&db).unwrap();
        let mut collection = Collection::new(store);
        collection.load().unwrap();
        DexState {
            collection,
            board: PackBoard::new(SavedPacks::new()),
            assets: Box::new(NoAssets),
            now: 0,
        }
    }

    fn draw(screen: &mut GalleryScreen, state: &DexState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| screen.render(frame, frame.area(), state))
            .unwrap();
        let buf = terminal.backend().buffer();
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_short_terminal_renders_without_cards() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_card(dir.path());
        let mut screen = GalleryScreen::new();
        screen.criteria.set = SetSelection::All;

        let screen_text = draw(&mut screen, &state, 40, 7);
        assert!(screen_text.contains("Terminal too small"));
        assert!(!screen_text.contains("Pikachu ex"));

        // Narrower than one card
        let screen_text = draw(&mut screen, &state, 12, 20);
        assert!(!screen_text.contains("Pikachu"));
    }

    #[test]
    fn test_grid_shows_card_when_it_fits() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_card(dir.path());
        let mut screen = GalleryScreen::new();
        screen.criteria.set = SetSelection::All;

        let screen_text = draw(&mut screen, &state, 40, 10);
        assert!(screen_text.contains("Pikachu ex"));
    }

    #[test]
    fn test_move_cursor_clamps() {
        let mut screen = GalleryScreen::new();
        screen.move_cursor(-1, 10);
        assert_eq!(screen.cursor, 0);
        screen.move_cursor(4, 10);
        assert_eq!(screen.cursor, 4);
        screen.move_cursor(20, 10);
        assert_eq!(screen.cursor, 9);
        screen.move_cursor(1, 0);
        assert_eq!(screen.cursor, 0);
    }

    #[test]
    fn test_choosing_a_new_set_resets_pack() {
        let mut screen = GalleryScreen::new();
        screen.criteria.set = SetSelection::Named("Genetic Apex".into());
        screen.criteria.pack = PackSelection::CorePool;
        screen.apply_choice(PickerChoice::Set(SetSelection::Named("Mythical Island".into())));
        assert_eq!(screen.criteria.pack, PackSelection::All);
        assert_eq!(
            screen.criteria.set,
            SetSelection::Named("Mythical Island".into())
        );
    }

    #[test]
    fn test_search_edits_name_filter() {
        let mut screen = GalleryScreen::new();
        screen.mode = Mode::Search;
        for c in "pika".chars() {
            screen.handle_search_key(KeyEvent::from(KeyCode::Char(c)));
        }
        screen.handle_search_key(KeyEvent::from(KeyCode::Backspace));
        assert_eq!(screen.criteria.name, "pik");
        screen.handle_search_key(KeyEvent::from(KeyCode::Esc));
        assert!(screen.criteria.name.is_empty());
        assert!(matches!(screen.mode, Mode::Browse));
    }
}
