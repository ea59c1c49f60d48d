use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Alignment, Constraint, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;
use tracing::{info, warn};

use packdex_core::pack::load_saved_packs;
use packdex_core::{
    AssetDir, AssetLookup, CardDatabase, Collection, DexError, FileStore, ImportError, NoAssets,
    PackBoard, SavedPacks,
};
use packdex_widgets::footer::{StatusLine, StatusMessage};
use packdex_widgets::theme::Theme;

use crate::config::AppConfig;
use crate::effects::{self, FxManager};
use crate::screens::gallery::GalleryScreen;
use crate::screens::import::ImportScreen;
use crate::screens::packs::{PacksScreen, ShareRequest};
use crate::screens::Screen;

/// Frame budget of the event loop (~30fps)
pub const TICK: Duration = Duration::from_millis(33);

/// Which screen is in front
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Gallery,
    Packs,
    Import,
}

/// Everything the screens read from
pub struct DexState {
    pub collection: Collection<FileStore>,
    pub board: PackBoard,
    pub assets: Box<dyn AssetLookup>,
    /// Epoch seconds, refreshed every tick
    pub now: i64,
}

impl DexState {
    /// Rebuild the pack board if the collection moved on
    fn sync_board(&mut self) {
        let empty = CardDatabase::new();
        let db = self.collection.get().unwrap_or(&empty);
        self.board
            .sync(self.collection.revision(), db, self.assets.as_ref());
    }
}

/// Main application state
pub struct App {
    pub phase: Phase,
    pub state: DexState,
    pub config: AppConfig,
    pub status: Option<StatusMessage>,
    pub fx: FxManager,
    prev_phase: Option<Phase>,

    // Screens
    pub gallery: GalleryScreen,
    pub packs: PacksScreen,
    pub import: ImportScreen,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let mut collection = Collection::new(FileStore::in_dir(&config.data_dir));
        let mut status = None;
        let phase = match collection.load() {
            Ok(_) => Phase::Gallery,
            Err(DexError::NotFound(path)) => {
                info!(path = %path.display(), "no card database yet, starting at import");
                Phase::Import
            }
            Err(e) => {
                warn!(error = %e, "could not load card database");
                status = Some(StatusMessage::Error(e.to_string()));
                Phase::Import
            }
        };

        let saved = load_saved_packs(&config.packs_file).unwrap_or_else(|e| {
            warn!(error = %e, path = %config.packs_file.display(), "could not read saved packs");
            status = Some(StatusMessage::Error(format!("Saved packs: {}", e)));
            SavedPacks::new()
        });

        let assets: Box<dyn AssetLookup> = match &config.assets_dir {
            Some(dir) => Box::new(AssetDir::new(dir)),
            None => Box::new(NoAssets),
        };

        let mut state = DexState {
            collection,
            board: PackBoard::new(saved),
            assets,
            now: chrono::Utc::now().timestamp(),
        };
        state.sync_board();

        let import = ImportScreen::new(config.export_file().display().to_string());
        let mut app = Self {
            phase,
            state,
            status,
            fx: FxManager::default(),
            prev_phase: None,
            gallery: GalleryScreen::new(),
            packs: PacksScreen::new(),
            import,
            config,
        };

        if let Some(path) = app.config.import.clone() {
            app.process_action(Some(ScreenAction::Import(Some(path))));
        }
        app
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(Theme::BG)), area);

        let chunks = Layout::vertical([
            Constraint::Length(1), // Title
            Constraint::Min(0),    // Screen
            Constraint::Length(1), // Status
        ])
        .split(area);

        frame.render_widget(
            Paragraph::new(self.title_line()).alignment(Alignment::Center),
            chunks[0],
        );

        match self.phase {
            Phase::Gallery => self.gallery.render(frame, chunks[1], &self.state),
            Phase::Packs => self.packs.render(frame, chunks[1], &self.state),
            Phase::Import => self.import.render(frame, chunks[1], &self.state),
        }

        frame.render_widget(StatusLine::new(self.status.as_ref()), chunks[2]);

        // Apply all tachyonfx effects on top of rendered content
        let tick_duration = tachyonfx::Duration::from_millis(33); // ~30fps
        let buf = frame.buffer_mut();
        self.fx.process_effects(tick_duration, buf, area);
    }

    fn title_line(&self) -> Line<'static> {
        let tab = |label: &'static str, phase: Phase| {
            if self.phase == phase {
                Span::styled(
                    label,
                    Style::default()
                        .fg(Theme::GOLD)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled(label, Style::default().fg(Theme::DIM_TEXT))
            }
        };
        Line::from(vec![
            Span::styled(
                "PACKDEX  ",
                Style::default()
                    .fg(Theme::BRIGHT_TEXT)
                    .add_modifier(Modifier::BOLD),
            ),
            tab("Collection", Phase::Gallery),
            Span::styled(" \u{00b7} ", Style::default().fg(Theme::DIM_TEXT)),
            tab("Packs", Phase::Packs),
            Span::styled(" \u{00b7} ", Style::default().fg(Theme::DIM_TEXT)),
            tab("Import", Phase::Import),
        ])
    }

    /// Handle key event. Returns true if should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        // Global quit
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        let action = match self.phase {
            Phase::Gallery => self.gallery.handle_key(key, &self.state),
            Phase::Packs => self.packs.handle_key(key, &self.state),
            Phase::Import => self.import.handle_key(key, &self.state),
        };

        self.process_action(action)
    }

    pub fn tick(&mut self) {
        self.state.now = chrono::Utc::now().timestamp();
        self.state.sync_board();

        // Detect phase changes and trigger transition effects
        if self.prev_phase != Some(self.phase) {
            self.fx
                .add_unique_effect(effects::SCREEN_TRANSITION, effects::screen_transition());
            self.prev_phase = Some(self.phase);
        }

        // Pending shares advance even while another screen is in front
        if let Some(action) = self.packs.tick(Instant::now()) {
            self.process_action(Some(action));
        }
    }

    /// Process a screen action. Returns true if should quit.
    fn process_action(&mut self, action: Option<ScreenAction>) -> bool {
        match action {
            Some(ScreenAction::Quit) => return true,
            Some(ScreenAction::SwitchScreen) => {
                self.phase = match self.phase {
                    Phase::Gallery => Phase::Packs,
                    Phase::Packs | Phase::Import => Phase::Gallery,
                };
            }
            Some(ScreenAction::ToggleOwned(key)) => {
                let result = self.state.collection.toggle_owned(&key);
                self.report(result.map(|_| None));
            }
            Some(ScreenAction::ToggleWanted(key)) => {
                let result = self.state.collection.toggle_wanted(&key).map(|changed| {
                    (!changed).then(|| "Only obtainable or tradable cards can be wanted".to_string())
                });
                self.report(result);
            }
            Some(ScreenAction::ToggleTrade(key)) => {
                let result = self.state.collection.toggle_trade(&key);
                self.report(result.map(|_| None));
            }
            Some(ScreenAction::OpenImport) => self.phase = Phase::Import,
            Some(ScreenAction::Import(path)) => self.import_database(path),
            Some(ScreenAction::Export) => {
                let path = self.config.export_file();
                let result = self
                    .state
                    .collection
                    .export(&path)
                    .map(|_| Some(format!("Exported to {}", path.display())));
                self.report(result);
            }
            Some(ScreenAction::ToggleSelected(id)) => {
                self.state.board.toggle_selected(&id);
            }
            Some(ScreenAction::Share(request)) => self.share(request),
            Some(ScreenAction::Notify(text)) => self.status = Some(StatusMessage::Info(text)),
            None => {}
        }

        false
    }

    fn import_database(&mut self, path: Option<PathBuf>) {
        match self.state.collection.import(path.as_deref()) {
            Ok(count) => {
                self.status = Some(StatusMessage::Info(format!("Imported {} cards", count)));
                self.phase = Phase::Gallery;
                self.fx
                    .add_unique_effect(effects::IMPORT_REVEAL, effects::import_reveal());
            }
            Err(DexError::Import(ImportError::Cancelled)) => {
                self.status = Some(StatusMessage::Info("Import cancelled".into()));
                if self.state.collection.is_loaded() {
                    self.phase = Phase::Gallery;
                }
            }
            Err(e) => self.fail(e),
        }
    }

    fn share(&mut self, request: ShareRequest) {
        let now = self.state.now;
        let board = &mut self.state.board;
        let shared = match request {
            ShareRequest::One(id) => match board.share_pack(&id, now) {
                Ok(()) => 1,
                Err(e) => return self.fail(e),
            },
            ShareRequest::AllReady(filter) => board.share_all_ready(&filter, now),
            ShareRequest::Selected => board.share_selected(now),
        };
        let noun = if shared == 1 { "pack" } else { "packs" };
        self.status = Some(StatusMessage::Info(format!("Shared {} {}", shared, noun)));
        self.fx
            .add_unique_effect(effects::SHARE_HIGHLIGHT, effects::share_highlight());
    }

    /// Show the outcome of a collection action in the status line
    fn report(&mut self, result: packdex_core::Result<Option<String>>) {
        match result {
            Ok(Some(message)) => self.status = Some(StatusMessage::Info(message)),
            Ok(None) => self.status = None,
            Err(e) => self.fail(e),
        }
    }

    fn fail(&mut self, error: DexError) {
        self.status = Some(StatusMessage::Error(error.to_string()));
        self.fx
            .add_unique_effect(effects::ERROR_FLASH, effects::error_flash());
    }
}

/// Actions that screens can return
#[derive(Debug, Clone)]
pub enum ScreenAction {
    Quit,
    SwitchScreen,
    ToggleOwned(String),
    ToggleWanted(String),
    ToggleTrade(String),
    OpenImport,
    /// `None` when the import prompt was dismissed
    Import(Option<PathBuf>),
    Export,
    ToggleSelected(String),
    /// A pending share finished its delay
    Share(ShareRequest),
    Notify(String),
}
