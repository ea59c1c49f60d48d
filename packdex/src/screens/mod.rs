pub mod gallery;
pub mod import;
pub mod packs;

use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use ratatui::Frame;

use crate::app::{DexState, ScreenAction};

/// Trait for app screens
pub trait Screen {
    fn render(&mut self, frame: &mut Frame, area: Rect, state: &DexState);
    fn handle_key(&mut self, key: KeyEvent, state: &DexState) -> Option<ScreenAction>;
}
