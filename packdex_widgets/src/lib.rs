pub mod card;
pub mod footer;
pub mod pack_row;
pub mod popup;
pub mod stats;
pub mod theme;

pub use theme::Theme;
