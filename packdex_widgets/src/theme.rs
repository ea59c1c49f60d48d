use packdex_core::Rarity;
use ratatui::style::Color;

/// Color theme for the collection TUI
pub struct Theme;

impl Theme {
    // Backgrounds
    pub const BG: Color = Color::Rgb(13, 17, 23);
    pub const PANEL_BG: Color = Color::Rgb(24, 28, 40);

    // Card tiles
    pub const CARD_FACE: Color = Color::Rgb(240, 240, 240);
    pub const CARD_BORDER: Color = Color::Rgb(108, 117, 125);
    pub const CARD_SELECTED: Color = Color::Rgb(255, 214, 10);
    /// Cards the user does not own
    pub const CARD_MISSING: Color = Color::Rgb(80, 80, 100);

    // Collection status markers
    pub const OWNED: Color = Color::Rgb(6, 214, 160);
    pub const WANTED: Color = Color::Rgb(255, 183, 3);
    pub const TRADE: Color = Color::Rgb(76, 201, 240);

    // Rarity tiers
    pub const DIAMOND: Color = Color::Rgb(160, 190, 220);
    pub const STAR: Color = Color::Rgb(255, 214, 10);
    pub const RAINBOW: Color = Color::Rgb(199, 125, 255);
    pub const CROWN: Color = Color::Rgb(255, 140, 60);

    // Cooldown
    pub const READY: Color = Color::Rgb(6, 214, 160);
    pub const COOLING: Color = Color::Rgb(230, 57, 70);

    // UI elements
    pub const GOLD: Color = Color::Rgb(255, 183, 3);
    pub const ERROR: Color = Color::Rgb(230, 57, 70);
    pub const DIM_TEXT: Color = Color::Rgb(100, 100, 120);
    pub const BRIGHT_TEXT: Color = Color::Rgb(255, 255, 255);
    pub const MUTED_TEXT: Color = Color::Rgb(160, 160, 180);

    pub fn rarity(rarity: Rarity) -> Color {
        match rarity.tier() {
            1..=4 => Self::DIAMOND,
            5 | 6 => Self::STAR,
            7 | 12 => Self::RAINBOW,
            8 => Self::CROWN,
            _ => Self::GOLD,
        }
    }
}
