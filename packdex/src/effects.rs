use ratatui::style::Color;
use tachyonfx::fx;
use tachyonfx::{Effect, EffectManager, Interpolation, Motion};

use packdex_widgets::Theme;

/// Keyed effect manager; a new effect under a key replaces the running one
pub type FxManager = EffectManager<&'static str>;

pub const SCREEN_TRANSITION: &str = "screen_transition";
pub const SHARE_HIGHLIGHT: &str = "share_highlight";
pub const IMPORT_REVEAL: &str = "import_reveal";
pub const ERROR_FLASH: &str = "error_flash";

const DARK: Color = Theme::BG;

/// Screen transition: content sweeps in from the left
pub fn screen_transition() -> Effect {
    fx::sweep_in(
        Motion::LeftToRight,
        8,
        2,
        DARK,
        (400, Interpolation::CubicOut),
    )
}

/// Freshly imported collection materializes from empty space
pub fn import_reveal() -> Effect {
    fx::coalesce((450, Interpolation::CubicOut))
}

/// Pulse the pack list green once shared packs are stamped
pub fn share_highlight() -> Effect {
    let flash = fx::fade_to_fg(Theme::READY, (200, Interpolation::QuadOut));
    let back = fx::fade_from_fg(Theme::READY, (600, Interpolation::QuadIn));
    fx::sequence(&[flash, back])
}

/// Short red pulse on the status line when an action fails
pub fn error_flash() -> Effect {
    let shift = fx::hsl_shift_fg([0.0, 0.2, 0.15], (250, Interpolation::SineInOut));
    fx::ping_pong(shift)
}
