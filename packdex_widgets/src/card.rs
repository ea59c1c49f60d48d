use packdex_core::{CardRecord, Rarity};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Widget;

use crate::theme::Theme;

/// Width and height of a card tile in terminal cells
pub const CARD_WIDTH: u16 = 20;
pub const CARD_HEIGHT: u16 = 6;

/// One card of the gallery grid
pub struct CardTile<'a> {
    pub key: &'a str,
    pub card: &'a CardRecord,
    pub has_image: bool,
    pub selected: bool,
}

impl<'a> CardTile<'a> {
    pub fn new(key: &'a str, card: &'a CardRecord) -> Self {
        Self {
            key,
            card,
            has_image: false,
            selected: false,
        }
    }

    pub fn has_image(mut self, has_image: bool) -> Self {
        self.has_image = has_image;
        self
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    fn border_color(&self) -> Color {
        if self.selected {
            Theme::CARD_SELECTED
        } else if self.card.owned {
            Theme::CARD_BORDER
        } else {
            Theme::CARD_MISSING
        }
    }

    fn name_style(&self) -> Style {
        if self.card.owned {
            Style::default()
                .fg(Theme::CARD_FACE)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Theme::MUTED_TEXT)
        }
    }
}

impl Widget for CardTile<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < CARD_WIDTH || area.height < CARD_HEIGHT {
            return;
        }

        let tile = Rect::new(area.x, area.y, CARD_WIDTH, CARD_HEIGHT);
        if tile.intersection(buf.area) != tile {
            return;
        }
        draw_frame(
            tile,
            buf,
            Style::default().fg(self.border_color()),
            self.selected,
        );

        let inner_width = (CARD_WIDTH - 2) as usize;
        let x = tile.x + 1;

        // Name
        buf.set_string(x, tile.y + 1, fit(&self.card.name, inner_width), self.name_style());

        // Rarity on the left, key on the right
        let rarity = self.card.rarity.rarity();
        let (symbols, rarity_color) = match rarity {
            Some(r) => (r.symbols(), Theme::rarity(r)),
            None => ("?", Theme::DIM_TEXT),
        };
        buf.set_string(x, tile.y + 2, symbols, Style::default().fg(rarity_color));
        let key = fit(self.key, inner_width.saturating_sub(symbols.chars().count() + 1));
        let key_x = tile.x + CARD_WIDTH - 1 - key.chars().count() as u16;
        buf.set_string(key_x, tile.y + 2, &key, Style::default().fg(Theme::DIM_TEXT));

        // Sub-pack
        buf.set_string(
            x,
            tile.y + 3,
            fit(&self.card.set_display_name, inner_width),
            Style::default().fg(Theme::DIM_TEXT),
        );

        // Status markers and image indicator
        let markers = [
            ("O", self.card.owned, Theme::OWNED),
            ("W", self.card.is_wanted(), Theme::WANTED),
            ("T", self.card.trade_desirability, Theme::TRADE),
        ];
        for (i, (label, on, color)) in markers.iter().enumerate() {
            let style = if *on {
                Style::default().fg(*color).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Theme::CARD_MISSING)
            };
            buf.set_string(x + i as u16 * 2, tile.y + 4, *label, style);
        }
        let (image_mark, image_color) = if self.has_image {
            ("\u{25a3}", Theme::MUTED_TEXT) // ▣
        } else {
            ("\u{00b7}", Theme::CARD_MISSING) // ·
        };
        buf.set_string(
            tile.x + CARD_WIDTH - 2,
            tile.y + 4,
            image_mark,
            Style::default().fg(image_color),
        );
    }
}

/// Rarity symbols styled with their tier color
pub fn rarity_style(rarity: Rarity) -> Style {
    Style::default().fg(Theme::rarity(rarity))
}

/// Draw a box border and blank its interior; double lines when `double`
pub fn draw_frame(area: Rect, buf: &mut Buffer, border_style: Style, double: bool) {
    let area = area.intersection(buf.area);
    if area.width < 2 || area.height < 2 {
        return;
    }
    let (tl, tr, bl, br, h, v) = if double {
        ("\u{2554}", "\u{2557}", "\u{255a}", "\u{255d}", "\u{2550}", "\u{2551}") // ╔╗╚╝═║
    } else {
        ("\u{256d}", "\u{256e}", "\u{2570}", "\u{256f}", "\u{2500}", "\u{2502}") // ╭╮╰╯─│
    };
    let right = area.x + area.width - 1;
    let bottom = area.y + area.height - 1;

    buf.set_string(area.x, area.y, tl, border_style);
    buf.set_string(right, area.y, tr, border_style);
    buf.set_string(area.x, bottom, bl, border_style);
    buf.set_string(right, bottom, br, border_style);
    for x in area.x + 1..right {
        buf.set_string(x, area.y, h, border_style);
        buf.set_string(x, bottom, h, border_style);
    }
    for y in area.y + 1..bottom {
        buf.set_string(area.x, y, v, border_style);
        buf.set_string(right, y, v, border_style);
        for x in area.x + 1..right {
            buf.set_string(x, y, " ", Style::default());
        }
    }
}

/// Truncate to `width` characters, marking the cut with an ellipsis
pub fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(width - 1).collect();
    out.push('\u{2026}');
    out
}
