use packdex_core::cooldown::format_elapsed;
use packdex_core::ProcessedPack;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use crate::card::rarity_style;
use crate::theme::Theme;

/// Rows taken by one pack
pub const PACK_ROW_HEIGHT: u16 = 3;

/// A saved pack in the share list: header line, then its cards
pub struct PackRow<'a> {
    pub pack: &'a ProcessedPack,
    pub now: i64,
    pub highlighted: bool,
    pub checked: bool,
    /// A share of this pack is waiting on its delay
    pub pending: bool,
}

impl<'a> PackRow<'a> {
    pub fn new(pack: &'a ProcessedPack, now: i64) -> Self {
        Self {
            pack,
            now,
            highlighted: false,
            checked: false,
            pending: false,
        }
    }

    pub fn highlighted(mut self, highlighted: bool) -> Self {
        self.highlighted = highlighted;
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn pending(mut self, pending: bool) -> Self {
        self.pending = pending;
        self
    }

    fn status(&self) -> Span<'static> {
        if self.pending {
            return Span::styled("sharing\u{2026}", Style::default().fg(Theme::GOLD));
        }
        match self.pack.last_shared() {
            0 => Span::styled("never shared", Style::default().fg(Theme::READY)),
            last => {
                let color = if packdex_core::cooldown::is_ready(last, self.now) {
                    Theme::READY
                } else {
                    Theme::COOLING
                };
                Span::styled(
                    format!("shared {} ago", format_elapsed(self.now.saturating_sub(last))),
                    Style::default().fg(color),
                )
            }
        }
    }
}

impl Widget for PackRow<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area);
        if area.height < 2 {
            return;
        }

        let pointer = if self.highlighted { "> " } else { "  " };
        let checkbox = if self.checked { "[x] " } else { "[ ] " };
        let label_style = if self.highlighted {
            Style::default()
                .fg(Theme::CARD_SELECTED)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Theme::BRIGHT_TEXT)
        };

        let mut header = vec![
            Span::styled(pointer, Style::default().fg(Theme::CARD_SELECTED)),
            Span::styled(checkbox, Style::default().fg(Theme::MUTED_TEXT)),
            Span::styled(self.pack.pack.pack_label.clone(), label_style),
            Span::raw("  "),
            self.status(),
        ];
        if let Some(top) = self.pack.top_cards() {
            header.push(Span::styled(
                format!("  top {}", top),
                Style::default().fg(Theme::GOLD),
            ));
        }
        if self.pack.pack.is_godpack {
            header.push(Span::styled(
                "  GOD PACK",
                Style::default().fg(Theme::RAINBOW).add_modifier(Modifier::BOLD),
            ));
        }
        buf.set_line(area.x, area.y, &Line::from(header), area.width);

        let mut cards = vec![Span::raw("      ")];
        for (i, card) in self.pack.cards.iter().enumerate() {
            if i > 0 {
                cards.push(Span::styled(" \u{00b7} ", Style::default().fg(Theme::DIM_TEXT)));
            }
            let name_style = if card.owned {
                Style::default().fg(Theme::CARD_FACE)
            } else {
                Style::default().fg(Theme::CARD_MISSING)
            };
            cards.push(Span::styled(card.name.clone(), name_style));
            cards.push(Span::raw(" "));
            cards.push(Span::styled(card.rarity.symbols(), rarity_style(card.rarity)));
        }
        buf.set_line(area.x, area.y + 1, &Line::from(cards), area.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packdex_core::SavedPack;

    fn pack(last_shared: Option<i64>) -> ProcessedPack {
        let mut saved = SavedPack::new("Genetic Apex - Pikachu", Vec::new());
        saved.last_shared_timestamp = last_shared;
        ProcessedPack {
            id: "p1".into(),
            pack: saved,
            set_base_name: "Genetic Apex".into(),
            set_name: "Pikachu".into(),
            cards: Vec::new(),
        }
    }

    #[test]
    fn test_status_text() {
        let never = pack(None);
        assert_eq!(PackRow::new(&never, 1_000).status().content, "never shared");

        let recent = pack(Some(1_000));
        assert_eq!(PackRow::new(&recent, 1_000 + 3_600).status().content, "shared 1h 0m ago");

        let pending = PackRow::new(&recent, 0).pending(true);
        assert_eq!(pending.status().content, "sharing\u{2026}");
    }

    #[test]
    fn test_status_with_extreme_timestamp() {
        let odd = pack(Some(i64::MIN));
        let status = PackRow::new(&odd, 1_000).status();
        assert!(status.content.starts_with("shared "));
    }

    #[test]
    fn test_header_shows_label() {
        let p = pack(None);
        let area = Rect::new(0, 0, 60, PACK_ROW_HEIGHT);
        let mut buf = Buffer::empty(area);
        PackRow::new(&p, 0).highlighted(true).render(area, &mut buf);
        let header: String = (0..area.width)
            .map(|x| buf[(x, 0)].symbol().to_string())
            .collect();
        assert!(header.starts_with("> [ ] Genetic Apex - Pikachu"));
    }
}
