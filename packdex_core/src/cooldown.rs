use std::fmt;

use crate::pack::ProcessedPack;
use crate::rarity::Rarity;

/// Seconds a shared pack stays on cooldown (5 days)
pub const COOLDOWN_SECS: i64 = 432_000;

/// Whether a pack shared at `last_shared` can be shared again at `now`
pub fn is_ready(last_shared: i64, now: i64) -> bool {
    now.saturating_sub(last_shared) > COOLDOWN_SECS
}

/// Packs split by cooldown state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classified {
    /// Shareable now, in input order
    pub ready: Vec<ProcessedPack>,
    /// Still cooling down, most recently shared first
    pub expired: Vec<ProcessedPack>,
}

/// Partition packs into ready and cooling-down ("expired") sets
pub fn classify(packs: impl IntoIterator<Item = ProcessedPack>, now: i64) -> Classified {
    let (ready, mut expired): (Vec<_>, Vec<_>) = packs
        .into_iter()
        .partition(|pack| is_ready(pack.last_shared(), now));
    expired.sort_by(|a, b| b.last_shared().cmp(&a.last_shared()));
    Classified { ready, expired }
}

/// Minimum-rarity policy for the pack screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MinRarity {
    #[default]
    Any,
    /// At least one card is a one-star
    OneStar,
    /// Every card is two-star or better
    TwoStar,
    /// Every card is a rainbow two-star
    RainbowTwoStar,
}

impl MinRarity {
    pub const ALL: [MinRarity; 4] = [
        MinRarity::Any,
        MinRarity::OneStar,
        MinRarity::TwoStar,
        MinRarity::RainbowTwoStar,
    ];

    pub fn accepts(&self, pack: &ProcessedPack) -> bool {
        let mut cards = pack.cards.iter();
        match self {
            MinRarity::Any => true,
            MinRarity::OneStar => cards.any(|c| c.rarity == Rarity::ArtRare),
            MinRarity::TwoStar => cards.all(|c| c.rarity >= Rarity::SuperRare),
            MinRarity::RainbowTwoStar => cards.all(|c| c.rarity == Rarity::SpecialArtRare),
        }
    }

    pub fn next(&self) -> MinRarity {
        let idx = Self::ALL.iter().position(|m| m == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for MinRarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MinRarity::Any => write!(f, "Any rarity"),
            MinRarity::OneStar => write!(f, "\u{2606}"),
            MinRarity::TwoStar => write!(f, "\u{2606}\u{2606}"),
            MinRarity::RainbowTwoStar => write!(f, "\u{2605}\u{2605}"),
        }
    }
}

/// Pack screen filters, applied before the cooldown split
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackFilter {
    /// Case-insensitive substring of any card name in the pack
    pub card_name: String,
    /// Exact set base name
    pub set: Option<String>,
    pub min_rarity: MinRarity,
    /// Exact top-cards count
    pub top_cards: Option<u8>,
}

impl PackFilter {
    pub fn matches(&self, pack: &ProcessedPack) -> bool {
        let needle = self.card_name.trim().to_lowercase();
        if !needle.is_empty()
            && !pack
                .cards
                .iter()
                .any(|c| c.name.to_lowercase().contains(&needle))
        {
            return false;
        }
        if let Some(set) = &self.set {
            if pack.set_base_name != *set {
                return false;
            }
        }
        if !self.min_rarity.accepts(pack) {
            return false;
        }
        match self.top_cards {
            Some(count) => pack.top_cards() == Some(count),
            None => true,
        }
    }

    pub fn is_active(&self) -> bool {
        *self != PackFilter::default()
    }
}

/// Time since a share, e.g. `"2d 3h 15m"`, `"4h 0m"` or `"12m"`
pub fn format_elapsed(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;

    if days > 0 {
        if hours == 0 && minutes == 0 {
            format!("{}d", days)
        } else {
            format!("{}d {}h {}m", days, hours, minutes)
        }
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}
