use std::fmt;

/// Card rarity tiers, numbered the way the card database stores them
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rarity {
    Common = 1,         // ♢
    Uncommon = 2,       // ♢♢
    Rare = 3,           // ♢♢♢
    DoubleRare = 4,     // ♢♢♢♢ (ex)
    ArtRare = 5,        // ☆
    SuperRare = 6,      // ☆☆
    SpecialArtRare = 7, // ★★ (rainbow)
    Immersive = 8,      // ☆☆☆
    UltraRare = 9,      // crown
    Shiny = 10,
    DoubleShiny = 11,
    ImmersiveShiny = 12,
}

impl Rarity {
    pub const ALL: [Rarity; 12] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::DoubleRare,
        Rarity::ArtRare,
        Rarity::SuperRare,
        Rarity::SpecialArtRare,
        Rarity::Immersive,
        Rarity::UltraRare,
        Rarity::Shiny,
        Rarity::DoubleShiny,
        Rarity::ImmersiveShiny,
    ];

    pub fn tier(&self) -> u8 {
        *self as u8
    }

    pub fn from_tier(tier: u8) -> Option<Rarity> {
        Self::ALL.iter().copied().find(|r| r.tier() == tier)
    }

    /// Legacy short code used by older database exports
    pub fn code(&self) -> &'static str {
        match self {
            Rarity::Common => "C",
            Rarity::Uncommon => "U",
            Rarity::Rare => "R",
            Rarity::DoubleRare => "RR",
            Rarity::ArtRare => "AR",
            Rarity::SuperRare => "SR",
            Rarity::SpecialArtRare => "SAR",
            Rarity::Immersive => "IM",
            Rarity::UltraRare => "UR",
            Rarity::Shiny => "S",
            Rarity::DoubleShiny => "SSR",
            Rarity::ImmersiveShiny => "IR",
        }
    }

    pub fn from_code(code: &str) -> Option<Rarity> {
        Self::ALL.iter().copied().find(|r| r.code() == code)
    }

    /// Map a bracketed symbol run from a pack-card string to a tier.
    ///
    /// Runs outside the known table fall back to `Common`.
    pub fn from_symbols(symbols: &str) -> Rarity {
        match symbols {
            "\u{2662}" => Rarity::Common,
            "\u{2662}\u{2662}" => Rarity::Uncommon,
            "\u{2662}\u{2662}\u{2662}" => Rarity::Rare,
            "\u{2662}\u{2662}\u{2662}\u{2662}" => Rarity::DoubleRare,
            "\u{2606}" => Rarity::ArtRare,
            "\u{2606}\u{2606}" => Rarity::SuperRare,
            "\u{2605}\u{2605}" => Rarity::SpecialArtRare,
            _ => Rarity::Common,
        }
    }

    /// Short symbol rendering for the UI
    pub fn symbols(&self) -> &'static str {
        match self {
            Rarity::Common => "\u{2662}",
            Rarity::Uncommon => "\u{2662}\u{2662}",
            Rarity::Rare => "\u{2662}\u{2662}\u{2662}",
            Rarity::DoubleRare => "\u{2662}\u{2662}\u{2662}\u{2662}",
            Rarity::ArtRare => "\u{2606}",
            Rarity::SuperRare => "\u{2606}\u{2606}",
            Rarity::SpecialArtRare => "\u{2605}\u{2605}",
            Rarity::Immersive => "\u{2606}\u{2606}\u{2606}",
            Rarity::UltraRare => "\u{265b}",
            Rarity::Shiny => "\u{2726}",
            Rarity::DoubleShiny => "\u{2726}\u{2726}",
            Rarity::ImmersiveShiny => "\u{2726}\u{2726}\u{2726}",
        }
    }

    pub fn desirability(&self) -> u8 {
        desirability_of(self.tier())
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbols())
    }
}

/// Desirability tier a wanted card gets from its rarity tier (0 = not wanted)
pub fn desirability_of(tier: u8) -> u8 {
    match tier {
        1 | 2 => 1,
        3 => 2,
        4 | 5 => 3,
        6 | 7 => 4,
        _ => 0,
    }
}
