use std::collections::BTreeSet;
use std::fmt;

use crate::assets::{resolve_image, AssetLookup, ImageSource};
use crate::card::CardRecord;
use crate::database::CardDatabase;

/// Label of the pack option covering cards that belong to no named sub-pack
pub const CORE_POOL_LABEL: &str = "Core Pool";

/// Known sets in release order
pub const CARD_SETS: [&str; 6] = [
    "Genetic Apex",
    "Mythical Island",
    "Space-Time Smackdown",
    "Triumphant Light",
    "Shining Revelry",
    "Celestial Guardians",
];

/// Which set the gallery shows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SetSelection {
    /// Show nothing (initial state)
    #[default]
    None,
    All,
    Named(String),
}

impl SetSelection {
    /// First word of the set name; core-pool cards carry it as their display name
    pub fn core_prefix(&self) -> &str {
        match self {
            SetSelection::Named(name) => name.split(' ').next().unwrap_or_default(),
            _ => "",
        }
    }
}

impl fmt::Display for SetSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetSelection::None => write!(f, "No set"),
            SetSelection::All => write!(f, "All sets"),
            SetSelection::Named(name) => write!(f, "{}", name),
        }
    }
}

/// Which sub-pack of the selected set the gallery shows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PackSelection {
    #[default]
    All,
    CorePool,
    Named(String),
}

impl fmt::Display for PackSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackSelection::All => write!(f, "All packs"),
            PackSelection::CorePool => write!(f, "{}", CORE_POOL_LABEL),
            PackSelection::Named(name) => write!(f, "{}", name),
        }
    }
}

/// Gallery filter settings; every enabled predicate must pass
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    pub set: SetSelection,
    pub pack: PackSelection,
    pub owned: bool,
    pub wanted: bool,
    pub missing: bool,
    pub trade: bool,
    /// Case-insensitive substring of the card name; empty matches everything
    pub name: String,
}

impl FilterCriteria {
    pub fn matches(&self, card: &CardRecord) -> bool {
        match &self.set {
            SetSelection::None => return false,
            SetSelection::All => {}
            SetSelection::Named(set) => {
                if card.set_base_name != *set {
                    return false;
                }
            }
        }

        match &self.pack {
            PackSelection::All => {}
            PackSelection::CorePool => {
                let prefix = self.set.core_prefix();
                if prefix.is_empty() || card.set_display_name != prefix {
                    return false;
                }
            }
            PackSelection::Named(pack) => {
                if card.set_display_name != *pack {
                    return false;
                }
            }
        }

        if self.owned && !card.owned {
            return false;
        }
        if self.wanted && card.desirability == 0 {
            return false;
        }
        if self.missing && card.owned {
            return false;
        }
        if self.trade && !card.trade_desirability {
            return false;
        }

        let needle = self.name.trim();
        needle.is_empty() || card.name.to_lowercase().contains(&needle.to_lowercase())
    }

    /// Number of toggle filters switched on
    pub fn active_toggles(&self) -> usize {
        [self.owned, self.wanted, self.missing, self.trade]
            .iter()
            .filter(|on| **on)
            .count()
    }
}

/// A card that passed the filters, with its resolved image
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryCard {
    pub key: String,
    pub card: CardRecord,
    pub image: Option<ImageSource>,
}

/// Result of a filter pass.
///
/// Every matching card is kept so counts reflect the filter; only cards with an
/// image are renderable as artwork.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredCards {
    pub cards: Vec<GalleryCard>,
}

impl FilteredCards {
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn renderable(&self) -> impl Iterator<Item = &GalleryCard> {
        self.cards.iter().filter(|c| c.image.is_some())
    }

    pub fn renderable_count(&self) -> usize {
        self.renderable().count()
    }
}

/// Apply `criteria` to the database in key order and resolve images for the survivors
pub fn filter_cards(
    db: &CardDatabase,
    criteria: &FilterCriteria,
    assets: &dyn AssetLookup,
) -> FilteredCards {
    let cards = db
        .iter()
        .filter(|(_, card)| criteria.matches(card))
        .map(|(key, card)| GalleryCard {
            key: key.to_string(),
            card: card.clone(),
            image: resolve_image(key, card, assets),
        })
        .collect();
    FilteredCards { cards }
}

/// Pack options for a set: named sub-packs alphabetically, then the core pool.
///
/// Empty when the set has no genuine sub-pack, which hides the pack selector.
pub fn available_packs(db: &CardDatabase, set: &SetSelection) -> Vec<PackSelection> {
    let SetSelection::Named(set_name) = set else {
        return Vec::new();
    };
    let prefix = set.core_prefix();

    let mut named = BTreeSet::new();
    let mut has_core = false;
    for (_, card) in db.iter().filter(|(_, c)| c.set_base_name == *set_name) {
        if card.set_display_name == prefix {
            has_core = true;
        } else {
            named.insert(card.set_display_name.clone());
        }
    }

    if named.is_empty() {
        return Vec::new();
    }

    let mut packs: Vec<PackSelection> = named.into_iter().map(PackSelection::Named).collect();
    if has_core {
        packs.push(PackSelection::CorePool);
    }
    packs
}

/// Set names present in the database, known sets first in release order
pub fn set_names(db: &CardDatabase) -> Vec<String> {
    let present: BTreeSet<&str> = db.iter().map(|(_, c)| c.set_base_name.as_str()).collect();
    let mut names: Vec<String> = CARD_SETS
        .iter()
        .filter(|s| present.contains(*s))
        .map(|s| s.to_string())
        .collect();
    names.extend(
        present
            .iter()
            .filter(|s| !s.is_empty() && !CARD_SETS.contains(*s))
            .map(|s| s.to_string()),
    );
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::NoAssets;
    use crate::rarity::Rarity;

    const APEX: &str = "Genetic Apex";

    fn db() -> CardDatabase {
        let mut db = CardDatabase::new();
        db.insert(
            "a1-001",
            CardRecord::new("Bulbasaur", APEX, Rarity::Common)
                .with_pack("Mewtwo")
                .with_image("b.png")
                .owned(true),
        );
        db.insert(
            "a1-094",
            CardRecord::new("Pikachu", APEX, Rarity::Common)
                .with_pack("Pikachu")
                .with_image("p.png"),
        );
        db.insert(
            "a1-096",
            CardRecord::new("Pikachu ex", APEX, Rarity::DoubleRare)
                .with_pack("Pikachu")
                .obtainable(true)
                .tradable(true),
        );
        db.insert(
            "a1-227",
            CardRecord::new("Bulbasaur", APEX, Rarity::ArtRare).with_image("b2.png"),
        );
        db.insert(
            "a1a-001",
            CardRecord::new("Exeggcute", "Mythical Island", Rarity::Common).with_image("e.png"),
        );
        db.set_wanted("a1-096", true).unwrap();
        db
    }

    fn keys(filtered: &FilteredCards) -> Vec<&str> {
        filtered.cards.iter().map(|c| c.key.as_str()).collect()
    }

    fn named(set: &str) -> SetSelection {
        SetSelection::Named(set.to_string())
    }

    #[test]
    fn test_none_selects_nothing() {
        let criteria = FilterCriteria::default();
        assert!(filter_cards(&db(), &criteria, &NoAssets).is_empty());
    }

    #[test]
    fn test_all_sets() {
        let criteria = FilterCriteria {
            set: SetSelection::All,
            ..Default::default()
        };
        assert_eq!(filter_cards(&db(), &criteria, &NoAssets).len(), 5);
    }

    #[test]
    fn test_set_and_pack() {
        let mut criteria = FilterCriteria {
            set: named(APEX),
            pack: PackSelection::Named("Pikachu".into()),
            ..Default::default()
        };
        assert_eq!(keys(&filter_cards(&db(), &criteria, &NoAssets)), ["a1-094", "a1-096"]);

        criteria.pack = PackSelection::CorePool;
        assert_eq!(keys(&filter_cards(&db(), &criteria, &NoAssets)), ["a1-227"]);
    }

    #[test]
    fn test_status_filters() {
        let base = FilterCriteria {
            set: SetSelection::All,
            ..Default::default()
        };
        let owned = FilterCriteria { owned: true, ..base.clone() };
        let wanted = FilterCriteria { wanted: true, ..base.clone() };
        let missing = FilterCriteria { missing: true, ..base.clone() };
        let trade = FilterCriteria { trade: true, ..base.clone() };

        assert_eq!(keys(&filter_cards(&db(), &owned, &NoAssets)), ["a1-001"]);
        assert_eq!(keys(&filter_cards(&db(), &wanted, &NoAssets)), ["a1-096"]);
        assert_eq!(filter_cards(&db(), &missing, &NoAssets).len(), 4);
        assert_eq!(keys(&filter_cards(&db(), &trade, &NoAssets)), ["a1-096"]);

        // Owned and missing together exclude everything
        let both = FilterCriteria { owned: true, missing: true, ..base };
        assert!(filter_cards(&db(), &both, &NoAssets).is_empty());
    }

    #[test]
    fn test_active_toggles_counts_status_filters() {
        let mut criteria = FilterCriteria {
            set: SetSelection::All,
            name: "pika".into(),
            ..Default::default()
        };
        assert_eq!(criteria.active_toggles(), 0);
        criteria.owned = true;
        criteria.trade = true;
        assert_eq!(criteria.active_toggles(), 2);
    }

    #[test]
    fn test_core_pool_without_named_set_matches_nothing() {
        let mut db = db();
        db.insert(
            "p-001",
            CardRecord::new("Potion", "", Rarity::Common).with_image("potion.png"),
        );
        for set in [SetSelection::All, SetSelection::None] {
            let criteria = FilterCriteria {
                set: set.clone(),
                pack: PackSelection::CorePool,
                ..Default::default()
            };
            assert!(filter_cards(&db, &criteria, &NoAssets).is_empty(), "{:?}", set);
        }
    }

    #[test]
    fn test_name_filter_is_case_insensitive() {
        let criteria = FilterCriteria {
            set: SetSelection::All,
            name: "PIKA".into(),
            ..Default::default()
        };
        assert_eq!(keys(&filter_cards(&db(), &criteria, &NoAssets)), ["a1-094", "a1-096"]);
    }

    #[test]
    fn test_cards_without_images_are_counted_but_not_renderable() {
        let criteria = FilterCriteria {
            set: named(APEX),
            ..Default::default()
        };
        let filtered = filter_cards(&db(), &criteria, &NoAssets);
        assert_eq!(filtered.len(), 4);
        assert_eq!(filtered.renderable_count(), 3);
        assert!(filtered.renderable().all(|c| c.key != "a1-096"));
    }

    #[test]
    fn test_filter_is_idempotent() {
        let criteria = FilterCriteria {
            set: named(APEX),
            missing: true,
            ..Default::default()
        };
        let db = db();
        assert_eq!(
            filter_cards(&db, &criteria, &NoAssets),
            filter_cards(&db, &criteria, &NoAssets)
        );
    }

    #[test]
    fn test_available_packs_orders_core_pool_last() {
        assert_eq!(
            available_packs(&db(), &named(APEX)),
            vec![
                PackSelection::Named("Mewtwo".into()),
                PackSelection::Named("Pikachu".into()),
                PackSelection::CorePool,
            ]
        );
    }

    #[test]
    fn test_available_packs_hidden_without_sub_packs() {
        assert!(available_packs(&db(), &named("Mythical Island")).is_empty());
        assert!(available_packs(&db(), &SetSelection::All).is_empty());
        assert!(available_packs(&db(), &SetSelection::None).is_empty());
    }

    #[test]
    fn test_set_names_known_first() {
        let mut db = db();
        db.insert("p-001", CardRecord::new("Promo", "Promo-A", Rarity::Common));
        assert_eq!(set_names(&db), vec![APEX, "Mythical Island", "Promo-A"]);
    }
}
