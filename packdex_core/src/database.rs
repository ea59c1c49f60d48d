use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::card::CardRecord;
use crate::error::{DexError, Result};

/// The whole collection: card key to record.
///
/// Keys iterate in lexicographic order, so every scan (filtering, fuzzy pack
/// matching) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardDatabase {
    cards: BTreeMap<String, CardRecord>,
}

/// Headline counts for the gallery header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionStats {
    pub total: usize,
    pub owned: usize,
    pub wanted: usize,
    pub trade: usize,
}

impl CardDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&CardRecord> {
        self.cards.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.cards.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CardRecord)> {
        self.cards.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn insert(&mut self, key: impl Into<String>, card: CardRecord) -> Option<CardRecord> {
        self.cards.insert(key.into(), card)
    }

    pub fn stats(&self) -> CollectionStats {
        self.cards.values().fold(
            CollectionStats {
                total: self.cards.len(),
                ..Default::default()
            },
            |mut stats, card| {
                stats.owned += card.owned as usize;
                stats.wanted += card.is_wanted() as usize;
                stats.trade += card.trade_desirability as usize;
                stats
            },
        )
    }

    /// Replace the addressed record with an updated copy
    fn replace(&mut self, key: &str, update: impl FnOnce(&mut CardRecord)) -> Result<()> {
        let mut card = self
            .cards
            .get(key)
            .cloned()
            .ok_or_else(|| DexError::UnknownCard(key.to_string()))?;
        update(&mut card);
        self.cards.insert(key.to_string(), card);
        Ok(())
    }

    /// Set only the owned flag; desirability fields are left alone
    pub fn set_owned(&mut self, key: &str, owned: bool) -> Result<()> {
        self.replace(key, |card| card.owned = owned)
    }

    /// Mark a card wanted or not.
    ///
    /// A wanted, obtainable card gets the desirability of its rarity; everything
    /// else drops to 0. Trade desirability follows `wanted && tradable`, so
    /// un-wanting a card also clears it.
    pub fn set_wanted(&mut self, key: &str, wanted: bool) -> Result<()> {
        self.replace(key, |card| {
            card.desirability = if wanted && card.obtainable {
                card.rarity.desirability() as u32
            } else {
                0
            };
            card.trade_desirability = wanted && card.tradable;
        })
    }

    /// Set trade desirability directly, regardless of tradable/obtainable
    pub fn set_trade_desirability(&mut self, key: &str, flag: bool) -> Result<()> {
        self.replace(key, |card| card.trade_desirability = flag)
    }

    pub fn toggle_owned(&mut self, key: &str) -> Result<()> {
        let owned = self.require(key)?.owned;
        self.set_owned(key, !owned)
    }

    /// Flip wanted; cards that are neither obtainable nor tradable are left untouched.
    ///
    /// Returns whether anything changed.
    pub fn toggle_wanted(&mut self, key: &str) -> Result<bool> {
        let card = self.require(key)?;
        if !(card.obtainable || card.tradable) {
            return Ok(false);
        }
        let wanted = card.desirability == 0;
        self.set_wanted(key, wanted)?;
        Ok(true)
    }

    pub fn toggle_trade(&mut self, key: &str) -> Result<()> {
        let trade = self.require(key)?.trade_desirability;
        self.set_trade_desirability(key, !trade)
    }

    fn require(&self, key: &str) -> Result<&CardRecord> {
        self.cards
            .get(key)
            .ok_or_else(|| DexError::UnknownCard(key.to_string()))
    }
}

impl FromIterator<(String, CardRecord)> for CardDatabase {
    fn from_iter<I: IntoIterator<Item = (String, CardRecord)>>(iter: I) -> Self {
        Self {
            cards: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rarity::Rarity;
    use proptest::prelude::*;

    fn db_with(card: CardRecord) -> CardDatabase {
        let mut db = CardDatabase::new();
        db.insert("a1-001", card);
        db
    }

    #[test]
    fn test_set_wanted_uses_rarity_desirability() {
        let card = CardRecord::new("Mewtwo", "Genetic Apex", Rarity::SuperRare)
            .obtainable(true)
            .tradable(true);
        let mut db = db_with(card);
        db.set_wanted("a1-001", true).unwrap();

        let card = db.get("a1-001").unwrap();
        assert_eq!(card.desirability, 4);
        assert!(card.trade_desirability);
        assert!(!card.owned);
    }

    #[test]
    fn test_set_wanted_on_unobtainable_card() {
        let card = CardRecord::new("Mewtwo", "Genetic Apex", Rarity::SuperRare).tradable(true);
        let mut db = db_with(card);
        db.set_wanted("a1-001", true).unwrap();

        let card = db.get("a1-001").unwrap();
        assert_eq!(card.desirability, 0);
        // Trade only depends on tradable
        assert!(card.trade_desirability);
    }

    #[test]
    fn test_unwanting_clears_trade() {
        let card = CardRecord::new("Mewtwo", "Genetic Apex", Rarity::SuperRare)
            .obtainable(true)
            .tradable(true);
        let mut db = db_with(card);
        db.set_wanted("a1-001", true).unwrap();
        db.set_wanted("a1-001", false).unwrap();

        let card = db.get("a1-001").unwrap();
        assert_eq!(card.desirability, 0);
        assert!(!card.trade_desirability);
    }

    #[test]
    fn test_set_owned_leaves_desirability() {
        let card = CardRecord::new("Mewtwo", "Genetic Apex", Rarity::Rare)
            .obtainable(true)
            .tradable(true);
        let mut db = db_with(card);
        db.set_wanted("a1-001", true).unwrap();
        db.set_owned("a1-001", true).unwrap();

        let card = db.get("a1-001").unwrap();
        assert!(card.owned);
        assert_eq!(card.desirability, 2);
        assert!(card.trade_desirability);
    }

    #[test]
    fn test_trade_flag_is_independent() {
        let card = CardRecord::new("Mewtwo", "Genetic Apex", Rarity::Rare);
        let mut db = db_with(card);
        db.set_trade_desirability("a1-001", true).unwrap();
        assert!(db.get("a1-001").unwrap().trade_desirability);
        db.toggle_trade("a1-001").unwrap();
        assert!(!db.get("a1-001").unwrap().trade_desirability);
    }

    #[test]
    fn test_toggle_wanted_skips_locked_cards() {
        let card = CardRecord::new("Mewtwo", "Genetic Apex", Rarity::Rare);
        let mut db = db_with(card);
        assert!(!db.toggle_wanted("a1-001").unwrap());
        assert_eq!(db.get("a1-001").unwrap().desirability, 0);

        db.insert(
            "a1-002",
            CardRecord::new("Mew", "Genetic Apex", Rarity::DoubleRare).obtainable(true),
        );
        assert!(db.toggle_wanted("a1-002").unwrap());
        assert_eq!(db.get("a1-002").unwrap().desirability, 3);
        assert!(db.toggle_wanted("a1-002").unwrap());
        assert_eq!(db.get("a1-002").unwrap().desirability, 0);
    }

    #[test]
    fn test_unknown_key() {
        let mut db = CardDatabase::new();
        assert!(matches!(
            db.set_owned("nope", true),
            Err(DexError::UnknownCard(key)) if key == "nope"
        ));
    }

    #[test]
    fn test_stats() {
        let mut db = CardDatabase::new();
        db.insert("1", CardRecord::new("A", "Genetic Apex", Rarity::Common).owned(true));
        db.insert(
            "2",
            CardRecord::new("B", "Genetic Apex", Rarity::Common)
                .obtainable(true)
                .tradable(true),
        );
        db.set_wanted("2", true).unwrap();

        assert_eq!(
            db.stats(),
            CollectionStats {
                total: 2,
                owned: 1,
                wanted: 1,
                trade: 1
            }
        );
    }

    proptest! {
        #[test]
        fn unobtainable_cards_never_gain_desirability(tier in 1u8..=12, tradable in any::<bool>()) {
            let rarity = Rarity::from_tier(tier).unwrap();
            let mut db = db_with(CardRecord::new("X", "Genetic Apex", rarity).tradable(tradable));
            db.set_wanted("a1-001", true).unwrap();
            prop_assert_eq!(db.get("a1-001").unwrap().desirability, 0);
        }

        #[test]
        fn unwanting_always_clears(tier in 1u8..=12, obtainable in any::<bool>(), tradable in any::<bool>()) {
            let rarity = Rarity::from_tier(tier).unwrap();
            let card = CardRecord::new("X", "Genetic Apex", rarity)
                .obtainable(obtainable)
                .tradable(tradable);
            let mut db = db_with(card);
            db.set_wanted("a1-001", true).unwrap();
            db.set_wanted("a1-001", false).unwrap();
            let card = db.get("a1-001").unwrap();
            prop_assert_eq!(card.desirability, 0);
            prop_assert!(!card.trade_desirability);
        }
    }
}
