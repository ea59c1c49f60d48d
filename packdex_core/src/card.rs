use serde::{Deserialize, Serialize};

use crate::rarity::Rarity;

/// Rarity as it appears in the database file.
///
/// Newer exports store the numeric tier, older ones a short code such as `"RR"`.
/// The original shape is kept so an import followed by an export does not rewrite it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredRarity {
    Tier(i64),
    Code(String),
}

impl StoredRarity {
    /// Typed rarity, or `None` when the stored value names no known tier
    pub fn rarity(&self) -> Option<Rarity> {
        match self {
            StoredRarity::Tier(tier) => u8::try_from(*tier).ok().and_then(Rarity::from_tier),
            StoredRarity::Code(code) => {
                let code = code.trim();
                Rarity::from_code(code)
                    .or_else(|| code.parse::<u8>().ok().and_then(Rarity::from_tier))
            }
        }
    }

    pub fn desirability(&self) -> u8 {
        self.rarity().map(|r| r.desirability()).unwrap_or(0)
    }
}

impl Default for StoredRarity {
    fn default() -> Self {
        StoredRarity::Tier(0)
    }
}

impl From<Rarity> for StoredRarity {
    fn from(rarity: Rarity) -> Self {
        StoredRarity::Tier(rarity.tier() as i64)
    }
}

/// One card of the collection, as stored in the database file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    #[serde(rename = "card_number", default)]
    pub number: String,
    #[serde(rename = "card_name")]
    pub name: String,
    #[serde(rename = "card_rarity", default)]
    pub rarity: StoredRarity,
    #[serde(rename = "card_set", default)]
    pub set_code: String,
    /// Display name of the set; for sub-packs this is the pack name (e.g. "Mewtwo")
    #[serde(rename = "card_set_name", default)]
    pub set_display_name: String,
    #[serde(rename = "card_set_base_name", default)]
    pub set_base_name: String,
    #[serde(default)]
    pub expansion_id: String,

    /// 0 means not wanted
    #[serde(rename = "card_desirability", default)]
    pub desirability: u32,
    #[serde(rename = "card_trade_desirability", default)]
    pub trade_desirability: bool,
    #[serde(rename = "card_tradable", default)]
    pub tradable: bool,
    #[serde(rename = "card_obtainable", default)]
    pub obtainable: bool,
    #[serde(rename = "card_owned", default)]
    pub owned: bool,

    #[serde(rename = "card_image_url", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Older exports used this field instead of `card_image_url`
    #[serde(rename = "image_url", default, skip_serializing_if = "Option::is_none")]
    pub legacy_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_type: Option<String>,

    /// Fields this version does not know about, written back untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CardRecord {
    pub fn new(name: impl Into<String>, set_base_name: impl Into<String>, rarity: Rarity) -> Self {
        let set_base_name = set_base_name.into();
        let set_display_name = set_base_name
            .split(' ')
            .next()
            .unwrap_or_default()
            .to_string();
        Self {
            number: String::new(),
            name: name.into(),
            rarity: rarity.into(),
            set_code: String::new(),
            set_display_name,
            set_base_name,
            expansion_id: String::new(),
            desirability: 0,
            trade_desirability: false,
            tradable: false,
            obtainable: false,
            owned: false,
            image_url: None,
            legacy_image_url: None,
            card_type: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_pack(mut self, pack: impl Into<String>) -> Self {
        self.set_display_name = pack.into();
        self
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn obtainable(mut self, obtainable: bool) -> Self {
        self.obtainable = obtainable;
        self
    }

    pub fn tradable(mut self, tradable: bool) -> Self {
        self.tradable = tradable;
        self
    }

    pub fn owned(mut self, owned: bool) -> Self {
        self.owned = owned;
        self
    }

    pub fn is_wanted(&self) -> bool {
        self.desirability > 0
    }

    /// First non-empty remote image URL, explicit field before the legacy one
    pub fn remote_image(&self) -> Option<&str> {
        [self.image_url.as_deref(), self.legacy_image_url.as_deref()]
            .into_iter()
            .flatten()
            .find(|url| !url.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_rarity_accepts_tiers_and_codes() {
        let tier: StoredRarity = serde_json::from_str("6").unwrap();
        let code: StoredRarity = serde_json::from_str("\"RR\"").unwrap();
        let numeric: StoredRarity = serde_json::from_str("\"3\"").unwrap();
        let junk: StoredRarity = serde_json::from_str("\"??\"").unwrap();

        assert_eq!(tier.rarity(), Some(Rarity::SuperRare));
        assert_eq!(code.rarity(), Some(Rarity::DoubleRare));
        assert_eq!(numeric.rarity(), Some(Rarity::Rare));
        assert_eq!(junk.rarity(), None);
        assert_eq!(junk.desirability(), 0);
        assert_eq!(StoredRarity::Tier(40).rarity(), None);
        assert_eq!(StoredRarity::Tier(-1).rarity(), None);
    }

    #[test]
    fn test_record_keeps_unknown_fields() {
        let json = r#"{
            "card_number": "001",
            "card_name": "Bulbasaur",
            "card_rarity": "C",
            "card_set": "A1",
            "card_set_name": "Mewtwo",
            "card_set_base_name": "Genetic Apex",
            "expansion_id": "A1",
            "card_desirability": 0,
            "card_trade_desirability": false,
            "card_tradable": true,
            "card_obtainable": true,
            "card_owned": false,
            "image_url": "https://example.test/legacy.png",
            "card_hp": 70
        }"#;
        let record: CardRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.rarity, StoredRarity::Code("C".into()));
        assert_eq!(record.set_display_name, "Mewtwo");
        assert_eq!(record.remote_image(), Some("https://example.test/legacy.png"));
        assert_eq!(record.extra.get("card_hp"), Some(&serde_json::json!(70)));

        let back = serde_json::to_value(&record).unwrap();
        let original: serde_json::Value = serde_json::from_str(json).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn test_empty_image_url_falls_through() {
        let mut record = CardRecord::new("Pikachu", "Genetic Apex", Rarity::Common);
        record.image_url = Some(String::new());
        record.legacy_image_url = Some("legacy.png".into());
        assert_eq!(record.remote_image(), Some("legacy.png"));
    }
}
