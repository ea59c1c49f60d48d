use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::assets::{resolve_image, AssetLookup, ImageSource};
use crate::card::CardRecord;
use crate::database::CardDatabase;
use crate::error::Result;
use crate::rarity::Rarity;

/// A pack as recorded by the pack-opening tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPack {
    /// `"<base set> - <sub pack>"`
    #[serde(rename = "pack")]
    pub pack_label: String,
    /// `"<name> [<symbols>]"` per card, in pull order
    #[serde(rename = "cards")]
    pub card_strings: Vec<String>,
    #[serde(default)]
    pub average_desirability: f64,
    #[serde(rename = "godpack", default)]
    pub is_godpack: bool,
    #[serde(default)]
    pub opened_timestamp: i64,
    #[serde(default)]
    pub user: String,
    #[serde(rename = "pwd", default)]
    pub password: String,
    /// Epoch seconds; absent or 0 means never shared
    #[serde(default)]
    pub last_shared_timestamp: Option<i64>,
    #[serde(default)]
    pub friend_id: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub rarity_score: f64,
    /// Precomputed count of top cards (0..=5), when the pack source provides it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_cards: Option<u8>,
}

impl SavedPack {
    pub fn new(pack_label: impl Into<String>, card_strings: Vec<String>) -> Self {
        Self {
            pack_label: pack_label.into(),
            card_strings,
            average_desirability: 0.0,
            is_godpack: false,
            opened_timestamp: 0,
            user: String::new(),
            password: String::new(),
            last_shared_timestamp: None,
            friend_id: String::new(),
            nickname: String::new(),
            rarity_score: 0.0,
            top_cards: None,
        }
    }

    pub fn last_shared(&self) -> i64 {
        self.last_shared_timestamp.unwrap_or(0)
    }

    /// Base set and sub-pack name from the label
    pub fn split_label(&self) -> (&str, &str) {
        self.pack_label
            .split_once(" - ")
            .unwrap_or((self.pack_label.as_str(), ""))
    }
}

/// Saved packs keyed by pack id
pub type SavedPacks = BTreeMap<String, SavedPack>;

/// Read the saved-pack file; a missing file is an empty board
pub fn load_saved_packs(path: &Path) -> Result<SavedPacks> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no saved packs file");
            return Ok(SavedPacks::new());
        }
        Err(e) => return Err(e.into()),
    };
    let packs: SavedPacks = serde_json::from_str(&raw)?;
    info!(packs = packs.len(), path = %path.display(), "loaded saved packs");
    Ok(packs)
}

/// A pack card that matched a card in the collection
#[derive(Debug, Clone, PartialEq)]
pub struct PackCard {
    pub name: String,
    pub rarity: Rarity,
    /// Key of the matched collection card
    pub key: String,
    pub image: ImageSource,
    /// Copied from the collection when the pack was processed
    pub owned: bool,
}

/// A saved pack with its cards resolved against the collection
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedPack {
    pub id: String,
    pub pack: SavedPack,
    pub set_base_name: String,
    pub set_name: String,
    pub cards: Vec<PackCard>,
}

impl ProcessedPack {
    pub fn last_shared(&self) -> i64 {
        self.pack.last_shared()
    }

    pub fn top_cards(&self) -> Option<u8> {
        self.pack.top_cards
    }
}

fn is_rarity_symbol(c: char) -> bool {
    matches!(c, '\u{2606}' | '\u{2605}' | '\u{2662}')
}

/// Split `"<name> [<symbols>]"` into the card name and its rarity.
///
/// The bracket must hold a run of a single symbol (☆, ★ or ♢) and be separated
/// from a non-empty name by whitespace. Anything else is `None`.
pub fn extract_name_and_rarity(raw: &str) -> Option<(String, Rarity)> {
    let body = raw.trim_end().strip_suffix(']')?;
    let open = body.rfind('[')?;
    let symbols = &body[open + 1..];

    let first = symbols.chars().next()?;
    if !is_rarity_symbol(first) || !symbols.chars().all(|c| c == first) {
        return None;
    }

    let head = &body[..open];
    if !head.ends_with(char::is_whitespace) {
        return None;
    }
    let name = head.trim();
    if name.is_empty() {
        return None;
    }

    Some((name.to_string(), Rarity::from_symbols(symbols)))
}

/// First collection card (in key order) whose name contains or is contained in
/// `name`, ignoring case, with the same set base name and rarity
pub fn find_card<'a>(
    name: &str,
    set_base_name: &str,
    rarity: Rarity,
    db: &'a CardDatabase,
) -> Option<(&'a str, &'a CardRecord)> {
    let search = name.to_lowercase();
    db.iter().find(|(_, card)| {
        if card.set_base_name != set_base_name || card.rarity.rarity() != Some(rarity) {
            return false;
        }
        let stored = card.name.to_lowercase();
        !stored.is_empty() && (stored.contains(&search) || search.contains(&stored))
    })
}

/// Image of the card a pack entry refers to, if it matches and has one
pub fn resolve_card_image(
    name: &str,
    set_base_name: &str,
    rarity: Rarity,
    db: &CardDatabase,
    assets: &dyn AssetLookup,
) -> Option<ImageSource> {
    let (key, card) = find_card(name, set_base_name, rarity, db)?;
    resolve_image(key, card, assets)
}

/// Resolve every card of a saved pack; `None` when no card could be resolved
pub fn process_saved_pack(
    id: &str,
    pack: &SavedPack,
    db: &CardDatabase,
    assets: &dyn AssetLookup,
) -> Option<ProcessedPack> {
    let (set_base_name, set_name) = pack.split_label();

    let cards: Vec<PackCard> = pack
        .card_strings
        .iter()
        .filter_map(|raw| {
            let Some((name, rarity)) = extract_name_and_rarity(raw) else {
                debug!(pack = id, card = %raw, "unparsable pack card dropped");
                return None;
            };
            let Some((key, card)) = find_card(&name, set_base_name, rarity, db) else {
                debug!(pack = id, card = %raw, "no matching collection card");
                return None;
            };
            let Some(image) = resolve_image(key, card, assets) else {
                debug!(pack = id, card = %raw, key, "matched card has no image");
                return None;
            };
            Some(PackCard {
                name,
                rarity,
                key: key.to_string(),
                image,
                owned: card.owned,
            })
        })
        .collect();

    if cards.is_empty() {
        debug!(pack = id, "pack dropped, no card resolved");
        return None;
    }

    Some(ProcessedPack {
        id: id.to_string(),
        pack: pack.clone(),
        set_base_name: set_base_name.to_string(),
        set_name: set_name.to_string(),
        cards,
    })
}

/// Process the whole fixture in pack-id order, dropping packs that resolve to nothing
pub fn process_saved_packs(
    packs: &SavedPacks,
    db: &CardDatabase,
    assets: &dyn AssetLookup,
) -> Vec<ProcessedPack> {
    packs
        .iter()
        .filter_map(|(id, pack)| process_saved_pack(id, pack, db, assets))
        .collect()
}
