use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::assets::AssetLookup;
use crate::cooldown::{classify, Classified, PackFilter};
use crate::database::CardDatabase;
use crate::error::{DexError, Result};
use crate::pack::{process_saved_packs, ProcessedPack, SavedPacks};

/// State behind the pack-sharing screen
#[derive(Debug, Clone, Default)]
pub struct PackBoard {
    saved: SavedPacks,
    processed: Vec<ProcessedPack>,
    selected: BTreeSet<String>,
    /// Collection revision the processed packs were built from
    synced_revision: Option<u64>,
}

impl PackBoard {
    pub fn new(saved: SavedPacks) -> Self {
        Self {
            saved,
            ..Default::default()
        }
    }

    pub fn saved(&self) -> &SavedPacks {
        &self.saved
    }

    pub fn processed(&self) -> &[ProcessedPack] {
        &self.processed
    }

    /// Rebuild the processed packs from the current collection
    pub fn reprocess(&mut self, db: &CardDatabase, assets: &dyn AssetLookup) {
        self.processed = process_saved_packs(&self.saved, db, assets);
        let known: BTreeSet<&str> = self.processed.iter().map(|p| p.id.as_str()).collect();
        self.selected.retain(|id| known.contains(id.as_str()));
        debug!(
            saved = self.saved.len(),
            shown = self.processed.len(),
            "packs reprocessed"
        );
    }

    /// Reprocess when the collection moved past the revision last seen.
    ///
    /// Returns whether a reprocess happened.
    pub fn sync(&mut self, revision: u64, db: &CardDatabase, assets: &dyn AssetLookup) -> bool {
        if self.synced_revision == Some(revision) {
            return false;
        }
        self.reprocess(db, assets);
        self.synced_revision = Some(revision);
        true
    }

    /// Filtered packs split into ready and cooling down
    pub fn view(&self, filter: &PackFilter, now: i64) -> Classified {
        classify(
            self.processed
                .iter()
                .filter(|p| filter.matches(p))
                .cloned(),
            now,
        )
    }

    /// Set names among the shown packs, for the set filter
    pub fn set_names(&self) -> Vec<String> {
        self.processed
            .iter()
            .map(|p| p.set_base_name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn share_pack(&mut self, id: &str, now: i64) -> Result<()> {
        if !self.saved.contains_key(id) {
            return Err(DexError::UnknownPack(id.to_string()));
        }
        self.stamp(&[id.to_string()], now);
        info!(pack = id, "pack shared");
        Ok(())
    }

    /// Stamp every ready pack passing `filter` in one step; returns how many
    pub fn share_all_ready(&mut self, filter: &PackFilter, now: i64) -> usize {
        let ids: Vec<String> = self
            .view(filter, now)
            .ready
            .into_iter()
            .map(|p| p.id)
            .collect();
        self.stamp(&ids, now);
        info!(count = ids.len(), "shared all ready packs");
        ids.len()
    }

    /// Stamp the selected packs and clear the selection; returns how many
    pub fn share_selected(&mut self, now: i64) -> usize {
        let ids: Vec<String> = std::mem::take(&mut self.selected).into_iter().collect();
        self.stamp(&ids, now);
        info!(count = ids.len(), "shared selected packs");
        ids.len()
    }

    /// Flip selection of a shown pack; returns whether it is now selected
    pub fn toggle_selected(&mut self, id: &str) -> bool {
        if !self.selected.remove(id) && self.processed.iter().any(|p| p.id == id) {
            self.selected.insert(id.to_string());
            return true;
        }
        false
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    fn stamp(&mut self, ids: &[String], now: i64) {
        for id in ids {
            if let Some(pack) = self.saved.get_mut(id) {
                pack.last_shared_timestamp = Some(now);
            }
            if let Some(pack) = self.processed.iter_mut().find(|p| p.id == *id) {
                pack.pack.last_shared_timestamp = Some(now);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::NoAssets;
    use crate::card::CardRecord;
    use crate::cooldown::COOLDOWN_SECS;
    use crate::pack::SavedPack;
    use crate::rarity::Rarity;

    const NOW: i64 = 2_000_000;

    fn db() -> CardDatabase {
        let mut db = CardDatabase::new();
        db.insert(
            "a1-094",
            CardRecord::new("Pikachu", "Genetic Apex", Rarity::Common).with_image("p.png"),
        );
        db.insert(
            "a1-129",
            CardRecord::new("Mewtwo ex", "Genetic Apex", Rarity::DoubleRare).with_image("m.png"),
        );
        db
    }

    fn saved(card: &str, last_shared: Option<i64>) -> SavedPack {
        let mut pack = SavedPack::new("Genetic Apex - Pikachu", vec![card.to_string()]);
        pack.last_shared_timestamp = last_shared;
        pack
    }

    fn board() -> PackBoard {
        let mut packs = SavedPacks::new();
        packs.insert("p1".into(), saved("Pikachu [\u{2662}]", None));
        packs.insert(
            "p2".into(),
            saved("Mewtwo ex [\u{2662}\u{2662}\u{2662}\u{2662}]", Some(NOW - 60)),
        );
        packs.insert("p3".into(), saved("Mewtwo ex [\u{2662}\u{2662}\u{2662}\u{2662}]", None));
        packs.insert("p4".into(), saved("Nobody [\u{2662}]", None));
        let mut board = PackBoard::new(packs);
        board.reprocess(&db(), &NoAssets);
        board
    }

    fn ids(packs: &[ProcessedPack]) -> Vec<&str> {
        packs.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_unresolvable_packs_are_hidden() {
        let board = board();
        assert_eq!(board.saved().len(), 4);
        assert_eq!(ids(board.processed()), ["p1", "p2", "p3"]);
    }

    #[test]
    fn test_share_pack_moves_it_to_expired() {
        let mut board = board();
        board.share_pack("p1", NOW).unwrap();

        let view = board.view(&PackFilter::default(), NOW);
        assert_eq!(ids(&view.ready), ["p3"]);
        assert_eq!(ids(&view.expired), ["p1", "p2"]);
        assert_eq!(board.saved()["p1"].last_shared(), NOW);

        // Ready again once the cooldown has passed
        let later = board.view(&PackFilter::default(), NOW + COOLDOWN_SECS + 1);
        assert_eq!(ids(&later.ready), ["p1", "p2", "p3"]);
    }

    #[test]
    fn test_share_unknown_pack() {
        let mut board = board();
        assert!(matches!(
            board.share_pack("nope", NOW),
            Err(DexError::UnknownPack(_))
        ));
    }

    #[test]
    fn test_share_all_ready_respects_filter() {
        let mut board = board();
        let filter = PackFilter {
            card_name: "mewtwo".into(),
            ..Default::default()
        };
        assert_eq!(board.share_all_ready(&filter, NOW), 1);
        assert_eq!(board.saved()["p3"].last_shared(), NOW);
        assert_eq!(board.saved()["p1"].last_shared(), 0);

        assert_eq!(board.share_all_ready(&PackFilter::default(), NOW), 1);
        assert!(board.view(&PackFilter::default(), NOW).ready.is_empty());
    }

    #[test]
    fn test_share_selected_clears_selection() {
        let mut board = board();
        assert!(board.toggle_selected("p1"));
        assert!(board.toggle_selected("p3"));
        assert!(!board.toggle_selected("p3"));
        assert!(!board.toggle_selected("p4"));
        assert_eq!(board.selected_count(), 1);

        assert_eq!(board.share_selected(NOW), 1);
        assert_eq!(board.selected_count(), 0);
        assert_eq!(board.saved()["p1"].last_shared(), NOW);
    }

    #[test]
    fn test_sync_only_on_new_revision() {
        let mut board = PackBoard::new(board().saved().clone());
        assert!(board.sync(1, &db(), &NoAssets));
        assert!(!board.sync(1, &db(), &NoAssets));
        assert_eq!(board.processed().len(), 3);

        // Shares survive a reprocess because they live on the saved packs
        board.share_pack("p1", NOW).unwrap();
        assert!(board.sync(2, &CardDatabase::new(), &NoAssets));
        assert!(board.processed().is_empty());
        assert!(board.sync(3, &db(), &NoAssets));
        assert_eq!(board.processed()[0].last_shared(), NOW);
    }

    #[test]
    fn test_set_names() {
        assert_eq!(board().set_names(), vec!["Genetic Apex".to_string()]);
    }
}
