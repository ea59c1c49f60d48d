//! The collection service: the one owner of the card database in memory.
//!
//! Every view reads through [`Collection::get`] and learns about changes through
//! [`Collection::subscribe`] or by watching [`Collection::revision`]. Mutations
//! are write-through: the updated copy is saved first and only committed to
//! memory once the save succeeded.

use std::path::Path;

use tracing::{error, info, warn};

use crate::database::CardDatabase;
use crate::error::{DexError, Result};
use crate::store::CardStore;
use crate::transfer;

type Listener = Box<dyn FnMut(&CardDatabase)>;

pub struct Collection<S: CardStore> {
    store: S,
    db: Option<CardDatabase>,
    revision: u64,
    listeners: Vec<Listener>,
}

impl<S: CardStore> Collection<S> {
    /// A collection with nothing loaded yet
    pub fn new(store: S) -> Self {
        Self {
            store,
            db: None,
            revision: 0,
            listeners: Vec::new(),
        }
    }

    /// Load the persisted database. `NotFound` means the user must import one.
    pub fn load(&mut self) -> Result<&CardDatabase> {
        if !self.store.exists() {
            return Err(DexError::NotFound(self.store.location().to_path_buf()));
        }
        let db = self.store.load()?;
        info!(cards = db.len(), "card database loaded");
        self.commit(db);
        self.get()
            .ok_or_else(|| DexError::NotFound(self.store.location().to_path_buf()))
    }

    pub fn get(&self) -> Option<&CardDatabase> {
        self.db.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.db.is_some()
    }

    /// Bumped on every committed change
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Call `listener` with the new database after every committed change
    pub fn subscribe(&mut self, listener: impl FnMut(&CardDatabase) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn set_owned(&mut self, key: &str, owned: bool) -> Result<()> {
        self.mutate(|db| db.set_owned(key, owned))
    }

    pub fn set_wanted(&mut self, key: &str, wanted: bool) -> Result<()> {
        self.mutate(|db| db.set_wanted(key, wanted))
    }

    pub fn set_trade_desirability(&mut self, key: &str, flag: bool) -> Result<()> {
        self.mutate(|db| db.set_trade_desirability(key, flag))
    }

    pub fn toggle_owned(&mut self, key: &str) -> Result<()> {
        self.mutate(|db| db.toggle_owned(key))
    }

    pub fn toggle_wanted(&mut self, key: &str) -> Result<bool> {
        self.mutate(|db| db.toggle_wanted(key))
    }

    pub fn toggle_trade(&mut self, key: &str) -> Result<()> {
        self.mutate(|db| db.toggle_trade(key))
    }

    /// Import a database file and make it the collection.
    ///
    /// `None` means the file prompt was dismissed. On any failure the current
    /// database stays as it was.
    pub fn import(&mut self, path: Option<&Path>) -> Result<usize> {
        let db = transfer::import_from_file(path).map_err(|e| {
            warn!(error = %e, "import failed");
            DexError::from(e)
        })?;
        self.store.save(&db)?;
        let count = db.len();
        self.commit(db);
        Ok(count)
    }

    pub fn export(&self, path: &Path) -> Result<()> {
        let db = self
            .get()
            .ok_or_else(|| DexError::NotFound(self.store.location().to_path_buf()))?;
        transfer::export_to_file(db, path)
    }

    /// Drop the persisted database and forget the in-memory one
    pub fn clear(&mut self) -> Result<()> {
        self.store.clear()?;
        self.db = None;
        self.revision += 1;
        info!("card database cleared");
        Ok(())
    }

    fn mutate<T>(&mut self, op: impl FnOnce(&mut CardDatabase) -> Result<T>) -> Result<T> {
        let current = self
            .db
            .as_ref()
            .ok_or_else(|| DexError::NotFound(self.store.location().to_path_buf()))?;
        let mut next = current.clone();
        let out = op(&mut next)?;
        if next == *current {
            return Ok(out);
        }
        if let Err(e) = self.store.save(&next) {
            error!(error = %e, "write-through failed, change not applied");
            return Err(e);
        }
        self.commit(next);
        Ok(out)
    }

    fn commit(&mut self, db: CardDatabase) {
        self.revision += 1;
        for listener in &mut self.listeners {
            listener(&db);
        }
        self.db = Some(db);
    }
}
