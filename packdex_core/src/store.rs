//! Local persistence of the card database.
//!
//! The stored form is one JSON object keyed by card key. `FileStore` keeps it in a
//! single file; `MemoryStore` backs tests.

use std::cell::{Cell, RefCell};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::database::CardDatabase;
use crate::error::{DexError, Result};

/// File name of the persisted database inside the data directory
pub const DB_FILE_NAME: &str = "cards_database.json";

/// Storage operations for the card database
pub trait CardStore {
    /// Where the database lives, for messages and logs
    fn location(&self) -> &Path;

    /// Whether a database has been persisted
    fn exists(&self) -> bool;

    /// Load the persisted database; `NotFound` when there is none
    fn load(&self) -> Result<CardDatabase>;

    /// Overwrite the persisted database (last write wins)
    fn save(&self, db: &CardDatabase) -> Result<()>;

    /// Remove the persisted database
    fn clear(&self) -> Result<()>;
}

/// Database stored as a JSON file
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<dir>/cards_database.json`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(DB_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, db: &CardDatabase) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec(db).map_err(io::Error::other)?;
        // Write-then-rename keeps the stored file whole
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)
    }
}

impl CardStore for FileStore {
    fn location(&self) -> &Path {
        &self.path
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn load(&self) -> Result<CardDatabase> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(DexError::NotFound(self.path.clone()))
            }
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Err(DexError::NotFound(self.path.clone()));
        }
        let db: CardDatabase = serde_json::from_str(&raw).map_err(|source| DexError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        debug!(cards = db.len(), path = %self.path.display(), "loaded card database");
        Ok(db)
    }

    fn save(&self, db: &CardDatabase) -> Result<()> {
        self.write(db).map_err(|source| DexError::Save {
            path: self.path.clone(),
            source,
        })?;
        debug!(cards = db.len(), path = %self.path.display(), "saved card database");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "cleared card database");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store; saves can be made to fail to exercise error paths
#[derive(Debug, Default)]
pub struct MemoryStore {
    stored: RefCell<Option<CardDatabase>>,
    fail_saves: Cell<bool>,
    saves: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_database(db: CardDatabase) -> Self {
        Self {
            stored: RefCell::new(Some(db)),
            ..Default::default()
        }
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }

    pub fn stored(&self) -> Option<CardDatabase> {
        self.stored.borrow().clone()
    }
}

impl CardStore for MemoryStore {
    fn location(&self) -> &Path {
        Path::new("<memory>")
    }

    fn exists(&self) -> bool {
        self.stored.borrow().is_some()
    }

    fn load(&self) -> Result<CardDatabase> {
        self.stored
            .borrow()
            .clone()
            .ok_or_else(|| DexError::NotFound(self.location().to_path_buf()))
    }

    fn save(&self, db: &CardDatabase) -> Result<()> {
        if self.fail_saves.get() {
            return Err(DexError::Save {
                path: self.location().to_path_buf(),
                source: io::Error::other("storage quota exceeded"),
            });
        }
        *self.stored.borrow_mut() = Some(db.clone());
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.stored.borrow_mut() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardRecord;
    use crate::rarity::Rarity;

    fn sample() -> CardDatabase {
        let mut db = CardDatabase::new();
        db.insert("a1-001", CardRecord::new("Bulbasaur", "Genetic Apex", Rarity::Common));
        db
    }

    #[test]
    fn test_file_store_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        assert!(!store.exists());
        assert!(matches!(store.load(), Err(DexError::NotFound(_))));
    }

    #[test]
    fn test_file_store_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path().join("nested"));
        store.save(&sample()).unwrap();
        assert!(store.exists());
        assert_eq!(store.load().unwrap(), sample());

        store.clear().unwrap();
        assert!(!store.exists());
        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        std::fs::write(store.path(), "{ not json").unwrap();
        assert!(matches!(store.load(), Err(DexError::Corrupt { .. })));
    }

    #[test]
    fn test_memory_store_failing_save() {
        let store = MemoryStore::new();
        store.fail_saves(true);
        assert!(matches!(store.save(&sample()), Err(DexError::Save { .. })));
        assert!(!store.exists());

        store.fail_saves(false);
        store.save(&sample()).unwrap();
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.load().unwrap(), sample());
    }
}
