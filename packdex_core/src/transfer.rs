//! Import and export of the card database as a user-chosen JSON file

use std::fs;
use std::path::Path;

use tracing::info;

use crate::database::CardDatabase;
use crate::error::{DexError, ImportError, Result};

/// Default file name offered for exports
pub const EXPORT_FILE_NAME: &str = "Cards_Database.json";

/// Read a database from `path`; `None` means the user dismissed the file prompt
pub fn import_from_file(path: Option<&Path>) -> std::result::Result<CardDatabase, ImportError> {
    let path = path.ok_or(ImportError::Cancelled)?;
    let raw = fs::read_to_string(path).map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let db: CardDatabase = serde_json::from_str(&raw).map_err(ImportError::Malformed)?;
    info!(cards = db.len(), path = %path.display(), "imported card database");
    Ok(db)
}

/// Write `db` to `path` as indented JSON
pub fn export_to_file(db: &CardDatabase, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(db)?;
    fs::write(path, json).map_err(|source| DexError::Export {
        path: path.to_path_buf(),
        source,
    })?;
    info!(cards = db.len(), path = %path.display(), "exported card database");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "a1-001": {
            "card_number": "001",
            "card_name": "Bulbasaur",
            "card_rarity": 1,
            "card_set": "A1",
            "card_set_name": "Mewtwo",
            "card_set_base_name": "Genetic Apex",
            "expansion_id": "A1",
            "card_desirability": 1,
            "card_trade_desirability": false,
            "card_tradable": true,
            "card_obtainable": true,
            "card_owned": true,
            "card_image_url": "https://example.test/a1-001.png"
        },
        "a1-096": {
            "card_number": "096",
            "card_name": "Pikachu ex",
            "card_rarity": "RR",
            "card_set": "A1",
            "card_set_name": "Pikachu",
            "card_set_base_name": "Genetic Apex",
            "expansion_id": "A1",
            "card_desirability": 0,
            "card_trade_desirability": false,
            "card_tradable": false,
            "card_obtainable": true,
            "card_owned": false,
            "card_type": "pokemon"
        }
    }"#;

    #[test]
    fn test_import_then_export_reproduces_content() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("in.json");
        let target = dir.path().join(EXPORT_FILE_NAME);
        fs::write(&source, SAMPLE).unwrap();

        let db = import_from_file(Some(&source)).unwrap();
        assert_eq!(db.len(), 2);
        export_to_file(&db, &target).unwrap();

        let before: serde_json::Value = serde_json::from_str(SAMPLE).unwrap();
        let after: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&target).unwrap()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_import_cancelled() {
        assert!(matches!(import_from_file(None), Err(ImportError::Cancelled)));
    }

    #[test]
    fn test_import_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("in.json");
        fs::write(&source, "[1, 2, 3]").unwrap();
        assert!(matches!(
            import_from_file(Some(&source)),
            Err(ImportError::Malformed(_))
        ));
    }

    #[test]
    fn test_import_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            import_from_file(Some(&dir.path().join("nope.json"))),
            Err(ImportError::Read { .. })
        ));
    }
}
