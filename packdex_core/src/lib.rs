pub mod assets;
pub mod board;
pub mod card;
pub mod collection;
pub mod cooldown;
pub mod database;
pub mod error;
pub mod filter;
pub mod pack;
pub mod rarity;
pub mod store;
pub mod transfer;

pub use assets::{AssetDir, AssetLookup, ImageSource, NoAssets};
pub use board::PackBoard;
pub use card::{CardRecord, StoredRarity};
pub use collection::Collection;
pub use cooldown::{Classified, MinRarity, PackFilter, COOLDOWN_SECS};
pub use database::{CardDatabase, CollectionStats};
pub use error::{DexError, ImportError, Result};
pub use filter::{FilterCriteria, FilteredCards, GalleryCard, PackSelection, SetSelection};
pub use pack::{PackCard, ProcessedPack, SavedPack, SavedPacks};
pub use rarity::Rarity;
pub use store::{CardStore, FileStore, MemoryStore};
