use std::fmt;
use std::path::{Path, PathBuf};

use crate::card::CardRecord;

/// Where a card's artwork can be found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Remote(String),
    Local(PathBuf),
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Remote(url) => write!(f, "{}", url),
            ImageSource::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Lookup of locally bundled card images
pub trait AssetLookup {
    fn find(&self, set_base_name: &str, key: &str) -> Option<PathBuf>;
}

/// Bundled images laid out as `<root>/<set base name>/c<key>.png`
#[derive(Debug, Clone)]
pub struct AssetDir {
    root: PathBuf,
}

impl AssetDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetLookup for AssetDir {
    fn find(&self, set_base_name: &str, key: &str) -> Option<PathBuf> {
        let path = self.root.join(set_base_name).join(format!("c{}.png", key));
        path.is_file().then_some(path)
    }
}

/// No bundled images at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssets;

impl AssetLookup for NoAssets {
    fn find(&self, _set_base_name: &str, _key: &str) -> Option<PathBuf> {
        None
    }
}

/// Resolve a card's image: explicit URL, then legacy URL, then the bundled file
pub fn resolve_image(key: &str, card: &CardRecord, assets: &dyn AssetLookup) -> Option<ImageSource> {
    if let Some(url) = card.remote_image() {
        return Some(ImageSource::Remote(url.to_string()));
    }
    assets
        .find(&card.set_base_name, key)
        .map(ImageSource::Local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rarity::Rarity;

    #[test]
    fn test_remote_url_wins_over_bundled_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("Genetic Apex")).unwrap();
        std::fs::write(dir.path().join("Genetic Apex").join("c12.png"), b"png").unwrap();
        let assets = AssetDir::new(dir.path());

        let card = CardRecord::new("Pikachu", "Genetic Apex", Rarity::Common);
        assert_eq!(
            resolve_image("12", &card, &assets),
            Some(ImageSource::Local(dir.path().join("Genetic Apex").join("c12.png")))
        );

        let card = card.with_image("https://example.test/12.png");
        assert_eq!(
            resolve_image("12", &card, &assets),
            Some(ImageSource::Remote("https://example.test/12.png".into()))
        );
    }

    #[test]
    fn test_missing_everything_resolves_to_none() {
        let card = CardRecord::new("Pikachu", "Genetic Apex", Rarity::Common);
        assert_eq!(resolve_image("12", &card, &NoAssets), None);

        let dir = tempfile::tempdir().unwrap();
        assert_eq!(resolve_image("12", &card, &AssetDir::new(dir.path())), None);
    }
}
