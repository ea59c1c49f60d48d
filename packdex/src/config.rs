use std::path::PathBuf;

use clap::Parser;
use packdex_core::transfer::EXPORT_FILE_NAME;

pub const PACKS_FILE_NAME: &str = "saved_packs.json";
pub const LOG_FILE_NAME: &str = "packdex.log";

#[derive(Parser, Debug)]
#[command(name = "packdex")]
#[command(version)]
#[command(about = "Terminal card collection manager with a pack-sharing board")]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv); RUST_LOG overrides it
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Data directory holding the card database and log (default: <data dir>/packdex)
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Saved packs file (default: <data dir>/saved_packs.json)
    #[arg(short, long)]
    pub packs: Option<PathBuf>,

    /// Directory of local card art laid out as <set>/c<key>.png
    #[arg(short, long)]
    pub assets: Option<PathBuf>,

    /// Import this database file before starting
    #[arg(short, long)]
    pub import: Option<PathBuf>,
}

/// Paths the app runs with, after defaults are applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub packs_file: PathBuf,
    pub assets_dir: Option<PathBuf>,
    pub import: Option<PathBuf>,
    pub verbosity: u8,
}

impl AppConfig {
    pub fn from_cli(cli: Cli) -> Self {
        let data_dir = cli.data_dir.unwrap_or_else(default_data_dir);
        let packs_file = cli
            .packs
            .unwrap_or_else(|| data_dir.join(PACKS_FILE_NAME));
        Self {
            packs_file,
            assets_dir: cli.assets,
            import: cli.import,
            verbosity: cli.verbose,
            data_dir,
        }
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }

    /// Where `e` in the gallery writes the export
    pub fn export_file(&self) -> PathBuf {
        self.data_dir.join(EXPORT_FILE_NAME)
    }
}

/// `<platform data dir>/packdex`, or `./packdex` when the platform has none
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("packdex")
}
