use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ── Conventional file names ────────────────────────────────────────────────────

pub const METADATA_FILE: &str = "movies_metadata.csv";
pub const RATINGS_FILE: &str = "ratings_small.csv";
pub const CREDITS_FILE: &str = "credits.csv";
pub const KEYWORDS_FILE: &str = "keywords.csv";
pub const LINKS_FILE: &str = "links.csv";
pub const OUTPUT_FILE: &str = "movies_metadata.json";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Descriptive statistics over the movies dataset
#[derive(Parser, Debug, Clone)]
#[command(
    name = "movie-analyzer",
    about = "Descriptive statistics over the movies dataset",
    version
)]
pub struct Settings {
    /// Directory holding the five CSV files (discovered if not specified)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Movie metadata CSV
    #[arg(long)]
    pub metadata: Option<PathBuf>,

    /// Ratings CSV
    #[arg(long)]
    pub ratings: Option<PathBuf>,

    /// Credits CSV
    #[arg(long)]
    pub credits: Option<PathBuf>,

    /// Keywords CSV
    #[arg(long)]
    pub keywords: Option<PathBuf>,

    /// Links CSV
    #[arg(long)]
    pub links: Option<PathBuf>,

    /// Where to write the metadata JSON snapshot
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Number of top rated movies to report
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u32).range(1..))]
    pub top_movies: u32,

    /// Number of most common keywords to report
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u32).range(1..))]
    pub top_keywords: u32,

    /// Map ratings to metadata through the links table (movieId -> tmdbId)
    #[arg(long)]
    pub join_via_links: bool,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,
}

impl Settings {
    /// Parse the process arguments.
    pub fn load() -> Self {
        Self::parse()
    }

    /// Parse an explicit argument list (the first item is the program name).
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(args)
    }

    /// Resolve the five source paths. Explicit per-file flags win over
    /// `--data-dir`, which wins over `default_dir`.
    pub fn data_sources(&self, default_dir: &Path) -> DataSources {
        let dir = self.data_dir.as_deref().unwrap_or(default_dir);
        let base = DataSources::from_dir(dir);
        DataSources {
            metadata: self.metadata.clone().unwrap_or(base.metadata),
            ratings: self.ratings.clone().unwrap_or(base.ratings),
            credits: self.credits.clone().unwrap_or(base.credits),
            keywords: self.keywords.clone().unwrap_or(base.keywords),
            links: self.links.clone().unwrap_or(base.links),
        }
    }

    /// Resolve the JSON output path, defaulting to `install_dir/movies_metadata.json`.
    pub fn output_path(&self, install_dir: &Path) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| install_dir.join(OUTPUT_FILE))
    }
}

// ── DataSources ────────────────────────────────────────────────────────────────

/// Locations of the five CSV inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSources {
    pub metadata: PathBuf,
    pub ratings: PathBuf,
    pub credits: PathBuf,
    pub keywords: PathBuf,
    pub links: PathBuf,
}

impl DataSources {
    /// Conventional file names inside `dir`.
    pub fn from_dir(dir: &Path) -> Self {
        Self {
            metadata: dir.join(METADATA_FILE),
            ratings: dir.join(RATINGS_FILE),
            credits: dir.join(CREDITS_FILE),
            keywords: dir.join(KEYWORDS_FILE),
            links: dir.join(LINKS_FILE),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
