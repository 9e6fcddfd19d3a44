use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

use crate::error::{AnalyzerError, Result};

/// Markers read as a missing value when a CSV source is loaded.
pub const NA_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ── Column and table names ─────────────────────────────────────────────────────

/// Column names the queries rely on.
pub mod columns {
    pub const ID: &str = "id";
    pub const TITLE: &str = "title";
    pub const GENRES: &str = "genres";
    pub const RELEASE_DATE: &str = "release_date";
    /// Derived from `release_date` by release-date coercion.
    pub const RELEASE_YEAR: &str = "release_year";
    /// Ratings' and links' reference to a movie.
    pub const MOVIE_ID: &str = "movieId";
    pub const RATING: &str = "rating";
    /// Keyword text, one keyword per row.
    pub const NAME: &str = "name";
    /// Serialized keyword records, one list per movie.
    pub const KEYWORDS: &str = "keywords";
    pub const TMDB_ID: &str = "tmdbId";
    /// Count column produced by the grouping queries.
    pub const COUNT: &str = "count";
    pub const GENRE: &str = "genre";
    pub const KEYWORD: &str = "keyword";
}

/// Names given to the five loaded tables.
pub mod tables {
    pub const METADATA: &str = "metadata";
    pub const RATINGS: &str = "ratings";
    pub const CREDITS: &str = "credits";
    pub const KEYWORDS: &str = "keywords";
    pub const LINKS: &str = "links";
}

/// Fail with [`AnalyzerError::MissingColumn`] unless `frame` has every
/// column in `required`.
pub fn require_columns(frame: &DataFrame, table: &str, required: &[&str]) -> Result<()> {
    match required
        .iter()
        .find(|column| frame.get_column_index(column).is_none())
    {
        Some(column) => Err(AnalyzerError::missing_column(table, *column)),
        None => Ok(()),
    }
}

// ── Dataset & results ─────────────────────────────────────────────────────────

/// The five tables loaded for one analysis run. Every source column is held
/// as text; the queries cast what they read.
#[derive(Debug, Clone)]
pub struct MovieDataset {
    pub metadata: DataFrame,
    pub ratings: DataFrame,
    pub credits: DataFrame,
    pub keywords: DataFrame,
    pub links: DataFrame,
}

impl MovieDataset {
    /// `(table name, row count)` for each table, in load order.
    pub fn row_counts(&self) -> [(&'static str, usize); 5] {
        [
            (tables::METADATA, self.metadata.height()),
            (tables::RATINGS, self.ratings.height()),
            (tables::CREDITS, self.credits.height()),
            (tables::KEYWORDS, self.keywords.height()),
            (tables::LINKS, self.links.height()),
        ]
    }
}

/// One entry of the top-rated list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatedMovie {
    pub title: String,
    /// Mean rating across every observation of the movie.
    pub rating: f64,
}

/// One entry of the most-common-keywords list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: usize,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
