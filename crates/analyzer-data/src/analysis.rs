//! Main analysis pipeline.
//!
//! Runs every statistic over a loaded [`MovieDataset`] and prepares the
//! metadata table for export, returning an [`AnalysisResult`] ready for the
//! report.

use std::collections::{BTreeMap, HashMap};

use analyzer_core::error::{AnalyzerError, Result};
use analyzer_core::models::{KeywordCount, MovieDataset, RatedMovie};
use chrono::Utc;
use polars::prelude::DataFrame;
use tracing::debug;

use crate::analyzer::{
    average_rating, movies_per_genre, movies_per_year, top_keywords, top_rated_movies,
    top_rated_movies_via_links, unique_movies_count, DEFAULT_TOP_KEYWORDS, DEFAULT_TOP_MOVIES,
};
use crate::coercion::prepare_metadata;

// ── Public types ──────────────────────────────────────────────────────────────

/// Knobs for one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AnalysisOptions {
    /// How many top rated movies to keep.
    pub top_movies: usize,
    /// How many keywords to keep.
    pub top_keywords: usize,
    /// Resolve ratings through the links table before joining to metadata.
    pub join_via_links: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            top_movies: DEFAULT_TOP_MOVIES,
            top_keywords: DEFAULT_TOP_KEYWORDS,
            join_via_links: false,
        }
    }
}

/// Metadata produced alongside the analysis result.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AnalysisMetadata {
    /// ISO-8601 timestamp when this result was generated.
    pub generated_at: String,
    /// Row count of each input table, keyed by table name.
    pub table_rows: BTreeMap<String, usize>,
    /// Wall-clock seconds spent computing the statistics.
    pub analysis_time_seconds: f64,
}

/// The complete output of [`analyze_dataset`].
///
/// Each statistic is computed independently; one failing leaves the others
/// intact.
#[derive(Debug)]
pub struct AnalysisResult {
    pub unique_movies: Result<usize>,
    /// NaN when there are no ratings.
    pub average_rating: Result<f64>,
    pub top_rated: Result<Vec<RatedMovie>>,
    pub movies_per_year: Result<BTreeMap<i32, usize>>,
    pub movies_per_genre: Result<HashMap<String, usize>>,
    pub top_keywords: Result<Vec<KeywordCount>>,
    /// Metadata with coerced ids, parsed dates and `release_year`; this is
    /// the table to export.
    pub prepared_metadata: Result<DataFrame>,
    pub metadata: AnalysisMetadata,
}

impl AnalysisResult {
    /// `(label, error)` for every step that failed, in report order.
    pub fn failures(&self) -> Vec<(&'static str, &AnalyzerError)> {
        [
            ("unique movies", self.unique_movies.as_ref().err()),
            ("average rating", self.average_rating.as_ref().err()),
            ("top rated movies", self.top_rated.as_ref().err()),
            ("movies per year", self.movies_per_year.as_ref().err()),
            ("movies per genre", self.movies_per_genre.as_ref().err()),
            ("top keywords", self.top_keywords.as_ref().err()),
            ("prepared metadata", self.prepared_metadata.as_ref().err()),
        ]
        .into_iter()
        .filter_map(|(label, err)| err.map(|e| (label, e)))
        .collect()
    }
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run every statistic once over `dataset`.
///
/// The dataset itself is not modified; the derived metadata table is returned
/// in [`AnalysisResult::prepared_metadata`].
pub fn analyze_dataset(dataset: &MovieDataset, options: &AnalysisOptions) -> AnalysisResult {
    let start = std::time::Instant::now();

    let unique_movies = unique_movies_count(&dataset.metadata);
    let average = average_rating(&dataset.ratings);
    let top_rated = if options.join_via_links {
        top_rated_movies_via_links(
            &dataset.ratings,
            &dataset.links,
            &dataset.metadata,
            options.top_movies,
        )
    } else {
        top_rated_movies(&dataset.ratings, &dataset.metadata, options.top_movies)
    };
    let per_year = movies_per_year(&dataset.metadata);
    let per_genre = movies_per_genre(&dataset.metadata);
    let keywords = top_keywords(&dataset.keywords, options.top_keywords);
    let prepared_metadata = prepare_metadata(dataset.metadata.clone());

    let analysis_time = start.elapsed().as_secs_f64();
    let result = AnalysisResult {
        unique_movies,
        average_rating: average,
        top_rated,
        movies_per_year: per_year,
        movies_per_genre: per_genre,
        top_keywords: keywords,
        prepared_metadata,
        metadata: AnalysisMetadata {
            generated_at: Utc::now().to_rfc3339(),
            table_rows: dataset
                .row_counts()
                .into_iter()
                .map(|(name, rows)| (name.to_string(), rows))
                .collect(),
            analysis_time_seconds: analysis_time,
        },
    };
    debug!(
        "Analysis finished in {:.3}s with {} failed steps",
        analysis_time,
        result.failures().len()
    );
    result
}

// ── Tests ─────────────────────────────────────────────────────────────────────
