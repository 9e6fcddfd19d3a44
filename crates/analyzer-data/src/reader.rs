//! CSV loading for the movie analyzer.
//!
//! Reads each of the five sources into a polars [`DataFrame`] with every
//! column held as text, and maps failures onto the loader error taxonomy.
//! Queries cast the columns they use, so a stray value in a numeric-looking
//! column never stops a load and text columns keep their exact spelling.

use std::io::ErrorKind;
use std::path::Path;

use analyzer_core::error::{AnalyzerError, Result};
use analyzer_core::models::{tables, MovieDataset, NA_MARKERS};
use analyzer_core::settings::DataSources;
use polars::prelude::*;
use tracing::{error, info};

// ── Public API ────────────────────────────────────────────────────────────────

/// Load all five sources.
///
/// Stops at the first failing source; tables loaded before it are dropped.
pub fn load_dataset(sources: &DataSources) -> Result<MovieDataset> {
    let result = load_all(sources);
    match &result {
        Ok(_) => info!("All data loaded successfully"),
        Err(e) => error!("{}", e),
    }
    result
}

/// Load one CSV file; `name` is only used for logging.
///
/// * Missing file → [`AnalyzerError::SourceNotFound`].
/// * Zero bytes, or a header with no records → [`AnalyzerError::SourceEmpty`].
/// * Anything else the CSV reader rejects, such as a record with more fields
///   than the header → [`AnalyzerError::SourceMalformed`].
///
/// Records shorter than the header are padded with nulls, and the
/// [`NA_MARKERS`] spellings read as null.
pub fn load_table(path: &Path, name: &str) -> Result<DataFrame> {
    let size = match std::fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(AnalyzerError::SourceNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(malformed(path, e.into())),
    };
    if size == 0 {
        return Err(AnalyzerError::SourceEmpty(path.to_path_buf()));
    }

    let null_values = NullValues::AllColumns(NA_MARKERS.iter().map(|m| (*m).into()).collect());
    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_parse_options(CsvParseOptions::default().with_null_values(Some(null_values)))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|source| match source {
            PolarsError::NoData(_) => AnalyzerError::SourceEmpty(path.to_path_buf()),
            other => malformed(path, other),
        })?;

    if frame.width() == 0 || frame.height() == 0 {
        return Err(AnalyzerError::SourceEmpty(path.to_path_buf()));
    }

    info!(
        "Loaded {}: {} rows, {} columns from {}",
        name,
        frame.height(),
        frame.width(),
        path.display()
    );
    Ok(frame)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn malformed(path: &Path, source: PolarsError) -> AnalyzerError {
    AnalyzerError::SourceMalformed {
        path: path.to_path_buf(),
        source,
    }
}

fn load_all(sources: &DataSources) -> Result<MovieDataset> {
    Ok(MovieDataset {
        metadata: load_table(&sources.metadata, tables::METADATA)?,
        ratings: load_table(&sources.ratings, tables::RATINGS)?,
        credits: load_table(&sources.credits, tables::CREDITS)?,
        keywords: load_table(&sources.keywords, tables::KEYWORDS)?,
        links: load_table(&sources.links, tables::LINKS)?,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
