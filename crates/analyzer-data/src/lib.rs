//! Data layer for the movie analyzer.
//!
//! Responsible for reading the CSV sources into polars data frames, coercing
//! identifier and date columns, computing the descriptive statistics and
//! writing the JSON snapshot of the metadata table.

pub mod analysis;
pub mod analyzer;
pub mod coercion;
pub mod export;
pub mod reader;

pub use analyzer_core as core;
