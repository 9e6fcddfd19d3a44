//! Core types for the movie analyzer.
//!
//! Holds the error taxonomy, command-line settings, the dataset and result
//! types, and the small parsers and formatters shared by the data layer and
//! the binary.

pub mod dates;
pub mod error;
pub mod formatting;
pub mod genres;
pub mod models;
pub mod settings;

pub use error::{AnalyzerError, Result};
