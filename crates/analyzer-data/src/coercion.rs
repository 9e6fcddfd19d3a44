//! Best-effort type coercion over loaded tables.
//!
//! Coercions never drop rows: a value that cannot be coerced becomes null.
//! The frame-level helpers consume a frame and hand back the derived one, so
//! callers decide which version later steps observe.

use analyzer_core::dates::{days_since_epoch, parse_release_date};
use analyzer_core::error::Result;
use analyzer_core::models::{columns, require_columns, tables};
use polars::prelude::*;

/// Numeric identifier coercion as an expression.
///
/// Text is parsed as a number and integral values become `Int64`, so `862`,
/// `862.0` and `"862"` all compare equal. Anything else, including
/// non-integral numbers, becomes null and never matches in a join.
pub fn numeric_id(expr: Expr) -> Expr {
    let value = expr.cast(DataType::Float64);
    let whole = value.clone().cast(DataType::Int64);
    when(whole.clone().cast(DataType::Float64).eq(value))
        .then(whole)
        .otherwise(lit(NULL).cast(DataType::Int64))
}

/// Parse a release-date column into a `Date` series of the same name.
///
/// Unparseable values become null. Already-parsed dates survive a second
/// pass unchanged.
pub fn release_dates(series: &Series) -> Result<Series> {
    let text = series.cast(&DataType::String)?;
    let days: Int32Chunked = text
        .str()?
        .into_iter()
        .map(|raw| raw.and_then(parse_release_date).map(days_since_epoch))
        .collect();
    Ok(days
        .with_name(series.name().clone())
        .into_series()
        .cast(&DataType::Date)?)
}

/// Replace `column` of `frame` with its numeric coercion. Row count is
/// unchanged.
pub fn coerce_ids(frame: DataFrame, table: &str, column: &str) -> Result<DataFrame> {
    require_columns(&frame, table, &[column])?;
    Ok(frame
        .lazy()
        .with_column(numeric_id(col(column)).alias(column))
        .collect()?)
}

/// Parse `release_date` into dates and add the derived `release_year`.
///
/// Unparseable dates become null in both columns. Applying it to an
/// already-prepared frame returns an identical frame.
pub fn with_release_year(mut metadata: DataFrame) -> Result<DataFrame> {
    require_columns(&metadata, tables::METADATA, &[columns::RELEASE_DATE])?;
    let dates = release_dates(
        metadata
            .column(columns::RELEASE_DATE)?
            .as_materialized_series(),
    )?;
    metadata.with_column(dates)?;

    Ok(metadata
        .lazy()
        .with_column(
            col(columns::RELEASE_DATE)
                .dt()
                .year()
                .alias(columns::RELEASE_YEAR),
        )
        .collect()?)
}

/// The metadata table as it is exported: coerced `id`, parsed
/// `release_date`, and `release_year`.
pub fn prepare_metadata(metadata: DataFrame) -> Result<DataFrame> {
    let metadata = coerce_ids(metadata, tables::METADATA, columns::ID)?;
    with_release_year(metadata)
}
