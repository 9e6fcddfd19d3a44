//! Descriptive statistics over the loaded tables.
//!
//! Every query borrows the tables it needs and leaves them untouched. Column
//! coercion happens inside the query, so the queries give the same answers on
//! a freshly loaded metadata table and on a prepared one.

use std::collections::{BTreeMap, HashMap};

use analyzer_core::error::Result;
use analyzer_core::genres::record_names;
use analyzer_core::models::{columns, require_columns, tables, KeywordCount, RatedMovie};
use polars::prelude::*;
use tracing::debug;

use crate::coercion::{numeric_id, release_dates};

pub const DEFAULT_TOP_MOVIES: usize = 5;
pub const DEFAULT_TOP_KEYWORDS: usize = 10;

/// Number of distinct, non-null movie identifiers in the metadata table.
pub fn unique_movies_count(metadata: &DataFrame) -> Result<usize> {
    require_columns(metadata, tables::METADATA, &[columns::ID])?;
    let ids = metadata
        .clone()
        .lazy()
        .select([numeric_id(col(columns::ID)).alias(columns::ID)])
        .collect()?;
    Ok(ids
        .column(columns::ID)?
        .as_materialized_series()
        .drop_nulls()
        .n_unique()?)
}

/// Mean of every rating observation; NaN when there are none.
pub fn average_rating(ratings: &DataFrame) -> Result<f64> {
    require_columns(ratings, tables::RATINGS, &[columns::RATING])?;
    let values = ratings
        .column(columns::RATING)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    Ok(values.mean().unwrap_or(f64::NAN))
}

/// The `n` movies with the highest mean rating, highest first.
///
/// Ratings are grouped by `movieId` and inner-joined to metadata on `id`.
/// Ties are broken by title, then by identifier.
pub fn top_rated_movies(
    ratings: &DataFrame,
    metadata: &DataFrame,
    n: usize,
) -> Result<Vec<RatedMovie>> {
    let means = mean_rating_by_movie(rating_pairs(ratings)?);
    join_titles(means, metadata, n)
}

/// Same as [`top_rated_movies`], but each rating's `movieId` is first mapped
/// to a metadata identifier through the links table (`movieId` → `tmdbId`).
///
/// Ratings without a usable link are dropped.
pub fn top_rated_movies_via_links(
    ratings: &DataFrame,
    links: &DataFrame,
    metadata: &DataFrame,
    n: usize,
) -> Result<Vec<RatedMovie>> {
    require_columns(links, tables::LINKS, &[columns::MOVIE_ID, columns::TMDB_ID])?;
    let link_map = links
        .clone()
        .lazy()
        .select([
            numeric_id(col(columns::MOVIE_ID)).alias(columns::MOVIE_ID),
            numeric_id(col(columns::TMDB_ID)).alias(columns::TMDB_ID),
        ])
        .drop_nulls(None)
        .group_by([col(columns::MOVIE_ID)])
        .agg([col(columns::TMDB_ID).last()]);

    let resolved = rating_pairs(ratings)?
        .join(
            link_map,
            [col(columns::MOVIE_ID)],
            [col(columns::MOVIE_ID)],
            JoinArgs::new(JoinType::Inner),
        )
        .select([
            col(columns::TMDB_ID).alias(columns::MOVIE_ID),
            col(columns::RATING),
        ]);
    join_titles(mean_rating_by_movie(resolved), metadata, n)
}

/// Number of movies released each year, ascending by year.
///
/// Unparseable release dates are left out.
pub fn movies_per_year(metadata: &DataFrame) -> Result<BTreeMap<i32, usize>> {
    require_columns(metadata, tables::METADATA, &[columns::RELEASE_DATE])?;
    let dates = release_dates(
        metadata
            .column(columns::RELEASE_DATE)?
            .as_materialized_series(),
    )?;
    let years = dates
        .into_frame()
        .lazy()
        .select([col(columns::RELEASE_DATE)
            .dt()
            .year()
            .alias(columns::RELEASE_YEAR)])
        .collect()?;

    let counts = value_counts(years.column(columns::RELEASE_YEAR)?.as_materialized_series())?;
    let keys = counts.column(columns::RELEASE_YEAR)?.as_materialized_series().i32()?;
    Ok(keys
        .into_iter()
        .zip(count_values(&counts)?)
        .filter_map(|(year, count)| year.map(|y| (y, count)))
        .collect())
}

/// Number of movies carrying each genre.
///
/// A cell whose genre list cannot be read contributes nothing.
pub fn movies_per_genre(metadata: &DataFrame) -> Result<HashMap<String, usize>> {
    require_columns(metadata, tables::METADATA, &[columns::GENRES])?;
    let names = flatten_records(metadata, columns::GENRES, columns::GENRE)?;
    let counts = value_counts(&names)?;
    let keys = counts.column(columns::GENRE)?.as_materialized_series().str()?;
    Ok(keys
        .into_iter()
        .zip(count_values(&counts)?)
        .filter_map(|(genre, count)| genre.map(|g| (g.to_string(), count)))
        .collect())
}

/// The `n` most frequent keywords, most frequent first; ties in keyword
/// order.
///
/// A table with a `name` column holds one keyword per row. Otherwise each
/// row's `keywords` cell is a list of `{'id': .., 'name': ..}` records and
/// every record name counts once.
pub fn top_keywords(keywords: &DataFrame, n: usize) -> Result<Vec<KeywordCount>> {
    let names = if keywords.get_column_index(columns::NAME).is_some() {
        keywords
            .column(columns::NAME)?
            .as_materialized_series()
            .cast(&DataType::String)?
            .drop_nulls()
            .with_name(columns::KEYWORD.into())
    } else {
        require_columns(keywords, tables::KEYWORDS, &[columns::KEYWORDS])?;
        flatten_records(keywords, columns::KEYWORDS, columns::KEYWORD)?
    };
    debug!("Counting {} keyword occurrences", names.len());

    let top = value_counts(&names)?
        .lazy()
        .sort_by_exprs(
            vec![col(columns::COUNT), col(columns::KEYWORD)],
            SortMultipleOptions::default().with_order_descending_multi([true, false]),
        )
        .limit(limit(n))
        .collect()?;

    let keys = top.column(columns::KEYWORD)?.as_materialized_series().str()?;
    Ok(keys
        .into_iter()
        .zip(count_values(&top)?)
        .filter_map(|(keyword, count)| {
            keyword.map(|k| KeywordCount {
                keyword: k.to_string(),
                count,
            })
        })
        .collect())
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// `(movieId, rating)` with both columns coerced and incomplete rows dropped.
fn rating_pairs(ratings: &DataFrame) -> Result<LazyFrame> {
    require_columns(ratings, tables::RATINGS, &[columns::MOVIE_ID, columns::RATING])?;
    Ok(ratings
        .clone()
        .lazy()
        .select([
            numeric_id(col(columns::MOVIE_ID)).alias(columns::MOVIE_ID),
            col(columns::RATING).cast(DataType::Float64),
        ])
        .drop_nulls(None))
}

fn mean_rating_by_movie(pairs: LazyFrame) -> LazyFrame {
    pairs
        .group_by([col(columns::MOVIE_ID)])
        .agg([col(columns::RATING).mean()])
}

/// Inner join of per-movie means onto metadata titles, then the top `n`.
fn join_titles(means: LazyFrame, metadata: &DataFrame, n: usize) -> Result<Vec<RatedMovie>> {
    require_columns(metadata, tables::METADATA, &[columns::ID, columns::TITLE])?;
    let titles = metadata.clone().lazy().select([
        numeric_id(col(columns::ID)).alias(columns::ID),
        col(columns::TITLE).cast(DataType::String),
    ]);

    let joined = titles
        .join(
            means,
            [col(columns::ID)],
            [col(columns::MOVIE_ID)],
            JoinArgs::new(JoinType::Inner),
        )
        .sort_by_exprs(
            vec![col(columns::RATING), col(columns::TITLE), col(columns::ID)],
            SortMultipleOptions::default()
                .with_order_descending_multi([true, false, false])
                .with_nulls_last(true),
        )
        .collect()?;
    debug!("{} rated movies matched metadata", joined.height());

    let top = joined.head(Some(n));
    let titles = top.column(columns::TITLE)?.as_materialized_series().str()?;
    let ratings = top.column(columns::RATING)?.as_materialized_series().f64()?;
    Ok(titles
        .into_iter()
        .zip(ratings)
        .map(|(title, rating)| RatedMovie {
            title: title.unwrap_or_default().to_string(),
            rating: rating.unwrap_or(f64::NAN),
        })
        .collect())
}

/// Every record name in the `source` column, as one text series named `name`.
fn flatten_records(frame: &DataFrame, source: &str, name: &str) -> Result<Series> {
    let cells = frame.column(source)?.as_materialized_series().cast(&DataType::String)?;
    let names: Vec<String> = cells
        .str()?
        .into_iter()
        .flatten()
        .flat_map(record_names)
        .collect();
    Ok(Series::new(name.into(), names))
}

/// Distinct non-null values of `values` with their counts, most frequent
/// first.
fn value_counts(values: &Series) -> Result<DataFrame> {
    Ok(values
        .drop_nulls()
        .value_counts(true, false, columns::COUNT.into(), false)?)
}

fn count_values(counts: &DataFrame) -> Result<Vec<usize>> {
    let column = counts
        .column(columns::COUNT)?
        .as_materialized_series()
        .cast(&DataType::UInt64)?;
    Ok(column
        .u64()?
        .into_iter()
        .map(|c| c.unwrap_or(0) as usize)
        .collect())
}

fn limit(n: usize) -> IdxSize {
    IdxSize::try_from(n).unwrap_or(IdxSize::MAX)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use analyzer_core::error::AnalyzerError;

    fn metadata(ids: &[Option<&str>], titles: &[&str]) -> DataFrame {
        polars::df!("id" => ids, "title" => titles).unwrap()
    }

    fn ratings(pairs: &[(&str, &str)]) -> DataFrame {
        let movies: Vec<&str> = pairs.iter().map(|(m, _)| *m).collect();
        let values: Vec<&str> = pairs.iter().map(|(_, r)| *r).collect();
        polars::df!("movieId" => movies, "rating" => values).unwrap()
    }

    fn single_column(column: &str, cells: &[Option<&str>]) -> DataFrame {
        DataFrame::new(vec![Column::new(column.into(), cells)]).unwrap()
    }

    fn rated(title: &str, rating: f64) -> RatedMovie {
        RatedMovie {
            title: title.into(),
            rating,
        }
    }

    // ── unique_movies_count ───────────────────────────────────────────────────

    #[test]
    fn test_unique_movies_count_dedupes() {
        let table = metadata(
            &[Some("862"), Some("862"), Some("8844"), Some("31357.0")],
            &["Toy Story", "Toy Story", "Jumanji", "Waiting to Exhale"],
        );
        assert_eq!(unique_movies_count(&table).unwrap(), 3);
    }

    #[test]
    fn test_unique_movies_count_ignores_invalid_ids() {
        let table = metadata(&[Some("1997-08-20"), None, Some("12")], &["a", "b", "c"]);
        assert_eq!(unique_movies_count(&table).unwrap(), 1);
    }

    #[test]
    fn test_unique_movies_count_missing_column() {
        let table = single_column("title", &[Some("a")]);
        let err = unique_movies_count(&table).unwrap_err();
        assert!(matches!(err, AnalyzerError::MissingColumn { .. }));
    }

    // ── average_rating ────────────────────────────────────────────────────────

    #[test]
    fn test_average_rating() {
        let table = ratings(&[("1", "1.0"), ("2", "2"), ("3", "3.0")]);
        assert_eq!(average_rating(&table).unwrap(), 2.0);
    }

    #[test]
    fn test_average_rating_skips_unparseable() {
        let table = single_column("rating", &[Some("4.0"), Some("n/a?"), None, Some("2.0")]);
        assert_eq!(average_rating(&table).unwrap(), 3.0);
    }

    #[test]
    fn test_average_rating_empty_is_nan() {
        let table = ratings(&[]);
        assert!(average_rating(&table).unwrap().is_nan());
    }

    #[test]
    fn test_average_rating_missing_column() {
        let table = single_column("movieId", &[Some("1")]);
        let err = average_rating(&table).unwrap_err();
        assert!(matches!(err, AnalyzerError::MissingColumn { .. }));
    }

    // ── top_rated_movies ──────────────────────────────────────────────────────

    #[test]
    fn test_top_rated_movies_highest_first() {
        let r = ratings(&[("1", "5.0"), ("2", "3.0"), ("3", "4.0"), ("3", "4.0")]);
        let m = metadata(&[Some("1"), Some("2"), Some("3")], &["A", "B", "C"]);

        let top = top_rated_movies(&r, &m, 2).unwrap();
        assert_eq!(top, vec![rated("A", 5.0), rated("C", 4.0)]);
    }

    #[test]
    fn test_top_rated_movies_inner_join_drops_unmatched() {
        let r = ratings(&[("1", "2.0"), ("99", "5.0")]);
        let m = metadata(&[Some("1"), Some("junk")], &["Known", "Junk"]);

        let top = top_rated_movies(&r, &m, 5).unwrap();
        assert_eq!(top, vec![rated("Known", 2.0)]);
    }

    #[test]
    fn test_top_rated_movies_tie_break_by_title() {
        let r = ratings(&[("1", "4.0"), ("2", "4.0"), ("3", "4.0")]);
        let m = metadata(&[Some("1"), Some("2"), Some("3")], &["Zed", "Alpha", "Mid"]);

        let titles: Vec<String> = top_rated_movies(&r, &m, 3)
            .unwrap()
            .into_iter()
            .map(|movie| movie.title)
            .collect();
        assert_eq!(titles, vec!["Alpha", "Mid", "Zed"]);
    }

    #[test]
    fn test_top_rated_movies_averages_per_movie() {
        let r = ratings(&[("7", "1.0"), ("7.0", "4.0")]);
        let m = metadata(&[Some("7.0")], &["Seven"]);

        let top = top_rated_movies(&r, &m, 1).unwrap();
        assert_eq!(top, vec![rated("Seven", 2.5)]);
    }

    #[test]
    fn test_top_rated_movies_keeps_numeric_looking_titles() {
        let r = ratings(&[("1", "3.0")]);
        let m = metadata(&[Some("1")], &["2.0"]);

        let top = top_rated_movies(&r, &m, 1).unwrap();
        assert_eq!(top[0].title, "2.0");
    }

    #[test]
    fn test_top_rated_movies_zero_limit() {
        let r = ratings(&[("1", "3.0")]);
        let m = metadata(&[Some("1")], &["One"]);
        assert!(top_rated_movies(&r, &m, 0).unwrap().is_empty());
    }

    #[test]
    fn test_top_rated_movies_via_links() {
        let r = ratings(&[("1", "5.0"), ("2", "3.0"), ("3", "4.0")]);
        let links = polars::df!(
            "movieId" => ["1", "2", "3"],
            "imdbId" => ["0114709", "0113497", "0113228"],
            "tmdbId" => [Some("862"), Some("8844"), None],
        )
        .unwrap();
        let m = metadata(&[Some("862"), Some("8844")], &["Toy Story", "Jumanji"]);

        let top = top_rated_movies_via_links(&r, &links, &m, 5).unwrap();
        assert_eq!(top, vec![rated("Toy Story", 5.0), rated("Jumanji", 3.0)]);
    }

    // ── movies_per_year ───────────────────────────────────────────────────────

    #[test]
    fn test_movies_per_year() {
        let table = single_column(
            "release_date",
            &[
                Some("1999-01-01"),
                Some("1999-06-01"),
                Some("2001-03-03"),
                Some("invalid"),
                None,
            ],
        );
        let per_year = movies_per_year(&table).unwrap();
        let expected: BTreeMap<i32, usize> = [(1999, 2), (2001, 1)].into_iter().collect();
        assert_eq!(per_year, expected);
    }

    #[test]
    fn test_movies_per_year_does_not_modify_input() {
        let table = single_column("release_date", &[Some("1999-01-01")]);
        let before = table.clone();
        movies_per_year(&table).unwrap();
        assert!(table.equals_missing(&before));
        assert_eq!(table.column("release_date").unwrap().dtype(), &DataType::String);
    }

    // ── movies_per_genre ──────────────────────────────────────────────────────

    #[test]
    fn test_movies_per_genre() {
        let table = single_column(
            "genres",
            &[
                Some(r#"[{"name":"Action"}]"#),
                Some(r#"[{"name":"Action"},{"name":"Drama"}]"#),
                Some("[{'name': 'Act"),
            ],
        );
        let per_genre = movies_per_genre(&table).unwrap();
        assert_eq!(per_genre.len(), 2);
        assert_eq!(per_genre["Action"], 2);
        assert_eq!(per_genre["Drama"], 1);
    }

    #[test]
    fn test_movies_per_genre_single_quoted_source_format() {
        let table = single_column(
            "genres",
            &[
                Some("[{'id': 16, 'name': 'Animation'}, {'id': 35, 'name': 'Comedy'}]"),
                None,
            ],
        );
        let per_genre = movies_per_genre(&table).unwrap();
        assert_eq!(per_genre["Animation"], 1);
        assert_eq!(per_genre["Comedy"], 1);
    }

    #[test]
    fn test_movies_per_genre_survives_deeply_nested_cell() {
        let deep = format!("{}{}", "[".repeat(10_000), "]".repeat(10_000));
        let table = single_column("genres", &[Some(&deep), Some("[{'name': 'Drama'}]")]);
        let per_genre = movies_per_genre(&table).unwrap();
        assert_eq!(per_genre.len(), 1);
        assert_eq!(per_genre["Drama"], 1);
    }

    // ── top_keywords ──────────────────────────────────────────────────────────

    #[test]
    fn test_top_keywords() {
        let table = single_column("name", &[Some("space"), Some("space"), Some("alien")]);
        let top = top_keywords(&table, 1).unwrap();
        assert_eq!(
            top,
            vec![KeywordCount {
                keyword: "space".into(),
                count: 2
            }]
        );
    }

    #[test]
    fn test_top_keywords_skips_nulls() {
        let table = single_column("name", &[None, None, Some("x")]);
        let top = top_keywords(&table, 10).unwrap();
        assert_eq!(
            top,
            vec![KeywordCount {
                keyword: "x".into(),
                count: 1
            }]
        );
    }

    #[test]
    fn test_top_keywords_ties_in_keyword_order() {
        let table = single_column("name", &[Some("b"), Some("a"), Some("c"), Some("a")]);
        let keywords: Vec<String> = top_keywords(&table, 3)
            .unwrap()
            .into_iter()
            .map(|k| k.keyword)
            .collect();
        assert_eq!(keywords, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_top_keywords_flattens_keyword_lists() {
        let table = polars::df!(
            "id" => ["862", "8844", "15602"],
            "keywords" => [
                Some("[{'id': 931, 'name': 'jealousy'}, {'id': 4290, 'name': 'toy'}]"),
                Some("[{'id': 10090, 'name': 'board game'}, {'id': 4290, 'name': 'toy'}]"),
                Some("[]"),
            ],
        )
        .unwrap();

        let top = top_keywords(&table, 2).unwrap();
        assert_eq!(
            top,
            vec![
                KeywordCount {
                    keyword: "toy".into(),
                    count: 2
                },
                KeywordCount {
                    keyword: "board game".into(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_top_keywords_missing_both_layouts() {
        let table = single_column("id", &[Some("862")]);
        let err = top_keywords(&table, 10).unwrap_err();
        match err {
            AnalyzerError::MissingColumn { table, column } => {
                assert_eq!(table, "keywords");
                assert_eq!(column, "keywords");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
