use analyzer_core::formatting::{
    format_count_line, format_rated_line, format_rating, sorted_counts,
};
use analyzer_data::analysis::AnalysisResult;

/// Render the console report, one string per line.
///
/// `top_movies` and `top_keywords` are the requested limits; they appear in
/// the section headings even when fewer rows are available. A statistic that
/// failed is left out together with its heading.
pub fn render_report(result: &AnalysisResult, top_movies: usize, top_keywords: usize) -> Vec<String> {
    let mut lines = Vec::new();
    if let Ok(unique) = &result.unique_movies {
        lines.push(format!("Number of unique movies: {}", unique));
    }
    if let Ok(average) = &result.average_rating {
        lines.push(format!("Average rating: {}", format_rating(*average)));
    }

    if let Ok(top_rated) = &result.top_rated {
        lines.push(String::new());
        lines.push(format!("Top {} highest rated movies:", top_movies));
        lines.extend(
            top_rated
                .iter()
                .map(|movie| format_rated_line(&movie.title, movie.rating)),
        );
    }

    if let Ok(per_year) = &result.movies_per_year {
        lines.push(String::new());
        lines.push("Movies released each year:".to_string());
        lines.extend(
            per_year
                .iter()
                .map(|(year, count)| format_count_line(year, *count)),
        );
    }

    if let Ok(per_genre) = &result.movies_per_genre {
        lines.push(String::new());
        lines.push("Movies in each genre:".to_string());
        lines.extend(
            sorted_counts(per_genre)
                .into_iter()
                .map(|(genre, count)| format_count_line(genre, count)),
        );
    }

    if let Ok(keywords) = &result.top_keywords {
        lines.push(String::new());
        lines.push(format!("Top {} most common keywords:", top_keywords));
        lines.extend(
            keywords
                .iter()
                .map(|kw| format_count_line(&kw.keyword, kw.count)),
        );
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use analyzer_core::error::AnalyzerError;
    use analyzer_core::models::{KeywordCount, RatedMovie};
    use analyzer_data::analysis::AnalysisMetadata;
    use std::collections::{BTreeMap, HashMap};

    fn result() -> AnalysisResult {
        AnalysisResult {
            unique_movies: Ok(3),
            average_rating: Ok(3.456),
            top_rated: Ok(vec![RatedMovie {
                title: "Heat".into(),
                rating: 4.25,
            }]),
            movies_per_year: Ok([(1995, 2), (1999, 1)].into_iter().collect()),
            movies_per_genre: Ok([("Drama".to_string(), 1), ("Action".to_string(), 2)]
                .into_iter()
                .collect::<HashMap<_, _>>()),
            top_keywords: Ok(vec![KeywordCount {
                keyword: "heist".into(),
                count: 4,
            }]),
            prepared_metadata: Err(AnalyzerError::missing_column("metadata", "id")),
            metadata: AnalysisMetadata {
                generated_at: "2024-01-01T00:00:00+00:00".into(),
                table_rows: BTreeMap::new(),
                analysis_time_seconds: 0.0,
            },
        }
    }

    #[test]
    fn test_render_report_layout() {
        let lines = render_report(&result(), 5, 10);
        assert_eq!(
            lines,
            vec![
                "Number of unique movies: 3",
                "Average rating: 3.46",
                "",
                "Top 5 highest rated movies:",
                "Heat - 4.25",
                "",
                "Movies released each year:",
                "1995: 2",
                "1999: 1",
                "",
                "Movies in each genre:",
                "Action: 2",
                "Drama: 1",
                "",
                "Top 10 most common keywords:",
                "heist: 4",
            ]
        );
    }

    #[test]
    fn test_render_report_nan_average() {
        let mut r = result();
        r.average_rating = Ok(f64::NAN);
        let lines = render_report(&r, 5, 10);
        assert_eq!(lines[1], "Average rating: nan");
    }

    #[test]
    fn test_render_report_skips_failed_sections() {
        let mut r = result();
        r.top_keywords = Err(AnalyzerError::missing_column("keywords", "keywords"));
        r.average_rating = Err(AnalyzerError::missing_column("ratings", "rating"));

        let lines = render_report(&r, 5, 10);
        assert_eq!(lines[0], "Number of unique movies: 3");
        assert_eq!(lines[1], "");
        assert!(!lines.iter().any(|l| l.starts_with("Average rating")));
        assert!(!lines.iter().any(|l| l.contains("keywords")));
        assert_eq!(lines.last().map(String::as_str), Some("Drama: 1"));
    }
}
