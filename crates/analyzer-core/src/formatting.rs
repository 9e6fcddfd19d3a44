use std::collections::HashMap;

/// Format a rating with two decimal places. Undefined ratings print as `nan`.
///
/// # Examples
///
/// ```
/// use analyzer_core::formatting::format_rating;
///
/// assert_eq!(format_rating(3.456), "3.46");
/// assert_eq!(format_rating(2.0), "2.00");
/// assert_eq!(format_rating(f64::NAN), "nan");
/// ```
pub fn format_rating(rating: f64) -> String {
    if rating.is_nan() {
        "nan".to_string()
    } else {
        format!("{:.2}", rating)
    }
}

/// Format a `label: count` report line.
///
/// # Examples
///
/// ```
/// use analyzer_core::formatting::format_count_line;
///
/// assert_eq!(format_count_line("Drama", 20265), "Drama: 20265");
/// assert_eq!(format_count_line(1999, 2), "1999: 2");
/// ```
pub fn format_count_line(label: impl std::fmt::Display, count: usize) -> String {
    format!("{}: {}", label, count)
}

/// Format a `title - rating` report line.
///
/// # Examples
///
/// ```
/// use analyzer_core::formatting::format_rated_line;
///
/// assert_eq!(format_rated_line("Heat", 4.25), "Heat - 4.25");
/// ```
pub fn format_rated_line(title: &str, rating: f64) -> String {
    format!("{} - {}", title, format_rating(rating))
}

/// Order an unordered count map for display: count descending, then label
/// ascending.
pub fn sorted_counts(counts: &HashMap<String, usize>) -> Vec<(&str, usize)> {
    let mut pairs: Vec<(&str, usize)> = counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    pairs
}
