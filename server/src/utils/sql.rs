//! SQL utility functions

/// Escape SQL LIKE metacharacters (%, _, \) in user input
///
/// Pair the resulting pattern with `ESCAPE '\'` in the query.
///
/// # Example
///
/// ```
/// use frenzy_server::utils::sql::escape_like_pattern;
///
/// let pattern = format!("%{}%", escape_like_pattern("50% off_menu"));
/// assert_eq!(pattern, "%50\\% off\\_menu%");
/// ```
pub fn escape_like_pattern(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Build a `LIKE` pattern matching any value that contains `term`
pub fn contains_pattern(term: &str) -> String {
    format!("%{}%", escape_like_pattern(term))
}

/// Split free text into at most `max_terms` whitespace-separated terms
pub fn split_terms(input: &str, max_terms: usize) -> Vec<&str> {
    input.split_whitespace().take(max_terms).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_pattern_no_special_chars() {
        assert_eq!(escape_like_pattern("noodle"), "noodle");
    }

    #[test]
    fn test_escape_like_pattern_percent_and_underscore() {
        assert_eq!(escape_like_pattern("100%_off"), "100\\%\\_off");
    }

    #[test]
    fn test_escape_like_pattern_backslash_first() {
        assert_eq!(escape_like_pattern("a\\%"), "a\\\\\\%");
    }

    #[test]
    fn test_contains_pattern() {
        assert_eq!(contains_pattern("fish"), "%fish%");
        assert_eq!(contains_pattern("5%"), "%5\\%%");
        assert_eq!(contains_pattern(""), "%%");
    }

    #[test]
    fn test_split_terms() {
        assert_eq!(split_terms("  pad   thai ", 10), vec!["pad", "thai"]);
        assert_eq!(split_terms("a b c d", 2), vec!["a", "b"]);
        assert!(split_terms("   ", 10).is_empty());
    }
}
