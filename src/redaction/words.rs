//! Identifier word splitting

/// Split an identifier on whitespace, keeping words longer than `min_length`
///
/// A word of exactly `min_length` characters is dropped. Length is counted in
/// characters, not bytes.
///
/// # Examples
///
/// ```
/// use deid::redaction::words::split_words;
///
/// assert_eq!(split_words("Dr J. Al Smithson", 3), vec!["Smithson"]);
/// assert_eq!(split_words("Mary Ann Lee", 2), vec!["Mary", "Ann", "Lee"]);
/// ```
pub fn split_words(s: &str, min_length: usize) -> Vec<&str> {
    s.split_whitespace()
        .filter(|word| word.chars().count() > min_length)
        .collect()
}
