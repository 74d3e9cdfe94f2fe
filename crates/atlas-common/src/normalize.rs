//! Text normalization for loose matching.
//!
//! Every comparison of names and continents goes through [`normalize`], so
//! search, filtering and duplicate detection can never disagree on what
//! "the same" means.

/// Accented vowels folded to their base letter, applied after lowercasing.
const FOLDS: [(char, char); 5] = [('á', 'a'), ('é', 'e'), ('í', 'i'), ('ó', 'o'), ('ú', 'u')];

/// Lowercase `text` and strip the accents from á, é, í, ó and ú.
///
/// No other character is touched and whitespace is preserved; callers trim
/// separately when they need to.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            FOLDS
                .iter()
                .find(|(accented, _)| *accented == c)
                .map_or(c, |(_, plain)| *plain)
        })
        .collect()
}

/// Check whether two strings are equal after normalization.
#[inline]
pub fn matches(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

/// Check whether `needle` occurs in `haystack` after normalizing both.
///
/// An empty needle is contained in everything.
#[inline]
pub fn contains(haystack: &str, needle: &str) -> bool {
    normalize(haystack).contains(&normalize(needle))
}
