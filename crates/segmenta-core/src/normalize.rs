//! Input normalization for keyword matching.
//!
//! Job titles and keywords are compared case-insensitively and
//! punctuation-insensitively: both sides are lowercased, trimmed, and have
//! punctuation runs collapsed to single spaces before any comparison.
//! Normalization is applied identically at storage time (keywords) and at
//! match time (diagnostic inputs) so the two always compare like with like.

use once_cell::sync::Lazy;
use regex::Regex;

/// Anything that is not a letter or digit collapses to a single space.
static NON_ALNUM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{N}]+").expect("Failed to compile normalization regex"));

/// Normalize a job title or keyword for matching.
///
/// Lowercases, strips punctuation, and collapses whitespace runs. The
/// result contains only lowercase alphanumeric tokens separated by single
/// spaces, with no leading or trailing whitespace.
pub fn normalize_title(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let stripped = NON_ALNUM.replace_all(&lowered, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Substring containment over already-normalized forms.
///
/// An empty needle never matches: an empty keyword would otherwise match
/// every input and shadow the catch-all fallback.
pub fn contains_keyword(normalized_input: &str, normalized_keyword: &str) -> bool {
    !normalized_keyword.is_empty() && normalized_input.contains(normalized_keyword)
}
