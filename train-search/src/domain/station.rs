//! Station references.

use serde::Serialize;

/// Split a `"Label (CODE)"` string on its first `(`.
///
/// Returns the trimmed label and, when a `(` is present, the trimmed text
/// after it with any trailing `)` removed. The same shape is used for
/// station inputs ("Gorakhpur Jn (GKP)") and train headings
/// ("Gorakhdham Exp (12555)").
pub(crate) fn split_parenthesized(raw: &str) -> (&str, Option<&str>) {
    let raw = raw.trim();
    match raw.split_once('(') {
        Some((label, rest)) => (
            label.trim(),
            Some(rest.trim().trim_end_matches(')').trim()),
        ),
        None => (raw, None),
    }
}

/// A station as resolved by the upstream: display name plus code.
///
/// The code is not validated beyond what the upstream returned.
///
/// # Examples
///
/// ```
/// use train_search::domain::StationRef;
///
/// let gkp = StationRef::parse("Gorakhpur Jn (GKP)", "GKP");
/// assert_eq!(gkp.name, "Gorakhpur Jn");
/// assert_eq!(gkp.code, "GKP");
///
/// // Without a parenthesized code the caller's code is used.
/// let plain = StationRef::parse("GKP", "GKP");
/// assert_eq!(plain.name, "GKP");
/// assert_eq!(plain.code, "GKP");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationRef {
    pub name: String,
    pub code: String,
}

impl StationRef {
    /// Build a reference from a combined `"Name (CODE)"` string, falling
    /// back to `fallback_code` when no parenthesized code is present.
    pub fn parse(raw: &str, fallback_code: &str) -> Self {
        let (name, code) = split_parenthesized(raw);
        Self {
            name: name.to_string(),
            code: code.unwrap_or(fallback_code.trim()).to_string(),
        }
    }
}
