//! Name/postcode normalization and the pairwise similarity predicate.

use std::str::FromStr;

use thiserror::Error;

use crate::shops::ShopRecord;

/// Minimum name similarity for two records to count as the same shop.
pub const DEFAULT_THRESHOLD: f64 = 0.7;

#[derive(Debug, Error, PartialEq)]
pub enum ThresholdError {
    #[error("similarity threshold must be within 0.0..=1.0, got {0}")]
    OutOfRange(f64),

    #[error("similarity threshold is not a number: {0}")]
    NotANumber(String),
}

/// A similarity threshold in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Threshold(f64);

impl Threshold {
    /// # Errors
    ///
    /// Returns [`ThresholdError::OutOfRange`] for values outside `0.0..=1.0`
    /// (including NaN).
    pub fn new(value: f64) -> Result<Self, ThresholdError> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ThresholdError::OutOfRange(value))
        }
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(DEFAULT_THRESHOLD)
    }
}

impl FromStr for Threshold {
    type Err = ThresholdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<f64>()
            .map_err(|_| ThresholdError::NotANumber(s.to_string()))?;
        Self::new(value)
    }
}

impl std::fmt::Display for Threshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lower-case a shop name and keep only ASCII letters and digits.
///
/// `"Joe's Pizza!"` becomes `"joespizza"`.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// Lower-case a postcode and drop all whitespace.
///
/// `" AB1 2CD "` becomes `"ab12cd"`.
#[must_use]
pub fn normalize_postcode(postcode: &str) -> String {
    postcode
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Edit-distance similarity of two already-normalized names.
///
/// Returns `1 - distance / max_len`. Two empty names are identical and
/// score `1.0`.
#[must_use]
pub fn similarity_score(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    let distance = strsim::levenshtein(a, b);
    // Name lengths are tiny compared to f64's exact integer range.
    #[allow(clippy::cast_precision_loss)]
    let score = 1.0 - distance as f64 / max_len as f64;
    score
}

/// Whether two records describe the same physical shop.
///
/// Postcodes must be equal after normalization; names must then score at
/// least `threshold`.
#[must_use]
pub fn is_similar(a: &ShopRecord, b: &ShopRecord, threshold: Threshold) -> bool {
    if normalize_postcode(&a.postcode) != normalize_postcode(&b.postcode) {
        return false;
    }
    let score = similarity_score(&normalize_name(&a.name), &normalize_name(&b.name));
    score >= threshold.value()
}
