//! Single-character bin label generation.

use crate::error::{PrepError, Result};

const LABEL_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Largest number of labels [`generate_labels`] can hand out.
pub const MAX_LABELS: usize = 52;

/// Returns `count` distinct labels, uppercase letters first, then lowercase.
pub fn generate_labels(count: usize) -> Result<Vec<String>> {
    if count > MAX_LABELS {
        return Err(PrepError::Range {
            requested: count,
            capacity: MAX_LABELS,
        });
    }
    Ok(LABEL_ALPHABET
        .chars()
        .take(count)
        .map(String::from)
        .collect())
}

/// Uses `explicit` labels when present, otherwise generates `count` labels.
pub fn resolve_labels(explicit: &[String], count: Option<usize>) -> Result<Vec<String>> {
    match (explicit.is_empty(), count) {
        (false, _) => Ok(explicit.to_vec()),
        (true, Some(count)) if count > 0 => generate_labels(count),
        _ => Err(PrepError::EmptyLabels),
    }
}
