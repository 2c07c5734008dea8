//! Input limits and small path helpers shared by the readers and the CLI.

use std::path::Path;

/// Maximum number of hits accepted from a single input file
pub const MAX_HITS_PER_FILE: usize = 10_000_000;

/// Check if adding another hit would exceed [`MAX_HITS_PER_FILE`].
///
/// Call this with the current count BEFORE adding a new hit.
/// Returns an error message if adding would exceed the limit, None if safe to add.
///
/// # Examples
///
/// ```
/// use tophits::utils::validation::{check_hit_limit, MAX_HITS_PER_FILE};
///
/// assert!(check_hit_limit(0).is_none());
/// assert!(check_hit_limit(MAX_HITS_PER_FILE).is_some());
/// ```
#[must_use]
pub fn check_hit_limit(count: usize) -> Option<String> {
    if count >= MAX_HITS_PER_FILE {
        Some(format!(
            "Too many hits: adding another would exceed maximum of {MAX_HITS_PER_FILE}"
        ))
    } else {
        None
    }
}

/// Check if the path is a gzipped file
#[must_use]
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
pub fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Validate an effective database size for E-value computation.
///
/// Returns an error message unless `z` is finite and positive.
#[must_use]
pub fn check_dbsize(z: f64) -> Option<String> {
    if z.is_finite() && z > 0.0 {
        None
    } else {
        Some(format!("Database size must be a positive number, got {z}"))
    }
}
