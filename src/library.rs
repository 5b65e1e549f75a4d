//! Repository-name normalization to library facet tags.
//!
//! The catalog knows repositories by their full display names; the index
//! wants one of four canonical library tags. The mapping is a fixed
//! enumerated table and an unrecognized name is fatal — a new repository
//! must be added here deliberately, not guessed at.

use crate::error::{IndexError, Result};

/// Normalize a repository display name to its canonical library tag.
///
/// # Errors
///
/// Returns [`IndexError::UnknownLibrary`] for names outside the table.
pub fn normalize_library_name(name: &str) -> Result<&'static str> {
    match name {
        "Albert and Shirley Small Special Collections Library"
        | "University of Virginia, Special Collections Dept." => Ok("Special Collections"),
        "University of Virginia, Law Library" => Ok("Law Library"),
        "Claude Moore Health Sciences Library" => Ok("Health Sciences"),
        "The Eleanor Crowder Bjoring Center for Nursing Historical Inquiry" => Ok("Nursing"),
        other => Err(IndexError::UnknownLibrary(other.to_string())),
    }
}
