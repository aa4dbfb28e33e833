//! Error type for the dos2-skills library.
//!
//! Every failure is fatal: the run aborts on the first error and no partial
//! workbook is written. The only "recoveries" are field defaults that are
//! part of the data format itself (a missing AP/SP icon means 0, a missing
//! resistance icon means `n/a`); those never surface as errors.
//!
//! Extraction variants carry the school and the 1-based skill index within
//! that school's table, so a message points at the offending row pair.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the dos2-skills library.
#[derive(Debug, Error)]
pub enum SkillsError {
    // ── Fetch errors ──────────────────────────────────────────────────────
    /// The request could not be sent or the body could not be read.
    #[error("Failed to fetch '{url}': {reason}\nCheck your internet connection.")]
    FetchFailed { url: String, reason: String },

    /// The request exceeded the configured timeout.
    #[error("Fetching '{url}' timed out after {secs}s\nIncrease --timeout.")]
    FetchTimeout { url: String, secs: u64 },

    /// The server answered with a non-success status.
    #[error("HTTP {status} for '{url}'")]
    HttpStatus { url: String, status: u16 },

    // ── Structural errors ─────────────────────────────────────────────────
    /// The page has no `table.wiki_table` with a body.
    #[error("No skill table found on the {school} page")]
    TableNotFound { school: String },

    /// The skill table has an odd number of body rows.
    #[error("Skill table on the {school} page has {rows} rows; expected header/detail pairs")]
    UnpairedRow { school: String, rows: usize },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// A cell the layout requires is absent.
    #[error("{school} skill #{index}: missing {cell}")]
    MissingCell {
        school: String,
        index: usize,
        cell: &'static str,
    },

    /// The name cell has no link, or the link has no `href`.
    #[error("{school} skill #{index}: name cell has no link")]
    MissingAnchor { school: String, index: usize },

    /// An icon the layout requires is absent.
    #[error("{school} skill #{index}: missing {icon} icon")]
    MissingIcon {
        school: String,
        index: usize,
        icon: &'static str,
    },

    /// The requirement cell contains no level digit.
    #[error("{school} skill #{index}: requirement cell has no level digit")]
    MissingRequirement { school: String, index: usize },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Building the workbook failed.
    #[error("Failed to build workbook: {0}")]
    ExportFailed(String),

    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Cache errors ──────────────────────────────────────────────────────
    /// The response cache could not be managed (e.g. `--clear-cache`).
    #[error("Response cache error: {0}")]
    Cache(#[from] page_cache::CacheError),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<rust_xlsxwriter::XlsxError> for SkillsError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        SkillsError::ExportFailed(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpaired_row_display() {
        let e = SkillsError::UnpairedRow {
            school: "Warfare".into(),
            rows: 37,
        };
        let msg = e.to_string();
        assert!(msg.contains("Warfare"), "got: {msg}");
        assert!(msg.contains("37"), "got: {msg}");
    }

    #[test]
    fn missing_requirement_names_row() {
        let e = SkillsError::MissingRequirement {
            school: "Geomancer".into(),
            index: 4,
        };
        assert_eq!(
            e.to_string(),
            "Geomancer skill #4: requirement cell has no level digit"
        );
    }

    #[test]
    fn http_status_display() {
        let e = SkillsError::HttpStatus {
            url: "https://example.com/x".into(),
            status: 404,
        };
        assert!(e.to_string().contains("404"));
        assert!(e.to_string().contains("example.com"));
    }
}
