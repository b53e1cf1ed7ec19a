//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error type shared by every crate in the workspace for
//! parse and classification failures. All errors use `thiserror` for
//! derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Parse errors carry the offending input verbatim.
//! - Lookup misses are not errors here: rule modules report them as
//!   "no requirement applies" and log a warning.

use thiserror::Error;

/// Top-level error type for the foundational types.
#[derive(Error, Debug)]
pub enum PrmError {
    /// The climate zone designation could not be parsed.
    #[error("invalid climate zone {input:?}: {reason}")]
    InvalidClimateZone {
        /// The designation as supplied.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The template name is not a recognized code edition.
    #[error("unknown template: {0:?}")]
    UnknownTemplate(String),

    /// The custom program name is not recognized.
    #[error("unknown custom program: {0:?}")]
    UnknownCustomProgram(String),

    /// A classification keyword was not recognized.
    #[error("invalid {field}: {value:?}")]
    InvalidValue {
        /// Field being parsed.
        field: &'static str,
        /// The value as supplied.
        value: String,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
