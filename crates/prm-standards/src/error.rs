//! # Standards Errors

use thiserror::Error;

/// Errors raised while loading or resolving standards data.
#[derive(Error, Debug)]
pub enum StandardsError {
    /// No prototype input row exists for the configuration. Model creation
    /// cannot continue without one.
    #[error("no prototype inputs for template {template:?} and building type {building_type:?}")]
    PrototypeNotFound {
        /// Template name.
        template: String,
        /// Building type name.
        building_type: String,
    },

    /// Building type name is not one of the prototype archetypes.
    #[error("unknown building type: {0:?}")]
    UnknownBuildingType(String),

    /// A table row could not be decoded into its typed form.
    #[error("malformed row in table {table:?}: {source}")]
    MalformedRow {
        /// Table name.
        table: String,
        /// Decode failure.
        source: serde_json::Error,
    },

    /// A standards file is not a JSON object of table arrays.
    #[error("malformed standards file {path}: {reason}")]
    MalformedFile {
        /// File path.
        path: String,
        /// What was wrong.
        reason: String,
    },

    /// JSON error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias.
pub type StandardsResult<T> = Result<T, StandardsError>;
