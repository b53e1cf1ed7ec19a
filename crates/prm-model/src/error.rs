//! # Model Errors

use thiserror::Error;

/// Errors raised while navigating, mutating, or persisting a building model.
#[derive(Error, Debug)]
pub enum ModelError {
    /// A referenced object does not exist in the model.
    #[error("{kind} not found: {key}")]
    NotFound {
        /// Object kind, e.g. `"thermal zone"`.
        kind: &'static str,
        /// Identifier or name used in the lookup.
        key: String,
    },

    /// An object with the same name already exists.
    #[error("duplicate {kind} name: {name}")]
    DuplicateName {
        /// Object kind.
        kind: &'static str,
        /// The conflicting name.
        name: String,
    },

    /// A field value is outside its enumeration.
    #[error("invalid value for {field}: {value:?}")]
    InvalidValue {
        /// Field name.
        field: &'static str,
        /// Rejected value.
        value: String,
    },

    /// The model file extension is not `.json`, `.yaml`, or `.yml`.
    #[error("unsupported model format: {0}")]
    UnsupportedFormat(String),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
