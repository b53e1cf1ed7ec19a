//! # Model Persistence
//!
//! Loads and saves models as JSON or YAML, chosen by file extension.

use std::path::Path;

use crate::error::ModelError;
use crate::model::Model;

enum Format {
    Json,
    Yaml,
}

fn format_of(path: &Path) -> Result<Format, ModelError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("yaml") | Some("yml") => Ok(Format::Yaml),
        _ => Err(ModelError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Read a model from `path`.
pub fn load_model(path: &Path) -> Result<Model, ModelError> {
    let format = format_of(path)?;
    let content = std::fs::read_to_string(path)?;
    let model: Model = match format {
        Format::Json => serde_json::from_str(&content)?,
        Format::Yaml => serde_yaml::from_str(&content)?,
    };
    tracing::debug!(
        path = %path.display(),
        spaces = model.spaces.len(),
        zones = model.thermal_zones.len(),
        air_loops = model.air_loops.len(),
        "loaded building model"
    );
    Ok(model)
}

/// Write `model` to `path`.
pub fn save_model(model: &Model, path: &Path) -> Result<(), ModelError> {
    let content = match format_of(path)? {
        Format::Json => serde_json::to_string_pretty(model)?,
        Format::Yaml => serde_yaml::to_string(model)?,
    };
    std::fs::write(path, content)?;
    tracing::debug!(path = %path.display(), "saved building model");
    Ok(())
}
