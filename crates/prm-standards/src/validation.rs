//! # Standards Validation
//!
//! Checks a loaded standards database before a run uses it.
//!
//! ## Validation Layers
//!
//! 1. **Structural**: the tables the rules key on are present and their
//!    rows carry the lookup fields.
//! 2. **Key validation**: `template` values name known code editions and
//!    `climate_zone` values parse as ASHRAE 169 designations.
//! 3. **Typed decoding**: user data and prototype tables decode into their
//!    typed forms.

use prm_core::{ClimateZone, Template};
use serde_json::Value;

use crate::data::StandardsData;
use crate::prototype::PrototypeRegistry;
use crate::userdata::UserData;

// ---------------------------------------------------------------------------
// Validation Results
// ---------------------------------------------------------------------------

/// Result of validating a standards database.
#[derive(Debug)]
pub struct StandardsValidationResult {
    /// Whether the database is usable.
    pub is_valid: bool,
    /// Validation errors, if any.
    pub errors: Vec<String>,
    /// Validation warnings (non-fatal).
    pub warnings: Vec<String>,
}

impl StandardsValidationResult {
    /// Create a successful validation result.
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Create a failed validation result with the given errors.
    pub fn fail(errors: Vec<String>) -> Self {
        Self {
            is_valid: false,
            errors,
            warnings: Vec::new(),
        }
    }

    /// Add an error. Marks result as invalid.
    pub fn add_error(&mut self, error: String) {
        self.is_valid = false;
        self.errors.push(error);
    }

    /// Add a warning (does not affect validity).
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Merge another result into this one.
    pub fn merge(&mut self, other: StandardsValidationResult) {
        if !other.is_valid {
            self.is_valid = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

// ---------------------------------------------------------------------------
// Table requirements
// ---------------------------------------------------------------------------

/// Tables the rules look up, with the fields every row must carry.
const REQUIRED_TABLES: &[(&str, &[&str])] = &[
    (
        "economizers",
        &["template", "climate_zone", "fixed_dry_bulb_high_limit_shutoff_temp"],
    ),
    ("energy_recovery", &["template", "climate_zone", "under_8000_hours"]),
    (
        "prototype_inputs",
        &["template", "building_type", "floor_area_m2", "number_of_stories"],
    ),
];

/// Validate a standards database.
pub fn validate_standards(data: &StandardsData) -> StandardsValidationResult {
    let mut result = StandardsValidationResult::ok();

    for (table, fields) in REQUIRED_TABLES {
        result.merge(validate_table(data, table, fields));
    }

    if let Err(e) = UserData::from_standards(data) {
        result.add_error(format!("user data: {e}"));
    }
    if let Err(e) = PrototypeRegistry::from_data(data) {
        result.add_error(format!("prototype tables: {e}"));
    }

    tracing::debug!(
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "validated standards data"
    );
    result
}

fn validate_table(data: &StandardsData, table: &str, fields: &[&str]) -> StandardsValidationResult {
    let Some(rows) = data.table(table) else {
        return StandardsValidationResult::fail(vec![format!("missing required table: {table}")]);
    };
    let mut result = StandardsValidationResult::ok();
    if rows.is_empty() {
        result.add_warning(format!("table {table} is empty"));
    }

    for (i, row) in rows.iter().enumerate() {
        if !row.is_object() {
            result.add_error(format!("{table}[{i}] is not an object"));
            continue;
        }
        for field in fields {
            if row.get(*field).is_none() {
                result.add_error(format!("{table}[{i}] missing required field: {field}"));
            }
        }
        if let Some(Value::String(t)) = row.get("template") {
            // Unknown editions are tolerated; rows for them are never selected.
            if t.parse::<Template>().is_err() {
                result.add_warning(format!("{table}[{i}] has unrecognized template {t:?}"));
            }
        }
        if let Some(Value::String(cz)) = row.get("climate_zone") {
            if cz.starts_with("ASHRAE") && cz.parse::<ClimateZone>().is_err() {
                result.add_error(format!("{table}[{i}] has invalid climate zone {cz:?}"));
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bundled_data_is_valid() {
        let result = validate_standards(&StandardsData::bundled().unwrap());
        assert!(result.is_valid, "errors: {:?}", result.errors);
    }

    #[test]
    fn test_empty_data_reports_each_missing_table() {
        let result = validate_standards(&StandardsData::new());
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), REQUIRED_TABLES.len());
    }

    #[test]
    fn test_bad_climate_zone_and_missing_field() {
        let mut data = StandardsData::bundled().unwrap();
        data.append_rows(
            "economizers",
            vec![json!({"template": "90.1-2019", "climate_zone": "ASHRAE 169-2013-9Z"})],
        );
        let result = validate_standards(&data);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.contains("invalid climate zone")));
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("fixed_dry_bulb_high_limit_shutoff_temp")));
    }

    #[test]
    fn test_unknown_template_is_warning() {
        let mut data = StandardsData::bundled().unwrap();
        data.append_rows(
            "economizers",
            vec![json!({"template": "90.1-1999", "climate_zone": "ASHRAE 169-2013-5A", "fixed_dry_bulb_high_limit_shutoff_temp": 70})],
        );
        let result = validate_standards(&data);
        assert!(result.is_valid);
        assert!(result.warnings.iter().any(|w| w.contains("90.1-1999")));
    }

    #[test]
    fn test_merge_propagates_failure() {
        let mut a = StandardsValidationResult::ok();
        a.merge(StandardsValidationResult::fail(vec!["x".into()]));
        assert!(!a.is_valid);
        assert_eq!(a.errors, vec!["x".to_string()]);
    }
}
