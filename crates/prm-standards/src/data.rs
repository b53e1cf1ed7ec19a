//! # Standards Data — Lookup Tables
//!
//! The standards database is a set of named tables, each a list of JSON
//! records. Rule code selects a record by matching a set of criteria
//! (template, climate zone, building type, ...) against record fields.
//!
//! ## Sources
//!
//! 1. **Bundled defaults.** A JSON file compiled into the crate carrying the
//!    economizer, energy recovery, and prototype tables.
//! 2. **Standards directories.** `*.json` files holding an object of table
//!    arrays, and `*.csv` user data files whose stem names the table
//!    (`userdata_thermal_zone.csv` becomes table `userdata_thermal_zone`).
//!
//! Rows loaded first win: `find_object` returns the first match, so a
//! directory loaded ahead of the bundled defaults overrides them.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{StandardsError, StandardsResult};

const BUNDLED_TABLES: &str = include_str!("../data/ashrae_90_1.json");

// ---------------------------------------------------------------------------
// Search criteria
// ---------------------------------------------------------------------------

/// Field/value pairs a record must match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCriteria {
    fields: Vec<(String, Value)>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required field value.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((field.into(), value.into()));
        self
    }

    /// Whether `record` carries every criterion. Numbers compare by value,
    /// so `1` matches `1.0`.
    pub fn matches(&self, record: &Value) -> bool {
        self.fields.iter().all(|(field, wanted)| {
            match (record.get(field), wanted) {
                (Some(Value::Number(a)), Value::Number(b)) => a.as_f64() == b.as_f64(),
                (Some(actual), wanted) => actual == wanted,
                (None, _) => false,
            }
        })
    }
}

impl std::fmt::Display for SearchCriteria {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

/// First record of `rows` matching `criteria`.
pub fn find_object<'a>(rows: &'a [Value], criteria: &SearchCriteria) -> Option<&'a Value> {
    rows.iter().find(|r| criteria.matches(r))
}

// ---------------------------------------------------------------------------
// Standards data
// ---------------------------------------------------------------------------

/// A collection of named standards tables.
#[derive(Debug, Clone, Default)]
pub struct StandardsData {
    tables: BTreeMap<String, Vec<Value>>,
}

impl StandardsData {
    /// An empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// The tables compiled into this crate.
    pub fn bundled() -> StandardsResult<Self> {
        Self::from_json_str(BUNDLED_TABLES, "<bundled>")
    }

    /// Parse an object of table arrays.
    pub fn from_json_str(content: &str, origin: &str) -> StandardsResult<Self> {
        let root: Value = serde_json::from_str(content)?;
        let Value::Object(obj) = root else {
            return Err(StandardsError::MalformedFile {
                path: origin.to_string(),
                reason: "expected a JSON object of tables".to_string(),
            });
        };
        let mut data = Self::new();
        for (name, rows) in obj {
            let Value::Array(rows) = rows else {
                return Err(StandardsError::MalformedFile {
                    path: origin.to_string(),
                    reason: format!("table {name:?} is not an array"),
                });
            };
            data.append_rows(&name, rows);
        }
        Ok(data)
    }

    /// Load every `*.json` and `*.csv` file in `dir`, in file name order.
    pub fn load_dir(dir: &Path) -> StandardsResult<Self> {
        let mut entries: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect();
        entries.sort();

        let mut data = Self::new();
        for path in entries {
            match path.extension().and_then(|e| e.to_str()) {
                Some("json") => {
                    let content = std::fs::read_to_string(&path)?;
                    let loaded = Self::from_json_str(&content, &path.display().to_string())?;
                    data.extend(loaded);
                }
                Some("csv") => {
                    let Some(table) = path.file_stem().and_then(|s| s.to_str()) else {
                        continue;
                    };
                    let rows = read_csv_rows(&path)?;
                    tracing::debug!(table, rows = rows.len(), "loaded user data table");
                    data.append_rows(table, rows);
                }
                _ => {
                    tracing::debug!(path = %path.display(), "skipping non-table file");
                }
            }
        }
        tracing::info!(
            dir = %dir.display(),
            tables = data.tables.len(),
            "loaded standards directory"
        );
        Ok(data)
    }

    /// Append every table of `other` after this database's own rows.
    pub fn extend(&mut self, other: StandardsData) {
        for (name, rows) in other.tables {
            self.append_rows(&name, rows);
        }
    }

    /// Append rows to `table`, creating it if absent.
    pub fn append_rows(&mut self, table: &str, rows: Vec<Value>) {
        self.tables.entry(table.to_string()).or_default().extend(rows);
    }

    /// Replace `table` with `rows`.
    pub fn insert_table(&mut self, table: &str, rows: Vec<Value>) {
        self.tables.insert(table.to_string(), rows);
    }

    /// Rows of `table`.
    pub fn table(&self, table: &str) -> Option<&[Value]> {
        self.tables.get(table).map(|rows| rows.as_slice())
    }

    /// Names of all tables.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(|k| k.as_str())
    }

    /// First record of `table` matching `criteria`. A missing table is a miss.
    pub fn find_object(&self, table: &str, criteria: &SearchCriteria) -> Option<&Value> {
        let found = self.table(table).and_then(|rows| find_object(rows, criteria));
        if found.is_none() {
            tracing::debug!(table, criteria = %criteria, "no standards record matched");
        }
        found
    }

    /// Every record of `table` matching `criteria`.
    pub fn find_objects(&self, table: &str, criteria: &SearchCriteria) -> Vec<&Value> {
        self.table(table)
            .map(|rows| rows.iter().filter(|r| criteria.matches(r)).collect())
            .unwrap_or_default()
    }
}

/// Read a CSV file into records. Empty cells become `null`.
fn read_csv_rows(path: &Path) -> StandardsResult<Vec<Value>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = Map::new();
        for (header, cell) in headers.iter().zip(record.iter()) {
            let value = if cell.is_empty() {
                Value::Null
            } else {
                Value::String(cell.to_string())
            };
            row.insert(header.to_string(), value);
        }
        rows.push(Value::Object(row));
    }
    Ok(rows)
}
