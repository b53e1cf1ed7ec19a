//! # prm-cli — Appendix G Baseline Toolchain
//!
//! Provides the `prm` command-line interface over the compliance rule
//! crates.
//!
//! ## Subcommands
//!
//! - `prm econ-limits`: Economizer high limits for one air loop.
//! - `prm system-type`: Baseline system number and heating fuel.
//! - `prm baseline`: Run the baseline rule pipeline over a model file.
//! - `prm standards validate`: Check a standards directory before a run.
//!
//! ```bash
//! prm econ-limits --template 90.1-2019 --climate-zone "ASHRAE 169-2013-5A" \
//!     --model office.json --air-loop "VAV 1"
//! prm system-type --climate-zone "ASHRAE 169-2013-4A" --area-type nonresidential \
//!     --fuel fossil --area-ft2 40000 --stories 3
//! prm baseline --model office.json --config run.yaml --out baseline.json
//! prm standards validate --standards ./standards
//! ```

pub mod baseline;
pub mod lookup;
pub mod standards;

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use prm_standards::StandardsData;

/// Load the bundled standards tables, with the tables in `dir` (if given)
/// taking precedence row-for-row.
pub fn load_standards(dir: Option<&Path>) -> Result<StandardsData> {
    let bundled = StandardsData::bundled().context("failed to parse bundled standards tables")?;
    let Some(dir) = dir else {
        return Ok(bundled);
    };
    let mut data = StandardsData::load_dir(dir)
        .with_context(|| format!("failed to load standards directory: {}", dir.display()))?;
    data.extend(bundled);
    Ok(data)
}

/// Write `value` as pretty JSON to `path`, or to stdout when `path` is `None`.
pub fn write_json<T: Serialize>(value: &T, path: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    match path {
        Some(path) => std::fs::write(path, json + "\n")
            .with_context(|| format!("failed to write output: {}", path.display())),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_standards_without_dir_is_bundled() {
        let data = load_standards(None).unwrap();
        assert!(data.table("economizers").is_some());
    }

    #[test]
    fn load_standards_dir_rows_come_first() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("economizers.json"),
            r#"{"economizers": [{"template": "90.1-2019", "climate_zone": "ASHRAE 169-2013-5A", "fixed_dry_bulb_high_limit_shutoff_temp": 70.0}]}"#,
        )
        .unwrap();
        let data = load_standards(Some(dir.path())).unwrap();
        let first = &data.table("economizers").unwrap()[0];
        assert_eq!(first["fixed_dry_bulb_high_limit_shutoff_temp"], 70.0);
    }

    #[test]
    fn load_standards_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_standards(Some(&dir.path().join("absent"))).is_err());
    }

    #[test]
    fn write_json_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_json(&vec![1, 2, 3], Some(&path)).unwrap();
        let parsed: Vec<i32> = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, vec![1, 2, 3]);
    }
}
