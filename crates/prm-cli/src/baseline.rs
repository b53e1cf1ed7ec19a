//! # Baseline CLI — Run the Appendix G baseline rules over a model file.
//!
//! ```bash
//! prm baseline --model office.json --config run.yaml --out baseline.json
//! prm baseline --model office.yaml --standards ./standards --config run.yaml \
//!     --out baseline.yaml --report report.json
//! ```
//!
//! User data (`userdata_*` CSV tables) is read from the standards
//! directory. The transformed model is written to `--out`; the run report
//! goes to `--report`, or stdout.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use prm_model::{load_model, save_model};
use prm_rules::{run_baseline, BaselineReport, RunConfig};
use prm_standards::UserData;

use crate::{load_standards, write_json};

/// Arguments for `prm baseline`.
#[derive(Args, Debug)]
pub struct BaselineArgs {
    /// Proposed model file (`.json`, `.yaml`).
    #[arg(long)]
    pub model: PathBuf,

    /// Standards directory layered over the bundled tables.
    #[arg(long)]
    pub standards: Option<PathBuf>,

    /// Run configuration (YAML).
    #[arg(long)]
    pub config: PathBuf,

    /// Where to write the baseline model.
    #[arg(long)]
    pub out: PathBuf,

    /// Where to write the run report. Defaults to stdout.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// Execute `prm baseline`.
pub fn run_baseline_cmd(args: &BaselineArgs) -> Result<u8> {
    let report = baseline(args)?;
    write_json(&report, args.report.as_deref())?;
    Ok(0)
}

fn baseline(args: &BaselineArgs) -> Result<BaselineReport> {
    let run = RunConfig::load(&args.config)
        .with_context(|| format!("failed to load run config: {}", args.config.display()))?;
    let standards = load_standards(args.standards.as_deref())?;
    let user_data = UserData::from_standards(&standards).context("failed to decode user data")?;
    if !user_data.is_empty() {
        tracing::info!("user data tables present");
    }

    let mut model = load_model(&args.model)
        .with_context(|| format!("failed to load model: {}", args.model.display()))?;
    let report = run_baseline(&mut model, &standards, &run, &user_data)
        .with_context(|| format!("baseline run failed for {}", args.model.display()))?;

    save_model(&model, &args.out)
        .with_context(|| format!("failed to write baseline model: {}", args.out.display()))?;
    tracing::info!(out = %args.out.display(), "wrote baseline model");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use prm_model::Model;

    const RUN: &str = "template: 90.1-PRM-2019\nclimate_zone: ASHRAE 169-2013-4A\n";

    #[test]
    fn baseline_of_empty_model_writes_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let model_path = dir.path().join("in.json");
        let config_path = dir.path().join("run.yaml");
        save_model(&Model::new("Empty"), &model_path).unwrap();
        std::fs::write(&config_path, RUN).unwrap();

        let args = BaselineArgs {
            model: model_path,
            standards: None,
            config: config_path,
            out: dir.path().join("out.yaml"),
            report: Some(dir.path().join("report.json")),
        };
        assert_eq!(run_baseline_cmd(&args).unwrap(), 0);

        let baseline = load_model(&args.out).unwrap();
        assert_eq!(baseline.building.name, "Empty");
        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("report.json")).unwrap()).unwrap();
        assert_eq!(report["template"], "90.1-PRM-2019");
    }

    #[test]
    fn baseline_missing_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let args = BaselineArgs {
            model: dir.path().join("in.json"),
            standards: None,
            config: dir.path().join("absent.yaml"),
            out: dir.path().join("out.json"),
            report: None,
        };
        let err = run_baseline_cmd(&args).unwrap_err();
        assert!(format!("{err:#}").contains("run config"));
    }
}
