//! # Standards CLI — Inspect and validate a standards directory.
//!
//! ```bash
//! prm standards validate --standards ./standards
//! prm standards validate              # bundled tables only
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use prm_standards::validate_standards;

use crate::load_standards;

/// Standards subcommand arguments.
#[derive(Args, Debug)]
pub struct StandardsArgs {
    #[command(subcommand)]
    pub command: StandardsCommand,
}

/// Available standards subcommands.
#[derive(Subcommand, Debug)]
pub enum StandardsCommand {
    /// Check that the tables the rules key on are present and well formed.
    Validate {
        /// Standards directory layered over the bundled tables.
        #[arg(long)]
        standards: Option<PathBuf>,
    },
}

/// Execute the standards subcommand.
pub fn run_standards(args: &StandardsArgs) -> Result<u8> {
    match &args.command {
        StandardsCommand::Validate { standards } => run_validate(standards.as_ref()),
    }
}

fn run_validate(dir: Option<&PathBuf>) -> Result<u8> {
    let data = load_standards(dir.map(|d| d.as_path()))?;
    let result = validate_standards(&data);

    println!("  tables:   {}", data.table_names().count());
    println!("  errors:   {}", result.errors.len());
    println!("  warnings: {}", result.warnings.len());
    for warning in &result.warnings {
        println!("  WARN  {warning}");
    }
    for error in &result.errors {
        println!("  FAIL  {error}");
    }

    if result.is_valid {
        tracing::info!("standards data is valid");
        Ok(0)
    } else {
        Ok(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_bundled_passes() {
        assert_eq!(run_validate(None).unwrap(), 0);
    }

    #[test]
    fn validate_bad_row_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("economizers.json"),
            r#"{"economizers": [{"template": "90.1-2019", "climate_zone": "ASHRAE 169-2013-9Z"}]}"#,
        )
        .unwrap();
        assert_eq!(run_validate(Some(&dir.path().to_path_buf())).unwrap(), 1);
    }
}
