//! Command to validate a cloudfn manifest.

use crate::error::CliError;
use crate::utils::{load_manifest, load_overrides, GlobalOptions};
use clap::Args;
use std::path::PathBuf;

/// Validate a cloudfn manifest.
#[derive(Args)]
pub struct ValidateCommand {
    /// Manifest to validate (default: nearest cloudfn.yaml)
    #[arg(value_name = "MANIFEST")]
    pub manifest: Option<PathBuf>,
}

impl ValidateCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let (path, manifest) = load_manifest(self.manifest)?;
        let overrides = load_overrides(global)?;

        match manifest.resolve(&overrides) {
            Ok(functions) => {
                log::info!("Validated {}", path.display());
                if !global.quiet {
                    println!("Manifest is valid ({})", function_count(functions.len()));
                }
                Ok(())
            }
            Err(e) => {
                eprintln!("Validation error: {e}");
                Err(CliError::SemanticFailure(
                    "Manifest validation failed".to_string(),
                ))
            }
        }
    }
}

fn function_count(count: usize) -> String {
    if count == 1 {
        "1 function".to_string()
    } else {
        format!("{count} functions")
    }
}
