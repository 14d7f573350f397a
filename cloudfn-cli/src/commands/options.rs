//! Options command implementation.
//!
//! Lists the closed value sets and bounds a manifest's options are checked
//! against.

use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::{Args, ValueEnum};
use cloudfn::options::DEFAULT_REGION;
use cloudfn::{MAX_TIMEOUT_SECONDS, MIN_TIMEOUT_SECONDS, SUPPORTED_REGIONS, VALID_MEMORY_OPTIONS};
use serde::Serialize;

/// List supported regions, memory tiers, and timeout bounds.
#[derive(Args)]
pub struct OptionsCommand {
    /// Output format
    #[arg(long, value_enum, default_value = "text", ignore_case = true)]
    pub format: OptionsFormat,
}

/// Output format for the options command.
#[derive(Clone, Copy, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OptionsFormat {
    /// Human-readable listing
    Text,
    /// JSON object
    Json,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SupportedOptions {
    regions: &'static [&'static str],
    default_region: &'static str,
    memory: &'static [&'static str],
    timeout_seconds: TimeoutBounds,
}

#[derive(Serialize)]
struct TimeoutBounds {
    min: u32,
    max: u32,
}

impl SupportedOptions {
    fn current() -> Self {
        Self {
            regions: &SUPPORTED_REGIONS,
            default_region: DEFAULT_REGION.as_str(),
            memory: &VALID_MEMORY_OPTIONS,
            timeout_seconds: TimeoutBounds {
                min: MIN_TIMEOUT_SECONDS,
                max: MAX_TIMEOUT_SECONDS,
            },
        }
    }

    fn to_text(&self) -> String {
        let mut out = String::from("Regions:\n");
        for region in self.regions {
            if *region == self.default_region {
                out.push_str(&format!("  {region} (default)\n"));
            } else {
                out.push_str(&format!("  {region}\n"));
            }
        }
        out.push_str("Memory:\n");
        for memory in self.memory {
            out.push_str(&format!("  {memory}\n"));
        }
        out.push_str(&format!(
            "Timeout (seconds): {}-{}\n",
            self.timeout_seconds.min, self.timeout_seconds.max
        ));
        out
    }
}

impl OptionsCommand {
    pub fn execute(self, _global: &GlobalOptions) -> Result<(), CliError> {
        let options = SupportedOptions::current();
        match self.format {
            OptionsFormat::Text => print!("{}", options.to_text()),
            OptionsFormat::Json => println!("{}", serde_json::to_string_pretty(&options)?),
        }
        Ok(())
    }
}
