//! Build script for cloudfn-cli.
//!
//! This script generates a man page at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.

use clap::{Arg, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// IMPORTANT: Keep this structure synchronized with src/cli.rs
fn build_cli() -> Command {
    Command::new("cloudfn")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Validate and describe cloud function deployment manifests")
        .long_about(
            "Command-line tool for validating cloud function manifests and printing the \
             resolved deployment options of each function",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("skip-env")
                .long("skip-env")
                .help("Ignore CLOUDFN_* option overrides from the environment")
                .global(true)
                .action(clap::ArgAction::SetTrue)
                .env("CLOUDFN_SKIP_ENV"),
        )
        .subcommands(vec![
            Command::new("validate")
                .about("Validate a manifest")
                .long_about("Check a cloudfn.yaml manifest and every function option in it"),
            Command::new("describe")
                .about("Print the resolved function descriptors of a manifest")
                .long_about(
                    "Resolve defaults, environment overrides, and per-function options, then \
                     print each function's trigger and effective options as JSON or YAML",
                ),
            Command::new("options")
                .about("List supported regions, memory tiers, and timeout bounds")
                .long_about("Display the values accepted for each deployment option"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() {
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).unwrap();

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    man.render(&mut buffer).unwrap();

    fs::write(man_dir.join("cloudfn.1"), buffer).unwrap();

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
}
