//! Main entry point for the cloudfn CLI.
//!
//! This is the command-line interface for cloudfn manifests:
//! - `validate`: Validate a manifest
//! - `describe`: Print resolved function descriptors
//! - `options`: List supported option values
//! - `completions`: Generate shell completion scripts

use clap::Parser;
use cloudfn_cli::cli::{Cli, Command};
use cloudfn_cli::utils::GlobalOptions;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = cloudfn::init_logger(cli.verbose, cli.quiet).install() {
        eprintln!("Warning: could not install logger: {e}");
    }

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        skip_env: cli.skip_env,
    };

    let result = match cli.command {
        Command::Validate(cmd) => cmd.execute(&global),
        Command::Describe(cmd) => cmd.execute(&global),
        Command::Options(cmd) => cmd.execute(&global),
        Command::Completions(cmd) => cmd.execute(&global),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
