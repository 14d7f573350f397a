//! Shell completion generation command.
//!
//! This module provides the `completions` command which generates shell completion
//! scripts for bash, zsh, fish, and PowerShell.

use crate::cli::Cli;
use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use std::io;

/// Name of the installed binary
const BIN_NAME: &str = "cloudfn";

/// Generate shell completion scripts
#[derive(Parser)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsCommand {
    /// Execute the completions command.
    pub fn execute(&self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut cmd = Cli::command();

        if !global.quiet {
            self.print_instructions();
        }

        generate(self.shell, &mut cmd, BIN_NAME, &mut io::stdout());

        Ok(())
    }

    fn print_instructions(&self) {
        eprintln!("# Generating {} completion script", self.shell);
        eprintln!("# Run the following command to enable completions:");

        match self.shell {
            Shell::Bash => {
                eprintln!(
                    "#   cloudfn completions bash > ~/.local/share/bash-completion/completions/cloudfn"
                );
                eprintln!("# Or source it directly in ~/.bashrc:");
                eprintln!("#   eval \"$(cloudfn completions bash)\"");
            }
            Shell::Zsh => {
                eprintln!("#   cloudfn completions zsh > ~/.zsh/completions/_cloudfn");
                eprintln!("# Make sure ~/.zsh/completions is in your $fpath");
            }
            Shell::Fish => {
                eprintln!("#   cloudfn completions fish > ~/.config/fish/completions/cloudfn.fish");
                eprintln!("# Or add to config.fish:");
                eprintln!("#   cloudfn completions fish | source");
            }
            Shell::PowerShell => {
                eprintln!("#   cloudfn completions powershell > $PROFILE");
            }
            _ => {}
        }

        eprintln!();
    }
}
