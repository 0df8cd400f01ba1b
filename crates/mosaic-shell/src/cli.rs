//! Command-line interface definitions for the `mosaic` binary.

use clap::{Parser, Subcommand};

/// Headless desktop shell driven by plugins.
#[derive(Parser, Debug)]
#[command(name = "mosaic", version, disable_help_subcommand = true)]
pub(crate) struct Cli {
    /// Emits JSON instead of text.
    #[arg(long, global = true)]
    pub(crate) json: bool,
    /// What to do once plugins are loaded.
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

/// Subcommands of the shell.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub(crate) enum CliCommand {
    /// Lists loaded plugins with their capabilities and commands.
    Plugins,
    /// Prints the toolbar of every status bar.
    Toolbar,
    /// Shows what the launcher renders for the given input.
    Query {
        /// Launcher input, for example `pl` or `fire`.
        #[arg(value_name = "TEXT", allow_hyphen_values = true)]
        text: String,
    },
    /// Runs an action of an entry produced by a launcher command.
    Run {
        /// Launcher input naming a command.
        #[arg(value_name = "TEXT", allow_hyphen_values = true)]
        text: String,
        /// Index of the entry whose action runs.
        #[arg(long, default_value_t = 0)]
        entry: usize,
        /// Index of the action to run.
        #[arg(long, default_value_t = 0)]
        action: usize,
        /// Confirms commands that ask before running.
        #[arg(long)]
        yes: bool,
    },
}
