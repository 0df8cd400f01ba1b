//! Headless Mosaic shell.
//!
//! The shell binds the extension host from `mosaic-plugins` to in-memory
//! status bars, toolbars and a launcher, loads the plugin units compiled into
//! the binary, and answers one subcommand per invocation:
//!
//! - `mosaic plugins` lists the loaded plugins.
//! - `mosaic toolbar` prints every bar's toolbar.
//! - `mosaic query <TEXT>` shows what the launcher renders for `TEXT`.
//! - `mosaic run <TEXT>` runs an action of an entry produced by `TEXT`.
//!
//! Configuration flags such as `--plugin-root` must precede the subcommand.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

pub mod applications;
mod cli;
mod config;
mod errors;
pub mod headless;
pub mod output;
pub mod shell;
pub mod telemetry;
pub mod units;

#[cfg(test)]
mod tests;

use cli::{Cli, CliCommand};
use config::{ConfigLoader, OrthoConfigLoader, split_config_arguments};
pub use errors::AppError;
pub use shell::{HeadlessShell, RunOutcome};

const CLI_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::cli");

/// Runs the shell using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    run_with_loader(args, stdout, stderr, &OrthoConfigLoader)
}

fn run_with_loader<I, W, E, L>(args: I, stdout: &mut W, stderr: &mut E, loader: &L) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    let arguments: Vec<OsString> = args.into_iter().collect();
    match execute(&arguments, stdout, loader) {
        Ok(()) => ExitCode::SUCCESS,
        Err(AppError::CliUsage(error)) if !error.use_stderr() => {
            let _ = write!(stdout, "{error}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            let _ = writeln!(stderr, "{error}");
            ExitCode::FAILURE
        }
    }
}

fn execute<W, L>(arguments: &[OsString], stdout: &mut W, loader: &L) -> Result<(), AppError>
where
    W: Write,
    L: ConfigLoader,
{
    let split = split_config_arguments(arguments);
    let cli = Cli::try_parse_from(&split.cli_arguments).map_err(AppError::CliUsage)?;
    let config = loader.load(&split.config_arguments)?;
    telemetry::initialise(&config)?;
    debug!(target: CLI_TARGET, command = ?cli.command, root = %config.plugin_root(), "starting shell");
    let mut shell = HeadlessShell::start(&config)?;
    match cli.command {
        CliCommand::Plugins => output::write_plugins(stdout, &shell, cli.json),
        CliCommand::Toolbar => output::write_toolbars(stdout, &shell, cli.json),
        CliCommand::Query { text } => {
            let response = shell.query(&text)?;
            output::write_response(stdout, &response, shell.applications(), cli.json)
        }
        CliCommand::Run {
            text,
            entry,
            action,
            yes,
        } => {
            let outcome = shell.run(&text, entry, action, yes)?;
            output::write_outcome(stdout, &outcome, cli.json)
        }
    }
}
