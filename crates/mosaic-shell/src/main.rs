//! Entrypoint for the headless Mosaic shell.
//!
//! The binary delegates to [`mosaic_shell::run`], which loads configuration,
//! installs telemetry, loads plugins, and executes one subcommand.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    mosaic_shell::run(std::env::args_os(), &mut stdout, &mut stderr)
}
