//! Error types for the shell binary.

use std::io;
use std::sync::Arc;

use mosaic_plugins::PluginError;
use thiserror::Error;

use crate::telemetry::TelemetryError;

/// Failures surfaced to the operator.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    /// Command-line arguments were rejected.
    #[error("{0}")]
    CliUsage(clap::Error),
    /// Telemetry could not be installed.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    /// The extension host reported a failure.
    #[error(transparent)]
    Plugin(#[from] PluginError),
    /// `run` was given text that names no command.
    #[error("no command matches '{text}'")]
    NoCommand {
        /// Launcher input.
        text: String,
    },
    /// The selected entry does not exist.
    #[error("command '{command}' produced {available} entries; entry {index} does not exist")]
    EntryOutOfRange {
        /// Dispatched command.
        command: String,
        /// Requested entry index.
        index: usize,
        /// Number of entries produced.
        available: usize,
    },
    /// The selected action does not exist.
    #[error("entry '{title}' has {available} actions; action {index} does not exist")]
    ActionOutOfRange {
        /// Title of the selected entry.
        title: String,
        /// Requested action index.
        index: usize,
        /// Number of actions on the entry.
        available: usize,
    },
    /// The command's result must be confirmed with `--yes`.
    #[error("command '{command}' requires confirmation; pass --yes to run it")]
    ConfirmationRequired {
        /// Dispatched command.
        command: String,
    },
    /// Writing output failed.
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
    /// Serialising output failed.
    #[error("failed to serialise output: {0}")]
    Serialise(#[from] serde_json::Error),
}
