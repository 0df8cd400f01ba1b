//! Domain errors raised by the extension host.
//!
//! All errors use `thiserror`-derived enums with structured context so callers
//! can inspect the failure programmatically. I/O errors are wrapped in `Arc`
//! to satisfy the `result_large_err` Clippy lint.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors arising while discovering, loading, initialising, or dispatching to
/// plugins.
#[derive(Debug, Clone, Error)]
pub enum PluginError {
    /// The configured plugin root does not exist or is not a directory.
    #[error("plugin root '{path}' could not be resolved")]
    MissingRoot {
        /// Root that was scanned.
        path: PathBuf,
    },

    /// Reading a directory or file below the plugin root failed.
    #[error("I/O error reading '{path}': {source}")]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// A unit's `plugin.toml` could not be parsed.
    #[error("manifest for unit '{unit}' is invalid: {message}")]
    Manifest {
        /// Directory name of the unit.
        unit: String,
        /// Description of the parse failure.
        message: String,
    },

    /// The manifest names a unit identifier that the loader does not know.
    #[error("unit '{unit}' references unknown plugin unit '{id}'")]
    UnknownUnit {
        /// Directory name of the unit.
        unit: String,
        /// Identifier requested by the manifest.
        id: String,
    },

    /// Plugin code panicked while the host was calling into it.
    #[error("plugin code panicked during {stage} of '{name}': {message}")]
    Panicked {
        /// Unit directory or plugin name.
        name: String,
        /// Host stage that was running (for example `load`).
        stage: &'static str,
        /// Panic payload rendered as text.
        message: String,
    },

    /// A plugin's `initialise` hook reported a failure.
    #[error("plugin '{name}' failed to initialise: {message}")]
    Initialisation {
        /// Plugin name.
        name: String,
        /// Human-readable failure description.
        message: String,
    },

    /// A toolbar contributor could not build its widget.
    #[error("plugin '{name}' failed to build its toolbar widget: {message}")]
    ToolbarWidget {
        /// Plugin name.
        name: String,
        /// Human-readable failure description.
        message: String,
    },

    /// A command result producer failed.
    #[error("command '{command}' failed: {message}")]
    Command {
        /// Command token that was dispatched.
        command: String,
        /// Human-readable failure description.
        message: String,
    },

    /// A launcher entry could not be constructed.
    #[error(transparent)]
    Entry(#[from] EntryError),

    /// The shell context requires at least one status bar.
    #[error("the shell has no status bars to bind plugins to")]
    NoStatusBars,
}

impl PluginError {
    /// Builds an [`PluginError::Io`] error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source: Arc::new(source),
        }
    }

    /// Builds an initialisation failure for the named plugin.
    pub fn initialisation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Initialisation {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Builds a command failure for the given token.
    pub fn command(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Command {
            command: command.into(),
            message: message.into(),
        }
    }
}

/// Errors raised while constructing launcher display records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    /// Neither a plain nor a markup description was supplied.
    #[error("launcher entries must provide either a plain or a markup description")]
    MissingDescription,

    /// Both a plain and a markup description were supplied.
    #[error("launcher entries accept a plain or a markup description, not both")]
    ConflictingDescriptions,

    /// A key combination string was empty.
    #[error("key combination must not be empty")]
    EmptyKeys,

    /// A key combination named no non-modifier key.
    #[error("key combination '{0}' has no key besides modifiers")]
    MissingKey(String),

    /// A key combination named more than one non-modifier key.
    #[error("key combination '{0}' names more than one key")]
    MultipleKeys(String),
}
