//! Shared configuration for the Mosaic shell.
//!
//! Values are layered by `ortho_config`: built-in defaults, then a TOML file
//! named by `--config-path` or `MOSAIC_CONFIG_PATH`, then `MOSAIC_*`
//! environment variables, then command-line flags.

mod defaults;
mod logging;

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    CONFIG_DIR_NAME, DEFAULT_LOG_FILTER, DEFAULT_PRIMARY_MONITOR, SYSTEM_APPLICATIONS_DIR,
    default_application_dirs, default_log_filter, default_log_filter_string, default_log_format,
    default_monitors, default_plugin_root,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Flags forwarded to the configuration loader by the binary.
pub const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--plugin-root",
    "--toolbar-order",
    "--primary-monitor",
    "--monitors",
    "--application-dirs",
    "--log-filter",
    "--log-format",
];

/// Runtime configuration for the shell and its extension host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "MOSAIC")]
pub struct Config {
    /// Directory scanned for plugin units.
    #[ortho_config(default = default_plugin_root())]
    pub plugin_root: Utf8PathBuf,
    /// Plugin names whose toolbar widgets come first, in order.
    #[ortho_config(default = Vec::new())]
    pub toolbar_order: Vec<String>,
    /// Monitor whose status bar provides the primary toolbar.
    #[ortho_config(default = DEFAULT_PRIMARY_MONITOR)]
    pub primary_monitor: u32,
    /// Monitors that receive a status bar.
    #[ortho_config(default = default_monitors())]
    pub monitors: Vec<u32>,
    /// Directories searched for desktop entries.
    #[ortho_config(default = default_application_dirs())]
    pub application_dirs: Vec<Utf8PathBuf>,
    /// Tracing filter directive.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Telemetry output format.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            plugin_root: default_plugin_root(),
            toolbar_order: Vec::new(),
            primary_monitor: DEFAULT_PRIMARY_MONITOR,
            monitors: default_monitors(),
            application_dirs: default_application_dirs(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Directory scanned for plugin units.
    #[must_use]
    pub fn plugin_root(&self) -> &Utf8Path {
        &self.plugin_root
    }

    /// Toolbar preference list.
    #[must_use]
    pub fn toolbar_order(&self) -> &[String] {
        &self.toolbar_order
    }

    /// Monitor whose status bar provides the primary toolbar.
    #[must_use]
    pub const fn primary_monitor(&self) -> u32 {
        self.primary_monitor
    }

    /// Monitors that receive a status bar, without duplicates, in the order
    /// first given. Falls back to the primary monitor when empty.
    #[must_use]
    pub fn monitors(&self) -> Vec<u32> {
        let mut monitors: Vec<u32> = Vec::with_capacity(self.monitors.len());
        for monitor in &self.monitors {
            if !monitors.contains(monitor) {
                monitors.push(*monitor);
            }
        }
        if monitors.is_empty() {
            monitors.push(self.primary_monitor);
        }
        monitors
    }

    /// Directories searched for desktop entries.
    #[must_use]
    pub fn application_dirs(&self) -> &[Utf8PathBuf] {
        &self.application_dirs
    }

    /// Tracing filter directive.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Telemetry output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}
