use camino::Utf8PathBuf;

use crate::logging::LogFormat;

/// Directory below the user's configuration directory holding Mosaic files.
pub const CONFIG_DIR_NAME: &str = "mosaic";

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Monitor whose status bar provides the primary toolbar by default.
pub const DEFAULT_PRIMARY_MONITOR: u32 = 0;

/// System-wide desktop entry directory searched after the user's.
pub const SYSTEM_APPLICATIONS_DIR: &str = "/usr/share/applications";

/// Default log filter expression used by the binary.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required.
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binary.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Plugin root below the user's configuration directory, or `./plugins`
/// when that directory cannot be determined.
#[must_use]
pub fn default_plugin_root() -> Utf8PathBuf {
    dirs::config_dir()
        .and_then(|path| Utf8PathBuf::from_path_buf(path).ok())
        .map_or_else(
            || Utf8PathBuf::from("plugins"),
            |base| base.join(CONFIG_DIR_NAME).join("plugins"),
        )
}

/// Monitors that receive a status bar by default.
#[must_use]
pub fn default_monitors() -> Vec<u32> {
    vec![DEFAULT_PRIMARY_MONITOR]
}

/// Desktop entry directories: the user's first, then the system's.
#[must_use]
pub fn default_application_dirs() -> Vec<Utf8PathBuf> {
    let user = dirs::data_dir()
        .and_then(|path| Utf8PathBuf::from_path_buf(path).ok())
        .map(|base| base.join("applications"));
    user.into_iter()
        .chain(std::iter::once(Utf8PathBuf::from(SYSTEM_APPLICATIONS_DIR)))
        .collect()
}
