//! Plugin units compiled into the shell.
//!
//! Each unit registers a [`mosaic_plugins::UnitDefinition`] with `inventory`.
//! A unit only loads when a directory below the plugin root names it in its
//! `plugin.toml`, for example `unit = "clock"`.

pub mod clock;
pub mod launcher_toggle;
pub mod plugin_manager;

/// Identifiers of the built-in units, in lexicographic order.
pub const BUILT_IN_UNITS: &[&str] = &[clock::UNIT_ID, launcher_toggle::UNIT_ID, plugin_manager::UNIT_ID];
