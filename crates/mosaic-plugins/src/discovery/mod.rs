//! Discovery of plugin units below a root directory.
//!
//! Each immediate subdirectory of the root is a candidate unit. Directories
//! whose name starts with [`RESERVED_PREFIX`] hold templates and are skipped,
//! as are directories without a [`ENTRY_FILE`]. A unit's [`ICONS_DIR`] folder
//! is handed to the [`IconResolver`] before the unit is loaded so that icons
//! referenced during construction resolve.
//!
//! Failures are isolated per unit: a broken manifest, an unknown unit, or a
//! panic while constructing or profiling the unit's plugins is logged, recorded in the [`DiscoveryReport`], and
//! discovery moves on to the next directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};

use crate::capability::Plugin;
use crate::error::PluginError;
use crate::registry::PluginProfile;
use crate::unit::{UnitLoader, UnitManifest, UnitSource, isolate};

/// Tracing target for discovery.
const DISCOVERY_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::discovery");

/// File that marks a directory as a plugin unit.
pub const ENTRY_FILE: &str = "plugin.toml";

/// Directory-name prefix of template units that discovery ignores.
pub const RESERVED_PREFIX: char = '_';

/// Resource folder registered with the icon resolver.
pub const ICONS_DIR: &str = "icons";

/// Icon-resolution subsystem owned by the shell.
#[cfg_attr(test, mockall::automock)]
pub trait IconResolver {
    /// Appends a directory to the icon search path.
    fn append_search_path(&self, path: &Path);
}

/// Icon resolver that ignores every path.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIcons;

impl IconResolver for NoIcons {
    fn append_search_path(&self, _path: &Path) {}
}

/// A plugin instance together with the unit that produced it and the
/// profile it advertised.
pub struct LoadedPlugin {
    unit: String,
    plugin: Box<dyn Plugin>,
    profile: PluginProfile,
}

impl LoadedPlugin {
    /// Reads the plugin's profile, converting a panic into a unit failure.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Panicked`] when plugin code panics while the
    /// profile is read.
    pub fn read(unit: impl Into<String>, plugin: Box<dyn Plugin>) -> Result<Self, PluginError> {
        let unit = unit.into();
        let profile = isolate(&unit, "classify", || PluginProfile::read(plugin.as_ref()))?;
        Ok(Self { unit, plugin, profile })
    }

    /// Directory name of the unit.
    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// The plugin instance.
    #[must_use]
    pub fn plugin(&self) -> &dyn Plugin {
        self.plugin.as_ref()
    }

    /// What the plugin advertised when it was loaded.
    #[must_use]
    pub const fn profile(&self) -> &PluginProfile {
        &self.profile
    }

    /// Splits into the unit name, the instance, and its profile.
    #[must_use]
    pub fn into_parts(self) -> (String, Box<dyn Plugin>, PluginProfile) {
        (self.unit, self.plugin, self.profile)
    }
}

impl std::fmt::Debug for LoadedPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedPlugin")
            .field("unit", &self.unit)
            .field("plugin", &self.profile.name)
            .finish()
    }
}

/// A unit that failed to load.
#[derive(Debug, Clone)]
pub struct UnitFailure {
    /// Directory name of the unit.
    pub unit: String,
    /// Why the unit was discarded.
    pub error: PluginError,
}

/// Outcome of one discovery pass.
#[derive(Debug, Default)]
pub struct DiscoveryReport {
    plugins: Vec<LoadedPlugin>,
    failures: Vec<UnitFailure>,
    skipped: Vec<String>,
    root_error: Option<PluginError>,
}

impl DiscoveryReport {
    /// Successfully loaded plugins in discovery order.
    #[must_use]
    pub fn plugins(&self) -> &[LoadedPlugin] {
        &self.plugins
    }

    /// Units that failed to load.
    #[must_use]
    pub fn failures(&self) -> &[UnitFailure] {
        &self.failures
    }

    /// Directories that are not plugin units.
    #[must_use]
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    /// Error that prevented scanning the root, if any.
    #[must_use]
    pub const fn root_error(&self) -> Option<&PluginError> {
        self.root_error.as_ref()
    }

    /// Names of the loaded plugins in discovery order.
    #[must_use]
    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins
            .iter()
            .map(|loaded| loaded.profile().name.as_str())
            .collect()
    }

    /// Takes the loaded plugins, leaving the failure records in place.
    pub fn take_plugins(&mut self) -> Vec<LoadedPlugin> {
        std::mem::take(&mut self.plugins)
    }
}

/// Scans a plugin root for units.
///
/// # Example
///
/// ```
/// use mosaic_plugins::{CatalogueLoader, NoIcons, PluginDiscovery, UnitCatalogue};
///
/// let discovery = PluginDiscovery::new("/nonexistent/plugins");
/// let report = discovery.discover(&CatalogueLoader::new(UnitCatalogue::new()), &NoIcons);
/// assert!(report.plugins().is_empty());
/// assert!(report.root_error().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct PluginDiscovery {
    root: PathBuf,
}

impl PluginDiscovery {
    /// Creates a discovery pass rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory scanned for units.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Loads every unit below the root.
    ///
    /// A missing or unreadable root is logged and yields an empty report.
    #[must_use]
    pub fn discover(&self, loader: &dyn UnitLoader, icons: &dyn IconResolver) -> DiscoveryReport {
        let mut report = DiscoveryReport::default();
        let directories = match self.unit_directories() {
            Ok(directories) => directories,
            Err(root_error) => {
                error!(
                    target: DISCOVERY_TARGET,
                    root = %self.root.display(),
                    error = %root_error,
                    "cannot scan plugin root"
                );
                report.root_error = Some(root_error);
                return report;
            }
        };

        for (name, directory) in directories {
            if name.starts_with(RESERVED_PREFIX) {
                debug!(target: DISCOVERY_TARGET, unit = %name, "skipping reserved directory");
                report.skipped.push(name);
                continue;
            }
            let entry_file = directory.join(ENTRY_FILE);
            if !entry_file.is_file() {
                debug!(target: DISCOVERY_TARGET, unit = %name, "skipping directory without {ENTRY_FILE}");
                report.skipped.push(name);
                continue;
            }
            let icons_dir = directory.join(ICONS_DIR);
            if icons_dir.is_dir() {
                icons.append_search_path(&icons_dir);
            }

            match load_unit(loader, &name, directory, &entry_file) {
                Ok(plugins) => {
                    debug!(target: DISCOVERY_TARGET, unit = %name, count = plugins.len(), "loaded plugin unit");
                    report.plugins.extend(plugins);
                }
                Err(load_error) => {
                    warn!(target: DISCOVERY_TARGET, unit = %name, error = %load_error, "failed to load plugin unit");
                    report.failures.push(UnitFailure {
                        unit: name,
                        error: load_error,
                    });
                }
            }
        }
        report
    }

    /// Immediate subdirectories of the root, sorted by name.
    fn unit_directories(&self) -> Result<Vec<(String, PathBuf)>, PluginError> {
        if !self.root.is_dir() {
            return Err(PluginError::MissingRoot {
                path: self.root.clone(),
            });
        }
        let listing = fs::read_dir(&self.root).map_err(|source| PluginError::io(&self.root, source))?;
        Ok(named_directories(
            &self.root,
            listing.map(|item| item.map(|dir_entry| dir_entry.path())),
        ))
    }
}

/// Keeps the directories among `paths`, sorted by name.
///
/// An unreadable entry costs only that entry; the rest of the listing is
/// still scanned.
fn named_directories<I>(root: &Path, paths: I) -> Vec<(String, PathBuf)>
where
    I: IntoIterator<Item = io::Result<PathBuf>>,
{
    let mut directories = Vec::new();
    for item in paths {
        let path = match item {
            Ok(path) => path,
            Err(entry_error) => {
                warn!(
                    target: DISCOVERY_TARGET,
                    root = %root.display(),
                    error = %entry_error,
                    "skipping unreadable directory entry"
                );
                continue;
            }
        };
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|name| name.to_str()).map(str::to_owned) else {
            warn!(target: DISCOVERY_TARGET, directory = %path.display(), "skipping directory with a non-UTF-8 name");
            continue;
        };
        directories.push((name, path));
    }
    directories.sort();
    directories
}

fn load_unit(
    loader: &dyn UnitLoader,
    name: &str,
    directory: PathBuf,
    entry_file: &Path,
) -> Result<Vec<LoadedPlugin>, PluginError> {
    let text = fs::read_to_string(entry_file).map_err(|source| PluginError::io(entry_file, source))?;
    let manifest = UnitManifest::parse(name, &text)?;
    let plugins = loader.load(&UnitSource::new(name, directory, manifest))?;
    // One plugin that cannot be profiled discards the whole unit.
    plugins
        .into_iter()
        .map(|plugin| LoadedPlugin::read(name, plugin))
        .collect()
}
