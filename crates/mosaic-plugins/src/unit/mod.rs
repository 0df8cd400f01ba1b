//! Plugin units and the loaders that turn them into plugin instances.
//!
//! A unit is a directory below the plugin root whose `plugin.toml` names a
//! compiled-in unit definition. Unit definitions register themselves with
//! [`inventory`]; each lists the constructors of the plugin types it exports,
//! so one unit may contribute zero, one, or several plugin instances.
//!
//! The [`UnitLoader`] trait is the seam between discovery and unit execution.
//! [`CatalogueLoader`] is the production implementation; test code can
//! implement the trait to inject pre-built instances.

use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::capability::Plugin;
use crate::error::PluginError;

/// Tracing target for unit loading.
const UNIT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::unit");

/// Builds one plugin instance with no arguments.
pub type PluginConstructor = fn() -> Box<dyn Plugin>;

/// A compiled-in plugin unit.
///
/// # Example
///
/// ```
/// use mosaic_plugins::{Plugin, PluginError, ShellContext, UnitCatalogue, UnitDefinition};
///
/// struct Ping;
///
/// impl Plugin for Ping {
///     fn name(&self) -> &str { "ping" }
///     fn description(&self) -> &str { "Replies to ping" }
///     fn initialise(&mut self, _context: &ShellContext) -> Result<(), PluginError> { Ok(()) }
/// }
///
/// fn ping() -> Box<dyn Plugin> {
///     Box::new(Ping)
/// }
///
/// static PING: UnitDefinition = UnitDefinition::new("ping", &[ping]);
///
/// let mut catalogue = UnitCatalogue::new();
/// catalogue.register(&PING);
/// assert!(catalogue.contains("ping"));
/// ```
#[derive(Debug)]
pub struct UnitDefinition {
    id: &'static str,
    constructors: &'static [PluginConstructor],
}

impl UnitDefinition {
    /// Creates a unit definition.
    #[must_use]
    pub const fn new(id: &'static str, constructors: &'static [PluginConstructor]) -> Self {
        Self { id, constructors }
    }

    /// Identifier referenced by `plugin.toml`.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        self.id
    }

    /// Constructors of the plugin types the unit exports.
    #[must_use]
    pub const fn constructors(&self) -> &'static [PluginConstructor] {
        self.constructors
    }
}

inventory::collect!(UnitDefinition);

/// Unit definitions available to a loader, keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct UnitCatalogue {
    units: BTreeMap<&'static str, &'static [PluginConstructor]>,
}

impl UnitCatalogue {
    /// Creates an empty catalogue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects every unit submitted with `inventory::submit!`.
    #[must_use]
    pub fn from_inventory() -> Self {
        let mut catalogue = Self::new();
        for definition in inventory::iter::<UnitDefinition> {
            catalogue.register(definition);
        }
        catalogue
    }

    /// Adds a unit definition. A later definition with the same identifier
    /// replaces the earlier one; the return value reports whether that
    /// happened.
    pub fn register(&mut self, definition: &UnitDefinition) -> bool {
        let replaced = self
            .units
            .insert(definition.id(), definition.constructors())
            .is_some();
        debug!(target: UNIT_TARGET, unit = definition.id(), replaced, "registered unit definition");
        replaced
    }

    /// Constructors for the unit `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&'static [PluginConstructor]> {
        self.units.get(id).copied()
    }

    /// Returns `true` when `id` is known.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.units.contains_key(id)
    }

    /// Known unit identifiers in lexicographic order.
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.units.keys().copied()
    }

    /// Number of known units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Returns `true` when no units are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// Contents of a unit's `plugin.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitManifest {
    unit: String,
}

impl UnitManifest {
    /// Creates a manifest naming the unit `id`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { unit: id.into() }
    }

    /// Parses manifest text for the unit in directory `name`.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Manifest`] when the text is not valid TOML or
    /// does not name a unit.
    pub fn parse(name: &str, text: &str) -> Result<Self, PluginError> {
        let manifest: Self = toml::from_str(text).map_err(|error| PluginError::Manifest {
            unit: name.to_owned(),
            message: error.message().to_owned(),
        })?;
        if manifest.unit.trim().is_empty() {
            return Err(PluginError::Manifest {
                unit: name.to_owned(),
                message: String::from("`unit` must not be empty"),
            });
        }
        Ok(manifest)
    }

    /// Identifier of the unit definition to load.
    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }
}

/// A discovered unit ready to be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitSource {
    name: String,
    directory: PathBuf,
    manifest: UnitManifest,
}

impl UnitSource {
    /// Creates a unit source.
    #[must_use]
    pub fn new(name: impl Into<String>, directory: impl Into<PathBuf>, manifest: UnitManifest) -> Self {
        Self {
            name: name.into(),
            directory: directory.into(),
            manifest,
        }
    }

    /// Directory name of the unit.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory holding the unit.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Parsed `plugin.toml`.
    #[must_use]
    pub const fn manifest(&self) -> &UnitManifest {
        &self.manifest
    }
}

/// Turns a discovered unit into plugin instances.
pub trait UnitLoader {
    /// Loads the unit and instantiates every plugin type it exports.
    ///
    /// # Errors
    ///
    /// Returns a [`PluginError`] when the unit cannot be loaded. Discovery
    /// logs the failure and continues with the next unit.
    fn load(&self, source: &UnitSource) -> Result<Vec<Box<dyn Plugin>>, PluginError>;
}

/// Loads units from a [`UnitCatalogue`].
#[derive(Debug, Clone, Default)]
pub struct CatalogueLoader {
    catalogue: UnitCatalogue,
}

impl CatalogueLoader {
    /// Creates a loader over `catalogue`.
    #[must_use]
    pub const fn new(catalogue: UnitCatalogue) -> Self {
        Self { catalogue }
    }

    /// Creates a loader over every unit submitted with `inventory::submit!`.
    #[must_use]
    pub fn from_inventory() -> Self {
        Self::new(UnitCatalogue::from_inventory())
    }

    /// The loader's catalogue.
    #[must_use]
    pub const fn catalogue(&self) -> &UnitCatalogue {
        &self.catalogue
    }
}

impl UnitLoader for CatalogueLoader {
    fn load(&self, source: &UnitSource) -> Result<Vec<Box<dyn Plugin>>, PluginError> {
        let id = source.manifest().unit();
        let constructors = self
            .catalogue
            .get(id)
            .ok_or_else(|| PluginError::UnknownUnit {
                unit: source.name().to_owned(),
                id: id.to_owned(),
            })?;
        // A panic in any constructor discards the whole unit.
        isolate(source.name(), "load", || {
            constructors.iter().map(|construct| construct()).collect()
        })
    }
}

/// Runs plugin code, converting a panic into [`PluginError::Panicked`].
pub(crate) fn isolate<T>(
    name: &str,
    stage: &'static str,
    call: impl FnOnce() -> T,
) -> Result<T, PluginError> {
    panic::catch_unwind(AssertUnwindSafe(call)).map_err(|payload| PluginError::Panicked {
        name: name.to_owned(),
        stage,
        message: panic_message(payload.as_ref()),
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| String::from("non-string panic payload"))
}
