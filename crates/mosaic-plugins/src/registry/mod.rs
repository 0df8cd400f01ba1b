//! Capability-indexed plugin registry.
//!
//! [`PluginRegistry::classify`] stores an instance under its name and adds it
//! to the toolbar and command indices matching the capabilities it
//! advertises. Command contributors have their tokens recorded in the
//! command-owner map.
//!
//! Collisions follow a last-wins policy. A plugin whose name is already taken
//! replaces the earlier instance, purging the earlier instance's index entries
//! and command tokens; a token claimed by a second plugin moves to that
//! plugin. Both cases are logged and returned in the [`Classification`] so
//! callers can observe them.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::capability::{Capability, CommandContributor, Plugin, ToolbarContributor};
use crate::command::CommandHandler;
use crate::discovery::LoadedPlugin;

/// Tracing target for registry operations.
const REGISTRY_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::registry");

/// Lifecycle state of a registered plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum PluginState {
    /// Classified but not yet initialised.
    Registered,
    /// `initialise` completed successfully.
    Initialised,
    /// `initialise` failed or panicked; the plugin stays registered.
    Failed(String),
}

impl PluginState {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Initialised => "initialised",
            Self::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for PluginState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A command token that moved from one plugin to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupersededCommand {
    /// The contested token.
    pub command: String,
    /// Plugin that owned the token before.
    pub previous_owner: String,
}

/// What [`PluginRegistry::classify`] did with an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Name the instance was stored under.
    pub name: String,
    /// Capabilities the instance advertised.
    pub capabilities: Vec<Capability>,
    /// `true` when an earlier instance with the same name was replaced.
    pub replaced_plugin: bool,
    /// Tokens taken over from other plugins.
    pub superseded_commands: Vec<SupersededCommand>,
}

/// What an instance advertises, read once before it is stored.
///
/// The registry indexes plugins from their profile alone, so classification
/// runs no plugin code once the profile has been read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginProfile {
    /// Plugin name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Advertised capabilities.
    pub capabilities: Vec<Capability>,
    /// Command tokens in registration order; empty unless the plugin
    /// contributes commands.
    pub commands: Vec<String>,
}

impl PluginProfile {
    /// Reads the profile by calling into `plugin`.
    #[must_use]
    pub fn read(plugin: &dyn Plugin) -> Self {
        let commands = plugin
            .as_commands()
            .map(CommandContributor::register_commands)
            .unwrap_or_default();
        Self {
            name: plugin.name().to_owned(),
            description: plugin.description().to_owned(),
            capabilities: plugin.capabilities(),
            commands,
        }
    }

    fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

/// Read-only description of a registered plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginSummary {
    /// Plugin name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Unit directory the plugin was loaded from, when known.
    pub unit: Option<String>,
    /// Advertised capabilities.
    pub capabilities: Vec<&'static str>,
    /// Command tokens currently owned by the plugin.
    pub commands: Vec<String>,
    /// Lifecycle state.
    pub state: PluginState,
}

pub(crate) struct RegisteredPlugin {
    pub(crate) plugin: Box<dyn Plugin>,
    pub(crate) profile: PluginProfile,
    pub(crate) unit: Option<String>,
    pub(crate) state: PluginState,
}

/// Registry of loaded plugin instances and their capability indices.
///
/// All maps are ordered by name, so iteration is deterministic.
///
/// # Example
///
/// ```
/// use mosaic_plugins::{Plugin, PluginError, PluginRegistry, ShellContext};
///
/// struct Quiet;
///
/// impl Plugin for Quiet {
///     fn name(&self) -> &str { "quiet" }
///     fn description(&self) -> &str { "Does nothing" }
///     fn initialise(&mut self, _context: &ShellContext) -> Result<(), PluginError> { Ok(()) }
/// }
///
/// let mut registry = PluginRegistry::new();
/// let classification = registry.classify(Box::new(Quiet));
/// assert!(classification.capabilities.is_empty());
/// assert!(registry.contains("quiet"));
/// assert_eq!(registry.toolbar_contributor_names().count(), 0);
/// ```
#[derive(Default)]
pub struct PluginRegistry {
    plugins: BTreeMap<String, RegisteredPlugin>,
    toolbar_contributors: BTreeSet<String>,
    command_contributors: BTreeSet<String>,
    command_owners: BTreeMap<String, String>,
}

impl PluginRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an instance and indexes it by capability.
    ///
    /// The profile is read here, outside any panic boundary; discovery uses
    /// [`classify_loaded`](Self::classify_loaded) instead.
    pub fn classify(&mut self, plugin: Box<dyn Plugin>) -> Classification {
        let profile = PluginProfile::read(plugin.as_ref());
        self.insert(None, plugin, profile)
    }

    /// Stores a discovered instance using the profile read during discovery.
    pub fn classify_loaded(&mut self, loaded: LoadedPlugin) -> Classification {
        let (unit, plugin, profile) = loaded.into_parts();
        self.insert(Some(unit), plugin, profile)
    }

    fn insert(&mut self, unit: Option<String>, plugin: Box<dyn Plugin>, profile: PluginProfile) -> Classification {
        let name = profile.name.clone();
        let capabilities = profile.capabilities.clone();
        let replaced_plugin = self.remove(&name);
        if replaced_plugin {
            warn!(target: REGISTRY_TARGET, plugin = %name, "plugin replaced an earlier instance with the same name");
        }

        if profile.has(Capability::Toolbar) {
            self.toolbar_contributors.insert(name.clone());
        }
        let mut superseded_commands = Vec::new();
        if profile.has(Capability::Commands) {
            self.command_contributors.insert(name.clone());
            for command in profile.commands.iter().cloned() {
                let previous = self.command_owners.insert(command.clone(), name.clone());
                if let Some(previous_owner) = previous.filter(|owner| owner != &name) {
                    warn!(
                        target: REGISTRY_TARGET,
                        command = %command,
                        previous_owner = %previous_owner,
                        owner = %name,
                        "command token reassigned"
                    );
                    superseded_commands.push(SupersededCommand {
                        command,
                        previous_owner,
                    });
                }
            }
        }

        debug!(target: REGISTRY_TARGET, plugin = %name, ?capabilities, "classified plugin");
        self.plugins.insert(
            name.clone(),
            RegisteredPlugin {
                plugin,
                profile,
                unit,
                state: PluginState::Registered,
            },
        );
        Classification {
            name,
            capabilities,
            replaced_plugin,
            superseded_commands,
        }
    }

    /// Drops `name` and every index entry referring to it.
    fn remove(&mut self, name: &str) -> bool {
        if self.plugins.remove(name).is_none() {
            return false;
        }
        self.toolbar_contributors.remove(name);
        self.command_contributors.remove(name);
        self.command_owners.retain(|_, owner| owner != name);
        true
    }

    /// Resolves a command token to its owner's handler.
    ///
    /// Returns `None` when the token is unknown or the owner declines it.
    #[must_use]
    pub fn resolve_command(&self, command: &str) -> Option<CommandHandler> {
        let owner = self.command_owners.get(command)?;
        self.command_contributor(owner)?.run_command(command)
    }

    /// Name of the plugin owning `command`.
    #[must_use]
    pub fn command_owner(&self, command: &str) -> Option<&str> {
        self.command_owners.get(command).map(String::as_str)
    }

    /// Command tokens and their owners, ordered by token.
    pub fn commands(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.command_owners
            .iter()
            .map(|(command, owner)| (command.as_str(), owner.as_str()))
    }

    /// Looks up a plugin by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Plugin> {
        self.plugins.get(name).map(|entry| entry.plugin.as_ref())
    }

    /// Returns `true` when a plugin named `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    /// Lifecycle state of the named plugin.
    #[must_use]
    pub fn state(&self, name: &str) -> Option<&PluginState> {
        self.plugins.get(name).map(|entry| &entry.state)
    }

    /// Registered plugin names in lexicographic order.
    pub fn plugin_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.plugins.keys().map(String::as_str)
    }

    /// Names in the toolbar index, in the index's native order.
    pub fn toolbar_contributor_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.toolbar_contributors.iter().map(String::as_str)
    }

    /// Names in the command index, in the index's native order.
    pub fn command_contributor_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.command_contributors.iter().map(String::as_str)
    }

    /// Toolbar capability of the named plugin.
    #[must_use]
    pub fn toolbar_contributor(&self, name: &str) -> Option<&dyn ToolbarContributor> {
        if !self.toolbar_contributors.contains(name) {
            return None;
        }
        self.plugins.get(name)?.plugin.as_toolbar()
    }

    /// Command capability of the named plugin.
    #[must_use]
    pub fn command_contributor(&self, name: &str) -> Option<&dyn CommandContributor> {
        if !self.command_contributors.contains(name) {
            return None;
        }
        self.plugins.get(name)?.plugin.as_commands()
    }

    /// Describes every registered plugin in name order.
    #[must_use]
    pub fn summaries(&self) -> Vec<PluginSummary> {
        self.plugins
            .iter()
            .map(|(name, entry)| PluginSummary {
                name: name.clone(),
                description: entry.profile.description.clone(),
                unit: entry.unit.clone(),
                capabilities: entry
                    .profile
                    .capabilities
                    .iter()
                    .copied()
                    .map(Capability::as_str)
                    .collect(),
                commands: self
                    .command_owners
                    .iter()
                    .filter(|(_, owner)| *owner == name)
                    .map(|(command, _)| command.clone())
                    .collect(),
                state: entry.state.clone(),
            })
            .collect()
    }

    /// Number of registered plugins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns `true` when no plugins are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Empties all four structures, dropping every instance.
    pub(crate) fn clear(&mut self) {
        self.toolbar_contributors.clear();
        self.command_contributors.clear();
        self.command_owners.clear();
        self.plugins.clear();
    }

    pub(crate) fn entries_mut(&mut self) -> impl Iterator<Item = (&str, &mut RegisteredPlugin)> + '_ {
        self.plugins
            .iter_mut()
            .map(|(name, entry)| (name.as_str(), entry))
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugins", &self.plugins.keys().collect::<Vec<_>>())
            .field("toolbar_contributors", &self.toolbar_contributors)
            .field("command_contributors", &self.command_contributors)
            .field("command_owners", &self.command_owners)
            .finish()
    }
}
