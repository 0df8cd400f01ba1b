//! Orchestration of discovery, classification, initialisation, toolbar
//! composition, and command routing.
//!
//! [`ExtensionHost`] owns the registry and everything needed to rebuild it.
//! Shell requests queued by plugins are applied only after the dispatch that
//! queued them has returned, so a reload requested from a command handler
//! never mutates the registry while the router is reading it.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use tracing::{debug, info, instrument};

use crate::context::{Launcher, MonitorId, ShellContext, ShellRequest, StatusBar};
use crate::discovery::{DiscoveryReport, IconResolver, NoIcons, PluginDiscovery};
use crate::entry::LauncherAction;
use crate::error::PluginError;
use crate::lifecycle::{InitialisationReport, initialise_all, neutralise_all};
use crate::registry::{Classification, PluginRegistry, PluginSummary};
use crate::router::{CommandRouter, LauncherResponse};
use crate::toolbar::{Composition, ToolbarComposer};
use crate::unit::UnitLoader;

/// Tracing target for host orchestration.
const HOST_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::host");

/// Service listing the plugins of the most recent load.
///
/// The host registers one listing in the shell context's services and
/// refreshes it after every load, so plugins can describe their peers.
#[derive(Debug, Default)]
pub struct PluginListing {
    summaries: RefCell<Vec<PluginSummary>>,
}

impl PluginListing {
    /// Summaries of the loaded plugins in name order.
    #[must_use]
    pub fn summaries(&self) -> Vec<PluginSummary> {
        self.summaries.borrow().clone()
    }

    /// Number of listed plugins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.summaries.borrow().len()
    }

    /// Returns `true` when no plugins are listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.summaries.borrow().is_empty()
    }

    fn replace(&self, summaries: Vec<PluginSummary>) {
        *self.summaries.borrow_mut() = summaries;
    }
}

/// Outcome of one load pass.
#[derive(Debug)]
pub struct LoadReport {
    /// Discovery results; loaded plugins have moved into the registry.
    pub discovery: DiscoveryReport,
    /// What classification did with each loaded plugin.
    pub classifications: Vec<Classification>,
    /// Initialisation results.
    pub initialisation: InitialisationReport,
    /// Toolbar composition for every status bar.
    pub composition: Composition,
}

/// Everything the host needs from the shell.
pub struct ShellBindings {
    /// Status bars, one per monitor.
    pub status_bars: Vec<Rc<dyn StatusBar>>,
    /// The launcher window.
    pub launcher: Rc<dyn Launcher>,
    /// Monitor whose bar provides the primary toolbar.
    pub primary_monitor: MonitorId,
    /// Icon-resolution subsystem.
    pub icons: Rc<dyn IconResolver>,
}

impl ShellBindings {
    /// Binds status bars and a launcher with no icon resolver.
    #[must_use]
    pub fn new(status_bars: Vec<Rc<dyn StatusBar>>, launcher: Rc<dyn Launcher>) -> Self {
        Self {
            status_bars,
            launcher,
            primary_monitor: 0,
            icons: Rc::new(NoIcons),
        }
    }

    /// Selects the primary monitor.
    #[must_use]
    pub const fn with_primary_monitor(mut self, monitor: MonitorId) -> Self {
        self.primary_monitor = monitor;
        self
    }

    /// Sets the icon resolver.
    #[must_use]
    pub fn with_icons(mut self, icons: Rc<dyn IconResolver>) -> Self {
        self.icons = icons;
        self
    }
}

/// Runtime that loads plugins and exposes their contributions to the shell.
pub struct ExtensionHost {
    registry: PluginRegistry,
    discovery: PluginDiscovery,
    loader: Box<dyn UnitLoader>,
    icons: Rc<dyn IconResolver>,
    composer: ToolbarComposer,
    status_bars: Vec<Rc<dyn StatusBar>>,
    context: ShellContext,
    listing: Rc<PluginListing>,
}

impl ExtensionHost {
    /// Creates a host scanning `root` and loading units with `loader`.
    ///
    /// No plugins are loaded until [`Self::load`] is called.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::NoStatusBars`] when the shell has no bars.
    pub fn new(
        root: impl Into<PathBuf>,
        loader: Box<dyn UnitLoader>,
        shell: ShellBindings,
    ) -> Result<Self, PluginError> {
        let context = ShellContext::new(&shell.status_bars, shell.launcher, shell.primary_monitor)?;
        let listing = Rc::new(PluginListing::default());
        context.services().insert(Rc::clone(&listing));
        Ok(Self {
            registry: PluginRegistry::new(),
            discovery: PluginDiscovery::new(root),
            loader,
            icons: shell.icons,
            composer: ToolbarComposer::default(),
            status_bars: shell.status_bars,
            context,
            listing,
        })
    }

    /// Sets the toolbar preference list used by later compositions.
    #[must_use]
    pub fn with_toolbar_order<I, S>(mut self, preference: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.composer = ToolbarComposer::new(preference);
        self
    }

    /// Discovers, classifies, and initialises plugins, then composes every
    /// toolbar.
    #[instrument(level = "debug", skip(self), fields(root = %self.discovery.root().display()))]
    pub fn load(&mut self) -> LoadReport {
        let mut discovery = self.discovery.discover(self.loader.as_ref(), self.icons.as_ref());
        let classifications = discovery
            .take_plugins()
            .into_iter()
            .map(|loaded| self.registry.classify_loaded(loaded))
            .collect();
        let initialisation = initialise_all(&mut self.registry, &self.context);
        let composition = self.compose_toolbars();
        self.listing.replace(self.registry.summaries());
        info!(
            target: HOST_TARGET,
            plugins = self.registry.len(),
            unit_failures = discovery.failures().len(),
            initialisation_failures = initialisation.failures().len(),
            "plugins loaded"
        );
        LoadReport {
            discovery,
            classifications,
            initialisation,
            composition,
        }
    }

    /// Drops every plugin and loads a fresh set.
    pub fn reload(&mut self) -> LoadReport {
        info!(target: HOST_TARGET, "reloading plugins");
        self.unload();
        self.load()
    }

    /// Drops every plugin instance and empties the plugin listing.
    ///
    /// Toolbars keep their widgets until the next composition.
    pub fn unload(&mut self) {
        neutralise_all(&mut self.registry);
        self.listing.replace(Vec::new());
    }

    /// Rebuilds every status bar's toolbar from the current registry.
    #[must_use]
    pub fn compose_toolbars(&self) -> Composition {
        self.composer.compose(&self.registry, &self.status_bars)
    }

    /// Routes launcher input, then applies requests queued while handling
    /// it.
    ///
    /// # Errors
    ///
    /// Returns the [`PluginError`] raised by a failing command handler.
    /// Queued requests are applied either way.
    pub fn handle_input(&mut self, text: &str) -> Result<LauncherResponse, PluginError> {
        let response = CommandRouter::new(&self.registry).route(text);
        self.process_requests();
        response
    }

    /// Runs a launcher action, then applies requests it queued.
    pub fn activate(&mut self, action: &LauncherAction) -> Vec<ShellRequest> {
        debug!(target: HOST_TARGET, action = action.name(), "activating launcher action");
        action.trigger();
        self.process_requests()
    }

    /// Applies the requests queued so far and returns them.
    ///
    /// Repeated reload requests in one batch cause a single reload. Requests
    /// queued while the batch is applied wait for the next call.
    pub fn process_requests(&mut self) -> Vec<ShellRequest> {
        let batch = self.context.take_requests();
        let mut reloaded = false;
        for request in &batch {
            debug!(target: HOST_TARGET, ?request, "applying shell request");
            match request {
                ShellRequest::ReloadPlugins if reloaded => {}
                ShellRequest::ReloadPlugins => {
                    reloaded = true;
                    let _report = self.reload();
                }
                ShellRequest::ToggleLauncher => self.context.launcher().toggle(),
                ShellRequest::OpenLauncherWith(command) => {
                    let launcher = self.context.launcher();
                    launcher.set_input(command);
                    if !launcher.is_visible() {
                        launcher.toggle();
                    }
                }
            }
        }
        batch
    }

    /// The plugin registry.
    #[must_use]
    pub const fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// The context shared with plugins.
    #[must_use]
    pub const fn context(&self) -> &ShellContext {
        &self.context
    }

    /// The plugin listing service.
    #[must_use]
    pub fn listing(&self) -> Rc<PluginListing> {
        Rc::clone(&self.listing)
    }

    /// The shell's status bars.
    #[must_use]
    pub fn status_bars(&self) -> &[Rc<dyn StatusBar>] {
        &self.status_bars
    }

    /// The toolbar composer.
    #[must_use]
    pub const fn composer(&self) -> &ToolbarComposer {
        &self.composer
    }
}

impl std::fmt::Debug for ExtensionHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionHost")
            .field("root", &self.discovery.root())
            .field("registry", &self.registry)
            .field("composer", &self.composer)
            .field("status_bars", &self.status_bars.len())
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}
