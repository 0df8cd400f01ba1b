//! The headless shell: surfaces, the extension host, and application search.

use std::rc::Rc;

use mosaic_config::Config;
use mosaic_plugins::{
    CatalogueLoader, ExtensionHost, IconResolver, Launcher, LauncherResponse, LoadReport, PluginError, ShellBindings,
    ShellRequest, StatusBar, UnitLoader,
};
use tracing::info;

use crate::applications::ApplicationIndex;
use crate::errors::AppError;
use crate::headless::{HeadlessLauncher, HeadlessStatusBar, IconSearchPaths};

const SHELL_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::shell");

/// What running an entry action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Command that produced the entry.
    pub command: String,
    /// Title of the entry.
    pub entry: String,
    /// Name of the action that ran.
    pub action: String,
    /// Shell requests applied after the action returned.
    pub requests: Vec<ShellRequest>,
}

/// A shell whose bars, toolbars and launcher live in memory.
pub struct HeadlessShell {
    host: ExtensionHost,
    bars: Vec<Rc<HeadlessStatusBar>>,
    launcher: Rc<HeadlessLauncher>,
    icons: Rc<IconSearchPaths>,
    applications: ApplicationIndex,
    report: LoadReport,
}

impl HeadlessShell {
    /// Starts the shell with the units compiled into the binary and loads
    /// plugins.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::NoStatusBars`] when no monitor is configured.
    pub fn start(config: &Config) -> Result<Self, PluginError> {
        Self::start_with_loader(config, Box::new(CatalogueLoader::from_inventory()))
    }

    /// Starts the shell with a custom unit loader.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::NoStatusBars`] when no monitor is configured.
    pub fn start_with_loader(config: &Config, loader: Box<dyn UnitLoader>) -> Result<Self, PluginError> {
        let bars = HeadlessStatusBar::for_monitors(&config.monitors());
        let launcher = Rc::new(HeadlessLauncher::default());
        let icons = Rc::new(IconSearchPaths::default());
        let status_bars: Vec<Rc<dyn StatusBar>> = bars
            .iter()
            .map(|bar| Rc::clone(bar) as Rc<dyn StatusBar>)
            .collect();
        let bindings = ShellBindings::new(status_bars, Rc::clone(&launcher) as Rc<dyn Launcher>)
            .with_primary_monitor(config.primary_monitor())
            .with_icons(Rc::clone(&icons) as Rc<dyn IconResolver>);
        let mut host = ExtensionHost::new(config.plugin_root().as_std_path(), loader, bindings)?
            .with_toolbar_order(config.toolbar_order().iter().cloned());
        let report = host.load();
        let applications = ApplicationIndex::load(config.application_dirs());
        info!(
            target: SHELL_TARGET,
            bars = bars.len(),
            applications = applications.len(),
            "headless shell started"
        );
        Ok(Self {
            host,
            bars,
            launcher,
            icons,
            applications,
            report,
        })
    }

    /// Routes launcher input.
    ///
    /// # Errors
    ///
    /// Returns the failure of the dispatched command handler.
    pub fn query(&mut self, text: &str) -> Result<LauncherResponse, PluginError> {
        self.launcher.set_input(text);
        self.host.handle_input(text)
    }

    /// Dispatches `text` and runs one action of one produced entry.
    ///
    /// # Errors
    ///
    /// Fails when `text` names no command, when the command needs confirmation
    /// and `confirmed` is false, or when the entry or action does not exist.
    pub fn run(
        &mut self,
        text: &str,
        entry: usize,
        action: usize,
        confirmed: bool,
    ) -> Result<RunOutcome, AppError> {
        let LauncherResponse::Dispatched { command, kind, output } = self.query(text)? else {
            return Err(AppError::NoCommand {
                text: text.to_owned(),
            });
        };
        if kind.requires_confirmation() && !confirmed {
            return Err(AppError::ConfirmationRequired { command });
        }
        let entries = output.entries();
        let Some(selected) = entries.get(entry) else {
            return Err(AppError::EntryOutOfRange {
                command,
                index: entry,
                available: entries.len(),
            });
        };
        let Some(chosen) = selected.actions().get(action) else {
            return Err(AppError::ActionOutOfRange {
                title: selected.title().to_owned(),
                index: action,
                available: selected.actions().len(),
            });
        };
        let requests = self.host.activate(chosen);
        Ok(RunOutcome {
            command,
            entry: selected.title().to_owned(),
            action: chosen.name().to_owned(),
            requests,
        })
    }

    /// Report of the initial load.
    #[must_use]
    pub const fn report(&self) -> &LoadReport {
        &self.report
    }

    /// The extension host.
    #[must_use]
    pub const fn host(&self) -> &ExtensionHost {
        &self.host
    }

    /// Status bars in monitor order.
    #[must_use]
    pub fn bars(&self) -> &[Rc<HeadlessStatusBar>] {
        &self.bars
    }

    /// The launcher.
    #[must_use]
    pub fn launcher(&self) -> &HeadlessLauncher {
        &self.launcher
    }

    /// Icon directories registered by plugin units.
    #[must_use]
    pub fn icons(&self) -> &IconSearchPaths {
        &self.icons
    }

    /// Applications available to the search fallback.
    #[must_use]
    pub const fn applications(&self) -> &ApplicationIndex {
        &self.applications
    }
}

impl std::fmt::Debug for HeadlessShell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessShell")
            .field("host", &self.host)
            .field("bars", &self.bars.len())
            .field("applications", &self.applications.len())
            .finish_non_exhaustive()
    }
}
