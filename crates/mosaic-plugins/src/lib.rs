//! Extension host for the Mosaic desktop shell.
//!
//! The `mosaic-plugins` crate discovers plugin units below a root directory,
//! classifies each plugin instance by the capabilities it advertises, binds
//! every instance to the shell exactly once, and exposes the plugins'
//! contributions back to the shell: toolbar widgets in a configurable order
//! and launcher commands resolved from free-text input.
//!
//! Plugins are compiled in. A unit directory holds a `plugin.toml` naming a
//! [`UnitDefinition`] that registered itself with `inventory::submit!`; the
//! definition lists the constructors of the plugin types the unit exports.
//!
//! # Architecture
//!
//! [`PluginDiscovery`] walks the root and hands each unit to a
//! [`UnitLoader`]. The resulting instances are classified by the
//! [`PluginRegistry`], initialised by [`initialise_all`], laid out on every
//! status bar by the [`ToolbarComposer`], and queried by the
//! [`CommandRouter`]. [`ExtensionHost`] ties these together and applies the
//! [`ShellRequest`]s plugins queue through their [`ShellContext`].
//!
//! All host work runs on the shell's UI thread; shared state uses `Rc` and
//! `RefCell`.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::rc::Rc;
//!
//! use mosaic_plugins::{CatalogueLoader, ExtensionHost, ShellBindings};
//! # use mosaic_plugins::{Launcher, StatusBar};
//! # fn shell() -> (Vec<Rc<dyn StatusBar>>, Rc<dyn Launcher>) { unimplemented!() }
//!
//! let (status_bars, launcher) = shell();
//! let mut host = ExtensionHost::new(
//!     "/home/user/.config/mosaic/plugins",
//!     Box::new(CatalogueLoader::from_inventory()),
//!     ShellBindings::new(status_bars, launcher),
//! )
//! .expect("the shell has status bars")
//! .with_toolbar_order(["launcher_toggle", "clock"]);
//!
//! let report = host.load();
//! println!("{} plugins loaded", host.registry().len());
//! let response = host.handle_input("pl").expect("command succeeds");
//! # let _ = (report, response);
//! ```

pub mod capability;
pub mod command;
pub mod context;
pub mod discovery;
pub mod entry;
pub mod error;
pub mod host;
pub mod lifecycle;
pub mod registry;
pub mod router;
pub mod toolbar;
pub mod unit;

#[cfg(test)]
mod tests;

pub use inventory;

pub use self::capability::{Capability, CommandContributor, Plugin, ToolbarContributor, Widget};
pub use self::command::{CommandHandler, CommandOutput, CommandResultKind, ResultProducer};
pub use self::context::{
    Launcher, MonitorId, Services, ShellContext, ShellRequest, StatusBar, Toolbar,
};
pub use self::discovery::{
    DiscoveryReport, ENTRY_FILE, ICONS_DIR, IconResolver, LoadedPlugin, NoIcons, PluginDiscovery,
    RESERVED_PREFIX, UnitFailure,
};
pub use self::entry::{
    ActionCallback, Description, KeyCombination, LauncherAction, LauncherEntry, Modifier,
};
pub use self::error::{EntryError, PluginError};
pub use self::host::{ExtensionHost, LoadReport, PluginListing, ShellBindings};
pub use self::lifecycle::{
    InitialisationFailure, InitialisationReport, initialise_all, neutralise_all,
};
pub use self::registry::{
    Classification, PluginProfile, PluginRegistry, PluginState, PluginSummary, SupersededCommand,
};
pub use self::router::{CommandRouter, LauncherResponse, split_input};
pub use self::toolbar::{BarComposition, Composition, ToolbarComposer, WidgetFailure};
pub use self::unit::{
    CatalogueLoader, PluginConstructor, UnitCatalogue, UnitDefinition, UnitLoader, UnitManifest,
    UnitSource,
};
