//! Capability contracts implemented by plugin instances.
//!
//! Every plugin implements [`Plugin`], which carries its identity and the
//! one-shot [`Plugin::initialise`] hook. Plugins advertise optional
//! capabilities by returning themselves from [`Plugin::as_toolbar`] or
//! [`Plugin::as_commands`]; the registry classifies instances through these
//! accessors rather than by inspecting concrete types.

use std::any::Any;
use std::fmt;

use crate::command::CommandHandler;
use crate::context::ShellContext;
use crate::error::PluginError;

/// Capabilities a plugin may advertise in addition to its base identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    /// Contributes a control to every status bar's toolbar.
    Toolbar,
    /// Contributes launcher commands.
    Commands,
}

impl Capability {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Toolbar => "toolbar",
            Self::Commands => "commands",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base contract shared by every plugin instance.
///
/// # Example
///
/// ```
/// use mosaic_plugins::{Plugin, PluginError, ShellContext};
///
/// struct Hello;
///
/// impl Plugin for Hello {
///     fn name(&self) -> &str {
///         "hello"
///     }
///
///     fn description(&self) -> &str {
///         "Says hello"
///     }
///
///     fn initialise(&mut self, _context: &ShellContext) -> Result<(), PluginError> {
///         Ok(())
///     }
/// }
///
/// assert!(Hello.capabilities().is_empty());
/// ```
pub trait Plugin {
    /// Stable identity of the plugin within a running host.
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// Binds the plugin to the shell. The host calls this exactly once per
    /// instance.
    ///
    /// # Errors
    ///
    /// Returns a [`PluginError`] when the plugin cannot bind to the shell. The
    /// host logs the failure and keeps the plugin registered.
    fn initialise(&mut self, context: &ShellContext) -> Result<(), PluginError>;

    /// Returns the toolbar capability when the plugin contributes a widget.
    fn as_toolbar(&self) -> Option<&dyn ToolbarContributor> {
        None
    }

    /// Returns the command capability when the plugin contributes launcher
    /// commands.
    fn as_commands(&self) -> Option<&dyn CommandContributor> {
        None
    }

    /// Lists the capabilities advertised through the accessors above.
    fn capabilities(&self) -> Vec<Capability> {
        let mut capabilities = Vec::new();
        if self.as_toolbar().is_some() {
            capabilities.push(Capability::Toolbar);
        }
        if self.as_commands().is_some() {
            capabilities.push(Capability::Commands);
        }
        capabilities
    }
}

/// Capability of plugins that place a control on the toolbar.
pub trait ToolbarContributor {
    /// Builds a widget for one status bar.
    ///
    /// The host calls this once per status bar and per composition pass. Each
    /// call must return an independent widget: widgets are never shared
    /// between bars.
    ///
    /// # Errors
    ///
    /// Returns a [`PluginError`] when the widget cannot be built; the widget
    /// is then omitted from that bar.
    fn toolbar_widget(&self) -> Result<Box<dyn Widget>, PluginError>;
}

/// Capability of plugins that answer launcher commands.
pub trait CommandContributor {
    /// Command tokens owned by this plugin.
    fn register_commands(&self) -> Vec<String>;

    /// Resolves a command token to a handler, or `None` when the plugin does
    /// not recognise it.
    fn run_command(&self, command: &str) -> Option<CommandHandler>;
}

/// Opaque renderable handle produced by plugins.
///
/// Rendering belongs to the shell; the host only moves widgets between
/// plugins and toolbar or launcher containers.
pub trait Widget: fmt::Debug {
    /// Identifier used by the shell for styling and diagnostics.
    fn widget_name(&self) -> &str;

    /// Supports downcasting to the concrete widget type.
    fn as_any(&self) -> &dyn Any;
}

#[cfg(test)]
mod tests;
