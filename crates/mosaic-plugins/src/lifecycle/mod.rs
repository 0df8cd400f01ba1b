//! Plugin initialisation and neutralisation.
//!
//! [`initialise_all`] binds every registered plugin to the shell exactly once.
//! Failures, including panics, are logged with the plugin's name and recorded
//! in the returned [`InitialisationReport`]; they never stop the remaining
//! plugins from initialising. A failed plugin stays registered with a
//! [`PluginState::Failed`] state.
//!
//! [`neutralise_all`] empties the registry. There is no teardown hook:
//! dropping an instance releases whatever it acquired during `initialise`.

use tracing::{debug, info, warn};

use crate::context::ShellContext;
use crate::error::PluginError;
use crate::registry::{PluginRegistry, PluginState};
use crate::unit::isolate;

/// Tracing target for lifecycle operations.
const LIFECYCLE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::lifecycle");

/// A plugin whose `initialise` hook failed.
#[derive(Debug, Clone)]
pub struct InitialisationFailure {
    /// Plugin name.
    pub plugin: String,
    /// The reported failure.
    pub error: PluginError,
}

/// Outcome of [`initialise_all`].
#[derive(Debug, Clone, Default)]
pub struct InitialisationReport {
    initialised: Vec<String>,
    failures: Vec<InitialisationFailure>,
}

impl InitialisationReport {
    /// Plugins initialised by this call, in name order.
    #[must_use]
    pub fn initialised(&self) -> &[String] {
        &self.initialised
    }

    /// Plugins whose initialisation failed during this call.
    #[must_use]
    pub fn failures(&self) -> &[InitialisationFailure] {
        &self.failures
    }

    /// Returns `true` when every attempted plugin initialised.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Initialises every plugin that has not been initialised yet.
///
/// Plugins already initialised, or whose earlier initialisation failed, are
/// left alone, so calling this twice never initialises an instance twice.
pub fn initialise_all(registry: &mut PluginRegistry, context: &ShellContext) -> InitialisationReport {
    let mut report = InitialisationReport::default();
    for (name, entry) in registry.entries_mut() {
        if entry.state != PluginState::Registered {
            continue;
        }
        let plugin = &mut entry.plugin;
        let outcome = isolate(name, "initialise", || plugin.initialise(context)).and_then(|result| result);
        match outcome {
            Ok(()) => {
                entry.state = PluginState::Initialised;
                report.initialised.push(name.to_owned());
            }
            Err(error) => {
                warn!(target: LIFECYCLE_TARGET, plugin = %name, %error, "plugin failed to initialise");
                entry.state = PluginState::Failed(error.to_string());
                report.failures.push(InitialisationFailure {
                    plugin: name.to_owned(),
                    error,
                });
            }
        }
    }
    info!(
        target: LIFECYCLE_TARGET,
        count = report.initialised.len(),
        failed = report.failures.len(),
        "loaded {} plugins: ({})",
        report.initialised.len(),
        report.initialised.join(", ")
    );
    report
}

/// Drops every plugin instance and clears all registry indices.
///
/// Calling this on an empty registry is a no-op.
pub fn neutralise_all(registry: &mut PluginRegistry) {
    let count = registry.len();
    registry.clear();
    debug!(target: LIFECYCLE_TARGET, count, "neutralised plugins");
}
