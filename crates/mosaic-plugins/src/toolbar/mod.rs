//! Ordering and placement of toolbar contributions.
//!
//! Contributors named in the preference list come first, in the list's order.
//! The remaining contributors follow in the toolbar index's native order,
//! which is lexicographic by plugin name. An empty preference list therefore
//! yields the native order unchanged.
//!
//! Composition builds one fresh widget per contributor for every status bar,
//! replacing whatever the bar's toolbar held before. A contributor that fails
//! to build a widget is left out of that bar only.

use std::collections::BTreeSet;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::capability::ToolbarContributor;
use crate::context::{MonitorId, StatusBar};
use crate::error::PluginError;
use crate::registry::PluginRegistry;
use crate::unit::isolate;

/// Tracing target for toolbar composition.
const TOOLBAR_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::toolbar");

/// A widget that could not be built for one bar.
#[derive(Debug, Clone)]
pub struct WidgetFailure {
    /// Contributing plugin.
    pub plugin: String,
    /// Why the widget was omitted.
    pub error: PluginError,
}

/// Widgets placed on one status bar.
#[derive(Debug, Clone)]
pub struct BarComposition {
    /// Monitor of the bar.
    pub monitor: MonitorId,
    /// Plugins whose widgets were added, in display order.
    pub plugins: Vec<String>,
    /// Plugins whose widgets were omitted.
    pub failures: Vec<WidgetFailure>,
}

/// Outcome of [`ToolbarComposer::compose`], one record per status bar.
#[derive(Debug, Clone, Default)]
pub struct Composition {
    bars: Vec<BarComposition>,
}

impl Composition {
    /// Per-bar records in the order the bars were given.
    #[must_use]
    pub fn bars(&self) -> &[BarComposition] {
        &self.bars
    }

    /// Record for the bar on `monitor`.
    #[must_use]
    pub fn bar(&self, monitor: MonitorId) -> Option<&BarComposition> {
        self.bars.iter().find(|bar| bar.monitor == monitor)
    }
}

/// Orders toolbar contributors by a configured preference list.
///
/// # Example
///
/// ```
/// use mosaic_plugins::{PluginRegistry, ToolbarComposer};
///
/// let composer = ToolbarComposer::new(["clock", "launcher"]);
/// assert_eq!(composer.preference(), ["clock", "launcher"]);
/// assert!(composer.order(&PluginRegistry::new()).is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ToolbarComposer {
    preference: Vec<String>,
}

impl ToolbarComposer {
    /// Creates a composer with the given preference list.
    #[must_use]
    pub fn new<I, S>(preference: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            preference: preference.into_iter().map(Into::into).collect(),
        }
    }

    /// The configured preference list.
    #[must_use]
    pub fn preference(&self) -> &[String] {
        &self.preference
    }

    /// Toolbar contributors in display order, each exactly once.
    ///
    /// Preference entries that name no toolbar contributor are ignored, as
    /// are repeated entries.
    #[must_use]
    pub fn order<'r>(&self, registry: &'r PluginRegistry) -> Vec<&'r str> {
        let contributors: Vec<&'r str> = registry.toolbar_contributor_names().collect();
        if self.preference.is_empty() {
            return contributors;
        }

        let mut placed = BTreeSet::new();
        let mut ordered = Vec::with_capacity(contributors.len());
        for preferred in &self.preference {
            match contributors.iter().find(|name| **name == preferred.as_str()) {
                Some(name) if placed.insert(*name) => ordered.push(*name),
                Some(_) => {}
                None => {
                    debug!(target: TOOLBAR_TARGET, plugin = %preferred, "preferred toolbar plugin is not loaded");
                }
            }
        }
        ordered.extend(contributors.iter().filter(|name| !placed.contains(**name)));
        ordered
    }

    /// Replaces every bar's toolbar widgets with fresh contributions.
    #[must_use]
    pub fn compose(&self, registry: &PluginRegistry, status_bars: &[Rc<dyn StatusBar>]) -> Composition {
        let order = self.order(registry);
        let bars = status_bars
            .iter()
            .map(|bar| compose_bar(registry, &order, bar.as_ref()))
            .collect();
        Composition { bars }
    }
}

fn compose_bar(registry: &PluginRegistry, order: &[&str], bar: &dyn StatusBar) -> BarComposition {
    let toolbar = bar.toolbar();
    toolbar.clear();
    let mut composition = BarComposition {
        monitor: bar.monitor(),
        plugins: Vec::new(),
        failures: Vec::new(),
    };
    for name in order {
        let built = isolate(name, "toolbar_widget", || {
            registry
                .toolbar_contributor(name)
                .map(ToolbarContributor::toolbar_widget)
        })
        .and_then(Option::transpose);
        match built {
            Ok(None) => {}
            Ok(Some(widget)) => {
                toolbar.add_widget(widget);
                composition.plugins.push((*name).to_owned());
            }
            Err(error) => {
                warn!(
                    target: TOOLBAR_TARGET,
                    plugin = %name,
                    monitor = composition.monitor,
                    %error,
                    "omitting toolbar widget"
                );
                composition.failures.push(WidgetFailure {
                    plugin: (*name).to_owned(),
                    error,
                });
            }
        }
    }
    debug!(
        target: TOOLBAR_TARGET,
        monitor = composition.monitor,
        widgets = ?composition.plugins,
        "composed toolbar"
    );
    composition
}
