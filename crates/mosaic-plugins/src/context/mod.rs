//! The narrow façade through which plugins reach the shell.
//!
//! Plugins receive a [`ShellContext`] in [`Plugin::initialise`] and may keep a
//! clone of it. The context exposes the launcher, the primary toolbar, typed
//! service handles, and a queue of deferred [`ShellRequest`]s. Requests are
//! applied by the host only after the current dispatch has returned, so a
//! command handler may ask for a reload without mutating the registry it is
//! being dispatched from.
//!
//! [`Plugin::initialise`]: crate::capability::Plugin::initialise

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::rc::Rc;

use crate::capability::Widget;
use crate::error::PluginError;

/// Identifier of the monitor a status bar is bound to.
pub type MonitorId = u32;

/// Launcher window owned by the shell.
pub trait Launcher {
    /// Shows the launcher when hidden and hides it when shown.
    fn toggle(&self);

    /// Returns `true` while the launcher is visible.
    fn is_visible(&self) -> bool;

    /// Replaces the launcher's input text.
    fn set_input(&self, text: &str);
}

/// Toolbar container at the far end of a status bar.
pub trait Toolbar {
    /// Removes every widget.
    fn clear(&self);

    /// Appends a widget.
    fn add_widget(&self, widget: Box<dyn Widget>);

    /// Names of the widgets currently shown, in display order.
    fn widget_names(&self) -> Vec<String>;
}

/// A status bar bound to one monitor.
pub trait StatusBar {
    /// Monitor the bar is shown on.
    fn monitor(&self) -> MonitorId;

    /// The bar's toolbar container.
    fn toolbar(&self) -> Rc<dyn Toolbar>;
}

/// Work deferred until the current dispatch has returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellRequest {
    /// Neutralise every plugin and run a fresh discovery pass.
    ReloadPlugins,
    /// Toggle the launcher's visibility.
    ToggleLauncher,
    /// Open the launcher with the given input text.
    OpenLauncherWith(String),
}

/// Typed service handles shared with plugins.
///
/// Services replace process-wide singletons: the shell inserts a handle once
/// and plugins look it up by type.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use mosaic_plugins::Services;
///
/// struct Connection(&'static str);
///
/// let services = Services::default();
/// services.insert(Rc::new(Connection("wm")));
/// let connection = services.get::<Connection>().expect("service registered");
/// assert_eq!(connection.0, "wm");
/// ```
#[derive(Default)]
pub struct Services {
    handles: RefCell<HashMap<TypeId, Rc<dyn Any>>>,
}

impl Services {
    /// Registers a service, returning the handle it replaced.
    pub fn insert<T: Any>(&self, service: Rc<T>) -> Option<Rc<T>> {
        self.handles
            .borrow_mut()
            .insert(TypeId::of::<T>(), service)
            .and_then(|previous| previous.downcast::<T>().ok())
    }

    /// Looks up a service by type.
    #[must_use]
    pub fn get<T: Any>(&self) -> Option<Rc<T>> {
        self.handles
            .borrow()
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|handle| handle.downcast::<T>().ok())
    }

    /// Returns `true` when a service of type `T` is registered.
    #[must_use]
    pub fn contains<T: Any>(&self) -> bool {
        self.handles.borrow().contains_key(&TypeId::of::<T>())
    }
}

impl fmt::Debug for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Services")
            .field("count", &self.handles.borrow().len())
            .finish()
    }
}

/// Shell operations available to plugins.
///
/// Cloning a context is cheap; clones share the launcher, the toolbar, the
/// services, and the request queue.
#[derive(Clone)]
pub struct ShellContext {
    launcher: Rc<dyn Launcher>,
    toolbar: Rc<dyn Toolbar>,
    primary_monitor: MonitorId,
    services: Rc<Services>,
    requests: Rc<RefCell<VecDeque<ShellRequest>>>,
}

impl ShellContext {
    /// Binds a context to the shell's status bars and launcher.
    ///
    /// The primary toolbar belongs to the bar shown on `primary_monitor`; when
    /// no bar matches, the first bar is used.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::NoStatusBars`] when `status_bars` is empty.
    pub fn new(
        status_bars: &[Rc<dyn StatusBar>],
        launcher: Rc<dyn Launcher>,
        primary_monitor: MonitorId,
    ) -> Result<Self, PluginError> {
        let primary = status_bars
            .iter()
            .find(|bar| bar.monitor() == primary_monitor)
            .or_else(|| status_bars.first())
            .ok_or(PluginError::NoStatusBars)?;
        Ok(Self {
            launcher,
            toolbar: primary.toolbar(),
            primary_monitor: primary.monitor(),
            services: Rc::new(Services::default()),
            requests: Rc::new(RefCell::new(VecDeque::new())),
        })
    }

    /// The shell's launcher.
    #[must_use]
    pub fn launcher(&self) -> Rc<dyn Launcher> {
        Rc::clone(&self.launcher)
    }

    /// Toolbar of the primary status bar.
    #[must_use]
    pub fn toolbar(&self) -> Rc<dyn Toolbar> {
        Rc::clone(&self.toolbar)
    }

    /// Monitor of the bar whose toolbar [`Self::toolbar`] returns.
    #[must_use]
    pub const fn primary_monitor(&self) -> MonitorId {
        self.primary_monitor
    }

    /// Typed services registered by the shell.
    #[must_use]
    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Asks the host to reload every plugin once the current dispatch ends.
    pub fn request_reload(&self) {
        self.push(ShellRequest::ReloadPlugins);
    }

    /// Asks the host to toggle the launcher once the current dispatch ends.
    pub fn toggle_launcher(&self) {
        self.push(ShellRequest::ToggleLauncher);
    }

    /// Asks the host to open the launcher with `command` as its input.
    pub fn open_launcher_with(&self, command: impl Into<String>) {
        self.push(ShellRequest::OpenLauncherWith(command.into()));
    }

    /// Number of requests waiting for the host.
    #[must_use]
    pub fn pending_requests(&self) -> usize {
        self.requests.borrow().len()
    }

    pub(crate) fn take_requests(&self) -> Vec<ShellRequest> {
        self.requests.borrow_mut().drain(..).collect()
    }

    fn push(&self, request: ShellRequest) {
        self.requests.borrow_mut().push_back(request);
    }
}

impl fmt::Debug for ShellContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShellContext")
            .field("primary_monitor", &self.primary_monitor)
            .field("services", &self.services)
            .field("pending_requests", &self.pending_requests())
            .finish_non_exhaustive()
    }
}
