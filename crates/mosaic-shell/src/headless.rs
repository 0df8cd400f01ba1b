//! In-memory shell surfaces.
//!
//! The headless shell keeps status bars, toolbars, the launcher, and the icon
//! search path in memory so the extension host can run without a display.
//! Widgets are [`Label`]s, a name plus the text the shell would draw, and
//! [`Button`]s, labels that run a callback when clicked.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use mosaic_plugins::{IconResolver, Launcher, MonitorId, StatusBar, Toolbar, Widget};
use tracing::debug;

const HEADLESS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::headless");

/// A named piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    name: String,
    text: String,
}

impl Label {
    /// Creates a label.
    #[must_use]
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Text shown by the label.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Renders any widget as text: labels and buttons show their text, other
    /// widgets their name.
    #[must_use]
    pub fn render(widget: &dyn Widget) -> String {
        let any = widget.as_any();
        if let Some(label) = any.downcast_ref::<Self>() {
            return label.text.clone();
        }
        any.downcast_ref::<Button>().map_or_else(
            || widget.widget_name().to_owned(),
            |button| format!("[{}]", button.label.text),
        )
    }
}

impl Widget for Label {
    fn widget_name(&self) -> &str {
        &self.name
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A label that runs a callback when clicked.
pub struct Button {
    label: Label,
    on_click: Rc<dyn Fn()>,
}

impl Button {
    /// Creates a button.
    #[must_use]
    pub fn new(name: impl Into<String>, text: impl Into<String>, on_click: impl Fn() + 'static) -> Self {
        Self {
            label: Label::new(name, text),
            on_click: Rc::new(on_click),
        }
    }

    /// Runs the button's callback.
    pub fn click(&self) {
        (self.on_click)();
    }
}

impl std::fmt::Debug for Button {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Button")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl Widget for Button {
    fn widget_name(&self) -> &str {
        &self.label.name
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Toolbar holding widgets in memory.
#[derive(Debug, Default)]
pub struct HeadlessToolbar {
    widgets: RefCell<Vec<Box<dyn Widget>>>,
}

impl HeadlessToolbar {
    /// Rendered text of every widget, in display order.
    #[must_use]
    pub fn rendered(&self) -> Vec<String> {
        self.widgets
            .borrow()
            .iter()
            .map(|widget| Label::render(widget.as_ref()))
            .collect()
    }

    /// Clicks the first button named `name`, returning `false` when there is
    /// none.
    pub fn click(&self, name: &str) -> bool {
        let on_click = self
            .widgets
            .borrow()
            .iter()
            .filter(|widget| widget.widget_name() == name)
            .find_map(|widget| widget.as_any().downcast_ref::<Button>())
            .map(|button| Rc::clone(&button.on_click));
        let Some(callback) = on_click else {
            return false;
        };
        callback();
        true
    }
}

impl Toolbar for HeadlessToolbar {
    fn clear(&self) {
        self.widgets.borrow_mut().clear();
    }

    fn add_widget(&self, widget: Box<dyn Widget>) {
        self.widgets.borrow_mut().push(widget);
    }

    fn widget_names(&self) -> Vec<String> {
        self.widgets
            .borrow()
            .iter()
            .map(|widget| widget.widget_name().to_owned())
            .collect()
    }
}

/// Status bar bound to one monitor.
#[derive(Debug)]
pub struct HeadlessStatusBar {
    monitor: MonitorId,
    toolbar: Rc<HeadlessToolbar>,
}

impl HeadlessStatusBar {
    /// Creates a bar with an empty toolbar.
    #[must_use]
    pub fn new(monitor: MonitorId) -> Self {
        Self {
            monitor,
            toolbar: Rc::new(HeadlessToolbar::default()),
        }
    }

    /// One bar per monitor, in the order given.
    #[must_use]
    pub fn for_monitors(monitors: &[MonitorId]) -> Vec<Rc<Self>> {
        monitors
            .iter()
            .map(|monitor| Rc::new(Self::new(*monitor)))
            .collect()
    }

    /// The bar's concrete toolbar.
    #[must_use]
    pub fn headless_toolbar(&self) -> &HeadlessToolbar {
        &self.toolbar
    }
}

impl StatusBar for HeadlessStatusBar {
    fn monitor(&self) -> MonitorId {
        self.monitor
    }

    fn toolbar(&self) -> Rc<dyn Toolbar> {
        self.toolbar.clone()
    }
}

/// Launcher state without a window.
#[derive(Debug, Default)]
pub struct HeadlessLauncher {
    visible: Cell<bool>,
    input: RefCell<String>,
}

impl HeadlessLauncher {
    /// Current input text.
    #[must_use]
    pub fn input(&self) -> String {
        self.input.borrow().clone()
    }
}

impl Launcher for HeadlessLauncher {
    fn toggle(&self) {
        self.visible.set(!self.visible.get());
        debug!(target: HEADLESS_TARGET, visible = self.visible.get(), "launcher toggled");
    }

    fn is_visible(&self) -> bool {
        self.visible.get()
    }

    fn set_input(&self, text: &str) {
        text.clone_into(&mut self.input.borrow_mut());
    }
}

/// Icon search path shared by every unit with an `icons` folder.
#[derive(Debug, Default)]
pub struct IconSearchPaths {
    paths: RefCell<Vec<PathBuf>>,
}

impl IconSearchPaths {
    /// Registered directories, in registration order.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.paths.borrow().clone()
    }
}

impl IconResolver for IconSearchPaths {
    fn append_search_path(&self, path: &Path) {
        let mut paths = self.paths.borrow_mut();
        if !paths.iter().any(|known| known == path) {
            paths.push(path.to_path_buf());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_prefers_label_text() {
        let label = Label::new("clock", "12:00");
        assert_eq!(Label::render(&label), "12:00");
    }

    #[test]
    fn buttons_render_bracketed_and_run_their_callback() {
        let clicks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&clicks);
        let toolbar = HeadlessToolbar::default();
        toolbar.add_widget(Box::new(Button::new("toggle", "Apps", move || {
            counter.set(counter.get() + 1);
        })));

        assert_eq!(toolbar.rendered(), vec!["[Apps]"]);
        assert!(toolbar.click("toggle"));
        assert!(!toolbar.click("missing"));
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn toolbar_clear_removes_widgets() {
        let toolbar = HeadlessToolbar::default();
        toolbar.add_widget(Box::new(Label::new("a", "A")));
        toolbar.add_widget(Box::new(Label::new("b", "B")));
        assert_eq!(toolbar.widget_names(), vec!["a", "b"]);
        assert_eq!(toolbar.rendered(), vec!["A", "B"]);
        toolbar.clear();
        assert!(toolbar.widget_names().is_empty());
    }

    #[test]
    fn status_bar_hands_out_its_own_toolbar() {
        let bar = HeadlessStatusBar::new(0);
        bar.toolbar().add_widget(Box::new(Label::new("clock", "12:00")));
        assert_eq!(bar.headless_toolbar().rendered(), vec!["12:00"]);
    }

    #[test]
    fn bars_follow_monitor_order() {
        let bars = HeadlessStatusBar::for_monitors(&[2, 0]);
        let monitors: Vec<_> = bars.iter().map(|bar| bar.monitor()).collect();
        assert_eq!(monitors, vec![2, 0]);
    }

    #[test]
    fn launcher_toggles_and_keeps_input() {
        let launcher = HeadlessLauncher::default();
        launcher.set_input("pl");
        launcher.toggle();
        assert!(launcher.is_visible());
        assert_eq!(launcher.input(), "pl");
        launcher.toggle();
        assert!(!launcher.is_visible());
    }

    #[test]
    fn icon_paths_are_not_duplicated() {
        let icons = IconSearchPaths::default();
        icons.append_search_path(Path::new("/a/icons"));
        icons.append_search_path(Path::new("/a/icons"));
        icons.append_search_path(Path::new("/b/icons"));
        assert_eq!(
            icons.paths(),
            vec![PathBuf::from("/a/icons"), PathBuf::from("/b/icons")]
        );
    }
}
