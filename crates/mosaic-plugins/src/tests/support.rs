//! Test doubles for the shell and configurable plugins.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use crate::capability::{CommandContributor, Plugin, ToolbarContributor, Widget};
use crate::command::CommandHandler;
use crate::context::{Launcher, MonitorId, ShellContext, StatusBar, Toolbar};
use crate::entry::{KeyCombination, LauncherAction, LauncherEntry};
use crate::discovery::ENTRY_FILE;
use crate::error::PluginError;
use crate::unit::{UnitLoader, UnitSource};

// ---------------------------------------------------------------------------
// Shell doubles
// ---------------------------------------------------------------------------

/// Widget that only carries a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TextWidget {
    name: String,
}

impl TextWidget {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Widget for TextWidget {
    fn widget_name(&self) -> &str {
        &self.name
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Toolbar recording the widgets it holds.
#[derive(Debug, Default)]
pub(crate) struct FakeToolbar {
    widgets: RefCell<Vec<Box<dyn Widget>>>,
    clears: Cell<u32>,
}

impl FakeToolbar {
    pub(crate) fn clears(&self) -> u32 {
        self.clears.get()
    }
}

impl Toolbar for FakeToolbar {
    fn clear(&self) {
        self.widgets.borrow_mut().clear();
        self.clears.set(self.clears.get() + 1);
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

/// Status bar owning a [`FakeToolbar`].
#[derive(Debug)]
pub(crate) struct FakeStatusBar {
    monitor: MonitorId,
    toolbar: Rc<FakeToolbar>,
}

impl FakeStatusBar {
    pub(crate) fn new(monitor: MonitorId) -> Self {
        Self {
            monitor,
            toolbar: Rc::new(FakeToolbar::default()),
        }
    }

    pub(crate) fn fake_toolbar(&self) -> Rc<FakeToolbar> {
        Rc::clone(&self.toolbar)
    }
}

impl StatusBar for FakeStatusBar {
    fn monitor(&self) -> MonitorId {
        self.monitor
    }

    fn toolbar(&self) -> Rc<dyn Toolbar> {
        self.toolbar.clone()
    }
}

/// Launcher recording its visibility and input text.
#[derive(Debug, Default)]
pub(crate) struct FakeLauncher {
    visible: Cell<bool>,
    input: RefCell<String>,
}

impl FakeLauncher {
    pub(crate) fn input(&self) -> String {
        self.input.borrow().clone()
    }
}

impl Launcher for FakeLauncher {
    fn toggle(&self) {
        self.visible.set(!self.visible.get());
    }

    fn is_visible(&self) -> bool {
        self.visible.get()
    }

    fn set_input(&self, text: &str) {
        text.clone_into(&mut self.input.borrow_mut());
    }
}

/// Builds one fake status bar per monitor.
pub(crate) fn bars(monitors: &[MonitorId]) -> Vec<Rc<dyn StatusBar>> {
    monitors
        .iter()
        .map(|monitor| Rc::new(FakeStatusBar::new(*monitor)) as Rc<dyn StatusBar>)
        .collect()
}

/// Builds a context bound to a single bar on monitor 0.
pub(crate) fn context() -> ShellContext {
    ShellContext::new(&bars(&[0]), Rc::new(FakeLauncher::default()), 0).expect("context binds")
}

// ---------------------------------------------------------------------------
// Plugin doubles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum InitBehaviour {
    #[default]
    Succeed,
    Fail,
    Panic,
}

/// Plugin whose capabilities and failure modes are chosen by the test.
///
/// Command handlers produce a single entry titled
/// `"<plugin>:<command>:<remainder>"`. The command `reload` produces an entry
/// whose action requests a reload, `reload-now` requests a reload from the
/// producer itself, and `fail` produces an error.
#[derive(Debug, Default)]
pub(crate) struct TestPlugin {
    name: String,
    toolbar: bool,
    widget_fails: bool,
    commands: Vec<String>,
    commands_panic: bool,
    init: InitBehaviour,
    init_calls: Rc<Cell<u32>>,
    drops: Option<Rc<Cell<u32>>>,
    context: Option<ShellContext>,
}

impl TestPlugin {
    pub(crate) fn new(name: &str) -> Self {
        let mut plugin = Self::default();
        name.clone_into(&mut plugin.name);
        plugin
    }

    pub(crate) fn with_toolbar(mut self) -> Self {
        self.toolbar = true;
        self
    }

    pub(crate) fn with_commands(mut self, commands: &[&str]) -> Self {
        self.commands = commands.iter().map(|command| (*command).to_owned()).collect();
        self
    }

    pub(crate) fn panicking_commands(mut self) -> Self {
        self.commands = vec![String::from("never")];
        self.commands_panic = true;
        self
    }

    pub(crate) fn failing_init(mut self) -> Self {
        self.init = InitBehaviour::Fail;
        self
    }

    pub(crate) fn panicking_init(mut self) -> Self {
        self.init = InitBehaviour::Panic;
        self
    }

    pub(crate) fn failing_widget(mut self) -> Self {
        self.toolbar = true;
        self.widget_fails = true;
        self
    }

    pub(crate) fn counting_inits(mut self, counter: &Rc<Cell<u32>>) -> Self {
        self.init_calls = Rc::clone(counter);
        self
    }

    pub(crate) fn tracking_drops(mut self, counter: &Rc<Cell<u32>>) -> Self {
        self.drops = Some(Rc::clone(counter));
        self
    }

    pub(crate) fn boxed(self) -> Box<dyn Plugin> {
        Box::new(self)
    }
}

impl Plugin for TestPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "configurable test plugin"
    }

    fn initialise(&mut self, context: &ShellContext) -> Result<(), PluginError> {
        self.init_calls.set(self.init_calls.get() + 1);
        match self.init {
            InitBehaviour::Succeed => {
                self.context = Some(context.clone());
                Ok(())
            }
            InitBehaviour::Fail => Err(PluginError::initialisation(&self.name, "refused")),
            InitBehaviour::Panic => panic!("{} exploded", self.name),
        }
    }

    fn as_toolbar(&self) -> Option<&dyn ToolbarContributor> {
        self.toolbar.then_some(self as &dyn ToolbarContributor)
    }

    fn as_commands(&self) -> Option<&dyn CommandContributor> {
        (!self.commands.is_empty()).then_some(self as &dyn CommandContributor)
    }
}

impl ToolbarContributor for TestPlugin {
    fn toolbar_widget(&self) -> Result<Box<dyn Widget>, PluginError> {
        if self.widget_fails {
            return Err(PluginError::ToolbarWidget {
                name: self.name.clone(),
                message: String::from("no widget today"),
            });
        }
        Ok(Box::new(TextWidget::new(format!("{}-widget", self.name))))
    }
}

impl CommandContributor for TestPlugin {
    fn register_commands(&self) -> Vec<String> {
        assert!(!self.commands_panic, "{} cannot list its commands", self.name);
        self.commands.clone()
    }

    fn run_command(&self, command: &str) -> Option<CommandHandler> {
        if !self.commands.iter().any(|owned| owned == command) {
            return None;
        }
        let owner = self.name.clone();
        let token = command.to_owned();
        let handler = match command {
            "fail" => CommandHandler::single_entry(move |_| Err(PluginError::command(&token, "boom"))),
            "reload" => {
                let context = self.context.clone();
                CommandHandler::single_entry(move |remainder| {
                    let shared = context.clone();
                    let callback = Rc::new(move |_: Option<&serde_json::Value>| {
                        if let Some(bound) = &shared {
                            bound.request_reload();
                        }
                    });
                    let action = LauncherAction::new("reload", KeyCombination::enter(), callback);
                    Ok(entry(&owner, &token, remainder)?.with_action(action))
                })
            }
            "reload-now" => {
                let context = self.context.clone();
                CommandHandler::single_entry(move |remainder| {
                    if let Some(bound) = &context {
                        bound.request_reload();
                    }
                    entry(&owner, &token, remainder)
                })
            }
            _ => CommandHandler::single_entry(move |remainder| entry(&owner, &token, remainder)),
        };
        Some(handler)
    }
}

impl Drop for TestPlugin {
    fn drop(&mut self) {
        if let Some(drops) = &self.drops {
            drops.set(drops.get() + 1);
        }
    }
}

fn entry(owner: &str, command: &str, remainder: &str) -> Result<LauncherEntry, PluginError> {
    Ok(LauncherEntry::new(
        "system-run",
        format!("{owner}:{command}:{remainder}"),
        Some(String::from("test entry")),
        None,
    )?)
}

/// Plugin built from a named configuration, used by catalogue-backed tests.
pub(crate) fn plugin_named(name: &str) -> Box<dyn Plugin> {
    TestPlugin::new(name).boxed()
}

// ---------------------------------------------------------------------------
// Unit doubles
// ---------------------------------------------------------------------------

type UnitBuilder = Box<dyn Fn() -> Vec<Box<dyn Plugin>>>;

/// Loader whose units are closures, so tests can share counters with the
/// instances every load pass creates.
#[derive(Default)]
pub(crate) struct ScriptedLoader {
    units: HashMap<String, UnitBuilder>,
}

impl ScriptedLoader {
    pub(crate) fn with_unit<F>(mut self, id: &str, build: F) -> Self
    where
        F: Fn() -> Vec<Box<dyn Plugin>> + 'static,
    {
        self.units.insert(id.to_owned(), Box::new(build));
        self
    }
}

impl UnitLoader for ScriptedLoader {
    fn load(&self, source: &UnitSource) -> Result<Vec<Box<dyn Plugin>>, PluginError> {
        let id = source.manifest().unit();
        let build = self.units.get(id).ok_or_else(|| PluginError::UnknownUnit {
            unit: source.name().to_owned(),
            id: id.to_owned(),
        })?;
        Ok(build())
    }
}

/// Writes `<root>/<directory>/plugin.toml` naming `unit`.
pub(crate) fn write_unit(root: &Path, directory: &str, unit: &str) {
    let path = root.join(directory);
    fs::create_dir_all(&path).expect("create unit directory");
    fs::write(path.join(ENTRY_FILE), format!("unit = \"{unit}\"\n")).expect("write manifest");
}
