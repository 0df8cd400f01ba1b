//! Launcher commands for inspecting and reloading plugins.
//!
//! | Commands | Result |
//! |---|---|
//! | `plugin-list`, `plugins-list`, `pl` | one entry per loaded plugin |
//! | `plugin-reload`, `plugins-reload`, `pr` | a "Reload plugins" entry |
//! | `plugin-list-ui`, `plugins-list-ui`, `plui` | a widget listing plugins |
//!
//! Plugins are read from the [`PluginListing`] service, so the listing always
//! reflects the most recent load.

use std::rc::Rc;

use mosaic_plugins::{
    CommandContributor, CommandHandler, KeyCombination, LauncherAction, LauncherEntry, Modifier,
    Plugin, PluginError, PluginListing, PluginSummary, ShellContext, UnitDefinition, Widget,
};
use serde_json::{Value, json};

use crate::headless::Label;

/// Identifier used in `plugin.toml`.
pub const UNIT_ID: &str = "plugin_manager";

const LIST_COMMANDS: [&str; 3] = ["plugin-list", "plugins-list", "pl"];
const RELOAD_COMMANDS: [&str; 3] = ["plugin-reload", "plugins-reload", "pr"];
const LIST_UI_COMMANDS: [&str; 3] = ["plugin-list-ui", "plugins-list-ui", "plui"];

const PLUGIN_ICON: &str = "application-x-addon";
const RELOAD_ICON: &str = "view-refresh";
const LABEL: &str = "Plugin manager";

/// Lists plugins and reloads them on request.
#[derive(Debug, Default)]
pub struct PluginManager {
    context: Option<ShellContext>,
}

impl Plugin for PluginManager {
    fn name(&self) -> &str {
        UNIT_ID
    }

    fn description(&self) -> &str {
        "Manages plugins"
    }

    fn initialise(&mut self, context: &ShellContext) -> Result<(), PluginError> {
        self.context = Some(context.clone());
        Ok(())
    }

    fn as_commands(&self) -> Option<&dyn CommandContributor> {
        Some(self)
    }
}

impl CommandContributor for PluginManager {
    fn register_commands(&self) -> Vec<String> {
        LIST_COMMANDS
            .iter()
            .chain(&RELOAD_COMMANDS)
            .chain(&LIST_UI_COMMANDS)
            .map(|command| (*command).to_owned())
            .collect()
    }

    fn run_command(&self, command: &str) -> Option<CommandHandler> {
        let context = self.context.clone()?;
        let token = command.to_owned();
        if LIST_COMMANDS.contains(&command) {
            return Some(CommandHandler::list(move |prompt| {
                let listing = listing(&context, &token)?;
                list_entries(&context, &listing.summaries(), prompt)
            }));
        }
        if RELOAD_COMMANDS.contains(&command) {
            return Some(CommandHandler::single_entry(move |_prompt| reload_entry(&context)));
        }
        if LIST_UI_COMMANDS.contains(&command) {
            return Some(CommandHandler::widget(move |_prompt| {
                let listing = listing(&context, &token)?;
                Ok(list_widget(&listing.summaries()))
            }));
        }
        None
    }
}

fn listing(context: &ShellContext, command: &str) -> Result<Rc<PluginListing>, PluginError> {
    context
        .services()
        .get::<PluginListing>()
        .ok_or_else(|| PluginError::command(command, "plugin listing service is unavailable"))
}

fn list_entries(
    context: &ShellContext,
    summaries: &[PluginSummary],
    prompt: &str,
) -> Result<Vec<LauncherEntry>, PluginError> {
    let filter = prompt.trim().to_lowercase();
    summaries
        .iter()
        .filter(|summary| summary.name.to_lowercase().contains(&filter))
        .map(|summary| plugin_entry(context, summary))
        .collect()
}

fn plugin_entry(context: &ShellContext, summary: &PluginSummary) -> Result<LauncherEntry, PluginError> {
    let location = summary.unit.as_deref().unwrap_or("built-in");
    let mut entry = LauncherEntry::new(
        PLUGIN_ICON,
        summary.name.as_str(),
        Some(summary.description.clone()),
        None,
    )?
    .with_label(format!("{location} · {}", summary.state));
    if let Some(first) = summary.commands.first() {
        let shell = context.clone();
        let command = first.clone();
        let action = LauncherAction::new(
            format!("Open {first}"),
            KeyCombination::enter(),
            Rc::new(move |_data: Option<&Value>| shell.open_launcher_with(command.as_str())),
        )
        .with_data(json!({ "plugin": summary.name }));
        entry = entry.with_action(action);
    }
    let copy_name = summary.name.clone();
    let shell = context.clone();
    let show = LauncherAction::new(
        "Show in launcher",
        KeyCombination::key("l").with_modifier(Modifier::Ctrl),
        Rc::new(move |_data: Option<&Value>| shell.open_launcher_with(format!("pl {copy_name}"))),
    );
    Ok(entry.with_action(show))
}

fn reload_entry(context: &ShellContext) -> Result<LauncherEntry, PluginError> {
    let shell = context.clone();
    let action = LauncherAction::new(
        "Reload plugins",
        KeyCombination::enter(),
        Rc::new(move |_data: Option<&Value>| shell.request_reload()),
    );
    let entry = LauncherEntry::new(
        RELOAD_ICON,
        "Reload plugins",
        None,
        Some(String::from("Drop every plugin and run a fresh discovery pass")),
    )?;
    Ok(entry.with_label(LABEL).with_action(action))
}

fn list_widget(summaries: &[PluginSummary]) -> Box<dyn Widget> {
    let text = summaries
        .iter()
        .map(|summary| format!("{} ({})", summary.name, summary.capabilities.join(", ")))
        .collect::<Vec<_>>()
        .join("\n");
    Box::new(Label::new("plugin-list", text))
}

fn plugin_manager() -> Box<dyn Plugin> {
    Box::new(PluginManager::default())
}

inventory::submit! {
    UnitDefinition::new(UNIT_ID, &[plugin_manager])
}
