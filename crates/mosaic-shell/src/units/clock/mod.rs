//! Toolbar clock with `time` and `date` launcher commands.

use mosaic_plugins::{
    CommandContributor, CommandHandler, LauncherEntry, Plugin, PluginError, ShellContext,
    ToolbarContributor, UnitDefinition, Widget,
};
use time::OffsetDateTime;
use time::macros::format_description;

use crate::headless::Label;

/// Identifier used in `plugin.toml`.
pub const UNIT_ID: &str = "clock";

/// Source of the current time.
pub type Now = fn() -> OffsetDateTime;

/// Local time, or UTC when the local offset cannot be determined.
#[must_use]
pub fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// Shows the time on the toolbar and answers `time` and `date`.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    now: Now,
}

impl Clock {
    /// Creates a clock reading time from `now`.
    #[must_use]
    pub const fn new(now: Now) -> Self {
        Self { now }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(local_now)
    }
}

impl Plugin for Clock {
    fn name(&self) -> &str {
        UNIT_ID
    }

    fn description(&self) -> &str {
        "Shows the current time and answers time and date queries"
    }

    fn initialise(&mut self, _context: &ShellContext) -> Result<(), PluginError> {
        Ok(())
    }

    fn as_toolbar(&self) -> Option<&dyn ToolbarContributor> {
        Some(self)
    }

    fn as_commands(&self) -> Option<&dyn CommandContributor> {
        Some(self)
    }
}

impl ToolbarContributor for Clock {
    fn toolbar_widget(&self) -> Result<Box<dyn Widget>, PluginError> {
        let text = (self.now)()
            .format(format_description!("[hour]:[minute]"))
            .map_err(|error| PluginError::ToolbarWidget {
                name: UNIT_ID.to_owned(),
                message: error.to_string(),
            })?;
        Ok(Box::new(Label::new(UNIT_ID, text)))
    }
}

impl CommandContributor for Clock {
    fn register_commands(&self) -> Vec<String> {
        vec![String::from("time"), String::from("date")]
    }

    fn run_command(&self, command: &str) -> Option<CommandHandler> {
        let (format, description) = match command {
            "time" => (format_description!("[hour]:[minute]:[second]"), "Current time"),
            "date" => (
                format_description!("[weekday] [day padding:none] [month repr:long] [year]"),
                "Today's date",
            ),
            _ => return None,
        };
        let now = self.now;
        let token = command.to_owned();
        Some(CommandHandler::single_entry(move |_prompt| {
            let title = now()
                .format(format)
                .map_err(|error| PluginError::command(token.as_str(), error.to_string()))?;
            let entry = LauncherEntry::new("clock", title, Some(description.to_owned()), None)?;
            Ok(entry.with_label("Clock"))
        }))
    }
}

fn clock() -> Box<dyn Plugin> {
    Box::new(Clock::default())
}

inventory::submit! {
    UnitDefinition::new(UNIT_ID, &[clock])
}

#[cfg(test)]
mod tests;
