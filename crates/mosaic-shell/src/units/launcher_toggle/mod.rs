//! Toolbar button that shows and hides the launcher.

use mosaic_plugins::{Plugin, PluginError, ShellContext, ToolbarContributor, UnitDefinition, Widget};

use crate::headless::Button;

/// Identifier used in `plugin.toml`.
pub const UNIT_ID: &str = "launcher_toggle";

/// Name of the button widget.
pub const BUTTON_NAME: &str = "launcher-toggle-button";

/// Puts a launcher button on every status bar.
#[derive(Debug, Default)]
pub struct LauncherToggle {
    context: Option<ShellContext>,
}

impl Plugin for LauncherToggle {
    fn name(&self) -> &str {
        UNIT_ID
    }

    fn description(&self) -> &str {
        "Adds a toolbar button that toggles the launcher"
    }

    fn initialise(&mut self, context: &ShellContext) -> Result<(), PluginError> {
        self.context = Some(context.clone());
        Ok(())
    }

    fn as_toolbar(&self) -> Option<&dyn ToolbarContributor> {
        Some(self)
    }
}

impl ToolbarContributor for LauncherToggle {
    fn toolbar_widget(&self) -> Result<Box<dyn Widget>, PluginError> {
        let context = self.context.clone().ok_or_else(|| PluginError::ToolbarWidget {
            name: UNIT_ID.to_owned(),
            message: String::from("not initialised"),
        })?;
        Ok(Box::new(Button::new(BUTTON_NAME, "Apps", move || {
            context.toggle_launcher();
        })))
    }
}

fn launcher_toggle() -> Box<dyn Plugin> {
    Box::new(LauncherToggle::default())
}

inventory::submit! {
    UnitDefinition::new(UNIT_ID, &[launcher_toggle])
}

#[cfg(test)]
mod tests;
