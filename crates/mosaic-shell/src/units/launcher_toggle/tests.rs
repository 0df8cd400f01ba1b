//! Unit tests for the launcher toggle unit.

use super::*;
use crate::tests::support::{HeadlessFixture, headless};
use mosaic_plugins::Launcher;
use rstest::rstest;

#[rstest]
fn button_is_refused_before_initialisation() {
    let plugin = LauncherToggle::default();
    let error = plugin.toolbar_widget().expect_err("uninitialised plugin has no context");
    assert!(matches!(error, PluginError::ToolbarWidget { .. }));
}

#[rstest]
fn clicking_the_button_queues_a_toggle(headless: HeadlessFixture) {
    let mut plugin = LauncherToggle::default();
    plugin.initialise(&headless.context).expect("initialise");
    let widget = plugin.toolbar_widget().expect("widget");
    let button = widget
        .as_any()
        .downcast_ref::<Button>()
        .expect("toolbar widget is a button");

    button.click();

    assert_eq!(headless.context.pending_requests(), 1);
    assert!(!headless.launcher.is_visible());
}
