//! Unit tests for capability classification.

use rstest::rstest;

use super::*;
use crate::tests::support::{TestPlugin, TextWidget};

#[rstest]
#[case::bare(TestPlugin::new("p"), &[])]
#[case::toolbar(TestPlugin::new("p").with_toolbar(), &[Capability::Toolbar])]
#[case::commands(TestPlugin::new("p").with_commands(&["x"]), &[Capability::Commands])]
#[case::both(
    TestPlugin::new("p").with_toolbar().with_commands(&["x"]),
    &[Capability::Toolbar, Capability::Commands]
)]
fn capabilities_follow_the_accessors(#[case] plugin: TestPlugin, #[case] expected: &[Capability]) {
    assert_eq!(plugin.capabilities(), expected);
}

#[rstest]
#[case(Capability::Toolbar, "toolbar")]
#[case(Capability::Commands, "commands")]
fn capability_display(#[case] capability: Capability, #[case] expected: &str) {
    assert_eq!(capability.to_string(), expected);
}

#[test]
fn widgets_downcast_to_their_concrete_type() {
    let widget: Box<dyn Widget> = Box::new(TextWidget::new("clock"));
    let concrete = widget.as_any().downcast_ref::<TextWidget>();
    assert_eq!(concrete, Some(&TextWidget::new("clock")));
    assert_eq!(widget.widget_name(), "clock");
}
