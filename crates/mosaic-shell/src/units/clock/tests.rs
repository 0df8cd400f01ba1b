//! Unit tests for the clock unit.

use super::*;
use mosaic_plugins::{CommandOutput, CommandResultKind};
use rstest::rstest;
use time::macros::datetime;

fn fixed() -> OffsetDateTime {
    datetime!(2026-10-19 14:03:09 UTC)
}

#[test]
fn toolbar_widget_shows_hours_and_minutes() {
    let widget = Clock::new(fixed).toolbar_widget().expect("widget");
    assert_eq!(Label::render(widget.as_ref()), "14:03");
    assert_eq!(widget.widget_name(), UNIT_ID);
}

#[rstest]
#[case("time", "14:03:09", "Current time")]
#[case("date", "Monday 19 October 2026", "Today's date")]
fn commands_produce_single_entries(
    #[case] command: &str,
    #[case] title: &str,
    #[case] description: &str,
) {
    let handler = Clock::new(fixed).run_command(command).expect("command resolves");
    assert_eq!(handler.kind(), CommandResultKind::SingleEntry);
    let output = handler.produce(command, "").expect("producer succeeds");
    let CommandOutput::Entry(entry) = output else {
        panic!("expected a single entry");
    };
    assert_eq!(entry.title(), title);
    assert_eq!(entry.description().text(), description);
    assert_eq!(entry.label(), Some("Clock"));
}

#[test]
fn unknown_commands_are_declined() {
    assert!(Clock::new(fixed).run_command("week").is_none());
}

#[test]
fn clock_advertises_both_capabilities() {
    let clock = Clock::new(fixed);
    assert!(clock.as_toolbar().is_some());
    assert_eq!(clock.register_commands(), vec!["time", "date"]);
}
