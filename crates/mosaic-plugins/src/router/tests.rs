//! Unit tests for launcher input routing.

use rstest::{fixture, rstest};

use super::*;
use crate::tests::support::TestPlugin;

#[fixture]
fn registry() -> PluginRegistry {
    let mut registry = PluginRegistry::new();
    registry.classify(TestPlugin::new("p").with_commands(&["pl", "fail"]).boxed());
    registry
}

fn dispatched_title(response: &LauncherResponse) -> &str {
    match response {
        LauncherResponse::Dispatched { output, .. } => output
            .entries()
            .first()
            .map(|entry| entry.title())
            .expect("entry produced"),
        LauncherResponse::ApplicationSearch { query } => panic!("fell back to search for {query}"),
    }
}

#[rstest]
#[case("pl", ("pl", ""))]
#[case("pl extra text", ("pl", "extra text"))]
#[case("pl\textra", ("pl", "extra"))]
#[case("pl  two", ("pl", " two"))]
#[case("pl ", ("pl", ""))]
#[case("", ("", ""))]
#[case(" leading", ("", "leading"))]
fn split_on_first_whitespace(#[case] input: &str, #[case] expected: (&str, &str)) {
    assert_eq!(split_input(input), expected);
}

#[rstest]
#[case::token_only("pl", "p:pl:")]
#[case::token_with_remainder("pl extra text", "p:pl:extra text")]
#[case::trailing_space("pl ", "p:pl:")]
fn known_token_dispatches_with_remainder(
    registry: PluginRegistry,
    #[case] input: &str,
    #[case] title: &str,
) {
    let response = CommandRouter::new(&registry).route(input).expect("route");
    assert!(response.is_dispatched());
    assert_eq!(dispatched_title(&response), title);
    assert!(matches!(
        response,
        LauncherResponse::Dispatched { ref command, kind: CommandResultKind::SingleEntry, .. }
            if command == "pl"
    ));
}

#[rstest]
#[case::unknown_token("unknown-token foo")]
#[case::prefix_of_token("p")]
#[case::token_not_first("foo pl")]
#[case::empty("")]
#[case::leading_whitespace(" pl")]
fn unresolved_input_falls_back_to_search(registry: PluginRegistry, #[case] input: &str) {
    let response = CommandRouter::new(&registry).route(input).expect("route");
    match response {
        LauncherResponse::ApplicationSearch { query } => assert_eq!(query, input),
        LauncherResponse::Dispatched { command, .. } => panic!("unexpected dispatch to {command}"),
    }
}

#[rstest]
fn producer_failure_is_returned(registry: PluginRegistry) {
    let error = CommandRouter::new(&registry)
        .route("fail now")
        .err()
        .expect("route fails");
    assert!(matches!(error, PluginError::Command { ref command, .. } if command == "fail"));
}

#[test]
fn last_registered_owner_handles_contested_token() {
    let mut registry = PluginRegistry::new();
    registry.classify(TestPlugin::new("first").with_commands(&["x"]).boxed());
    registry.classify(TestPlugin::new("second").with_commands(&["x"]).boxed());

    let response = CommandRouter::new(&registry).route("x").expect("route");
    assert_eq!(dispatched_title(&response), "second:x:");
}

#[test]
fn search_never_requires_confirmation() {
    let registry = PluginRegistry::new();
    let response = CommandRouter::new(&registry).route("firefox").expect("route");
    assert!(!response.requires_confirmation());
}
