//! Tests for argument handling and subcommand output.

use std::ffi::OsString;
use std::process::ExitCode;

use camino::Utf8PathBuf;
use mosaic_config::Config;
use rstest::{fixture, rstest};
use tempfile::TempDir;

use crate::config::ConfigLoader;
use crate::tests::support::write_unit;
use crate::{AppError, run_with_loader};

/// Loader returning a fixed configuration.
struct FixedLoader {
    config: Config,
}

impl ConfigLoader for FixedLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.config.clone())
    }
}

struct Workspace {
    _plugins: TempDir,
    _applications: TempDir,
    loader: FixedLoader,
}

#[fixture]
fn workspace() -> Workspace {
    let plugins = TempDir::new().expect("create plugin root");
    write_unit(plugins.path(), "clock", "clock");
    write_unit(plugins.path(), "plugin_manager", "plugin_manager");
    write_unit(plugins.path(), "broken", "no_such_unit");
    let applications = TempDir::new().expect("create application dir");
    std::fs::write(
        applications.path().join("zyx-editor.desktop"),
        "[Desktop Entry]\nName=Zyx Editor\nGenericName=Text Editor\nExec=zyx %f\n",
    )
    .expect("write desktop entry");
    let utf8 = |dir: &TempDir| Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 path");
    let config = Config {
        plugin_root: utf8(&plugins),
        application_dirs: vec![utf8(&applications)],
        log_filter: String::from("off"),
        ..Config::default()
    };
    Workspace {
        _plugins: plugins,
        _applications: applications,
        loader: FixedLoader { config },
    }
}

fn invoke(workspace: &Workspace, args: &[&str]) -> (ExitCode, String, String) {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let arguments = std::iter::once("mosaic")
        .chain(args.iter().copied())
        .map(OsString::from);
    let code = run_with_loader(arguments, &mut stdout, &mut stderr, &workspace.loader);
    (
        code,
        String::from_utf8(stdout).expect("stdout is utf-8"),
        String::from_utf8(stderr).expect("stderr is utf-8"),
    )
}

// ---------------------------------------------------------------------------
// Subcommands
// ---------------------------------------------------------------------------

#[rstest]
fn plugins_lists_loaded_plugins_and_failed_units(workspace: Workspace) {
    let (code, stdout, _) = invoke(&workspace, &["plugins"]);
    assert_eq!(code, ExitCode::SUCCESS);
    assert!(stdout.contains("clock\tinitialised\ttoolbar,commands\tdate,time"));
    assert!(stdout.contains("plugin_manager\tinitialised\tcommands\t"));
    assert!(stdout.contains("failed\tbroken\t"));
}

#[rstest]
fn plugins_json_carries_summaries(workspace: Workspace) {
    let (code, stdout, _) = invoke(&workspace, &["--json", "plugins"]);
    assert_eq!(code, ExitCode::SUCCESS);
    let document: serde_json::Value = serde_json::from_str(&stdout).expect("valid json");
    let names: Vec<_> = document["plugins"]
        .as_array()
        .expect("plugins array")
        .iter()
        .filter_map(|plugin| plugin["name"].as_str())
        .collect();
    assert_eq!(names, vec!["clock", "plugin_manager"]);
}

#[rstest]
fn toolbar_prints_each_bar(workspace: Workspace) {
    let (code, stdout, _) = invoke(&workspace, &["toolbar"]);
    assert_eq!(code, ExitCode::SUCCESS);
    assert!(stdout.starts_with("monitor 0: "));
}

#[rstest]
fn query_renders_command_entries(workspace: Workspace) {
    let (code, stdout, _) = invoke(&workspace, &["query", "pr"]);
    assert_eq!(code, ExitCode::SUCCESS);
    assert!(stdout.starts_with("pr: single_entry\n"));
    assert!(stdout.contains("0. Reload plugins [Plugin manager]"));
    assert!(stdout.contains("0) Reload plugins <enter>"));
}

#[rstest]
fn query_falls_back_to_application_search(workspace: Workspace) {
    let (code, stdout, _) = invoke(&workspace, &["query", "text edit"]);
    assert_eq!(code, ExitCode::SUCCESS);
    assert!(stdout.contains("applications matching 'text edit': 1"));
    assert!(stdout.contains("Zyx Editor\tzyx-editor\tzyx %f"));
}

#[rstest]
fn run_applies_deferred_reload(workspace: Workspace) {
    let (code, stdout, stderr) = invoke(&workspace, &["run", "pr"]);
    assert_eq!(code, ExitCode::SUCCESS, "stderr: {stderr}");
    assert!(stdout.contains("ran 'Reload plugins' on 'Reload plugins' (pr)"));
    assert!(stdout.contains("applied ReloadPlugins"));
}

#[rstest]
fn run_without_a_command_fails(workspace: Workspace) {
    let (code, _, stderr) = invoke(&workspace, &["run", "zyx"]);
    assert_eq!(code, ExitCode::FAILURE);
    assert!(stderr.contains("no command matches 'zyx'"));
}

// ---------------------------------------------------------------------------
// Usage
// ---------------------------------------------------------------------------

#[rstest]
fn help_is_written_to_stdout(workspace: Workspace) {
    let (code, stdout, _) = invoke(&workspace, &["--help"]);
    assert_eq!(code, ExitCode::SUCCESS);
    assert!(stdout.contains("Usage: mosaic"));
}

#[rstest]
fn missing_subcommand_is_a_usage_error(workspace: Workspace) {
    let (code, stdout, stderr) = invoke(&workspace, &[]);
    assert_eq!(code, ExitCode::FAILURE);
    assert!(stdout.is_empty());
    assert!(!stderr.is_empty());
}
