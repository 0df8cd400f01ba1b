//! Behaviour tests for configuration layering.

use std::cell::RefCell;
use std::ffi::OsString;
use std::fs;
use std::sync::{Mutex, MutexGuard};

use once_cell::sync::Lazy;
use ortho_config::OrthoConfig;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

use mosaic_config::{Config, LogFormat, default_log_filter, default_log_format, default_plugin_root};

static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

const PLUGIN_ROOT_VAR: &str = "MOSAIC_PLUGIN_ROOT";

struct Harness {
    temp_dir: TempDir,
    config_lines: RefCell<Vec<String>>,
    cli_args: RefCell<Vec<OsString>>,
    env_overrides: RefCell<Vec<(String, Option<OsString>)>>,
    loaded: RefCell<Option<Config>>,
    error: RefCell<Option<String>>,
    _guard: MutexGuard<'static, ()>,
}

impl Harness {
    fn new() -> Self {
        let guard = ENV_MUTEX
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let temp_dir = TempDir::new().expect("create temporary directory");
        Self {
            temp_dir,
            config_lines: RefCell::new(Vec::new()),
            cli_args: RefCell::new(vec![OsString::from("mosaic")]),
            env_overrides: RefCell::new(Vec::new()),
            loaded: RefCell::new(None),
            error: RefCell::new(None),
            _guard: guard,
        }
    }

    fn write_config_line(&self, line: String) {
        let path = self.temp_dir.path().join("mosaic.toml");
        let mut lines = self.config_lines.borrow_mut();
        let first = lines.is_empty();
        lines.push(line);
        fs::write(&path, lines.join("\n")).expect("write configuration");

        if first {
            let mut args = self.cli_args.borrow_mut();
            args.push(OsString::from("--config-path"));
            args.push(path.into_os_string());
        }
    }

    fn set_env(&self, key: &str, value: &str) {
        let previous = std::env::var_os(key);
        // Environment mutation is `unsafe` in edition 2024; the harness holds
        // the environment mutex and restores overrides in `Drop`.
        unsafe { std::env::set_var(key, value) };
        self.env_overrides
            .borrow_mut()
            .push((key.to_owned(), previous));
    }

    fn push_cli_arg(&self, arg: impl Into<OsString>) {
        self.cli_args.borrow_mut().push(arg.into());
    }

    fn load(&self) {
        if self.loaded.borrow().is_some() || self.error.borrow().is_some() {
            return;
        }
        let args = self.cli_args.borrow().clone();
        match Config::load_from_iter(args) {
            Ok(config) => *self.loaded.borrow_mut() = Some(config),
            Err(error) => *self.error.borrow_mut() = Some(error.to_string()),
        }
    }

    fn config(&self) -> Config {
        self.load();
        if let Some(error) = self.error.borrow().as_ref() {
            panic!("configuration failed to load: {error}");
        }
        self.loaded
            .borrow()
            .clone()
            .expect("configuration was not loaded")
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        let mut overrides = self.env_overrides.borrow_mut();
        while let Some((key, value)) = overrides.pop() {
            match value {
                Some(previous) => unsafe { std::env::set_var(&key, previous) },
                None => unsafe { std::env::remove_var(&key) },
            }
        }
    }
}

#[fixture]
fn harness() -> Harness {
    Harness::new()
}

#[given("a configuration file setting the plugin root to \"{root}\"")]
fn given_file_plugin_root(harness: &Harness, root: String) {
    harness.write_config_line(format!("plugin_root = \"{root}\""));
}

#[given("a configuration file setting the log format to \"{format}\"")]
fn given_file_log_format(harness: &Harness, format: String) {
    harness.write_config_line(format!("log_format = \"{format}\""));
}

#[given("the environment overrides the plugin root to \"{root}\"")]
fn given_env_plugin_root(harness: &Harness, root: String) {
    harness.set_env(PLUGIN_ROOT_VAR, &root);
}

#[when("the CLI sets the plugin root to \"{root}\"")]
fn when_cli_plugin_root(harness: &Harness, root: String) {
    harness.push_cli_arg("--plugin-root");
    harness.push_cli_arg(root);
}

#[when("the configuration loads without overrides")]
fn when_load_without_overrides(harness: &Harness) {
    harness.load();
}

#[then("loading the configuration resolves the plugin root to \"{root}\"")]
fn then_plugin_root(harness: &Harness, root: String) {
    assert_eq!(harness.config().plugin_root().as_str(), root);
}

#[then("loading the configuration resolves the log format to \"{format}\"")]
fn then_log_format(harness: &Harness, format: String) {
    let expected: LogFormat = format.parse().expect("valid log format");
    assert_eq!(harness.config().log_format(), expected);
}

#[then("loading the configuration applies the built-in defaults")]
fn then_defaults_applied(harness: &Harness) {
    let config = harness.config();
    assert_eq!(config.plugin_root(), default_plugin_root().as_path());
    assert_eq!(config.log_filter(), default_log_filter());
    assert_eq!(config.log_format(), default_log_format());
    assert!(config.toolbar_order().is_empty());
    assert_eq!(config.primary_monitor(), 0);
}

#[scenario(path = "tests/features/configuration_precedence.feature")]
fn configuration_precedence(#[from(harness)] harness: Harness) {
    let _ = harness;
}
