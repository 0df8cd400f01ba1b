//! Configuration loading for the shell binary.
//!
//! Configuration flags are separated from the subcommand so `ortho_config`
//! only sees flags it understands while clap parses the rest.

use std::ffi::{OsStr, OsString};

use mosaic_config::{CONFIG_CLI_FLAGS, Config};
use ortho_config::OrthoConfig;

use crate::AppError;

pub(crate) trait ConfigLoader {
    /// Loads configuration from the filtered arguments.
    ///
    /// # Flag Ordering
    ///
    /// Configuration flags must appear before the subcommand. Flags after it
    /// are handed to clap and rejected there.
    fn load(&self, args: &[OsString]) -> Result<Config, AppError>;
}

pub(crate) struct OrthoConfigLoader;

impl ConfigLoader for OrthoConfigLoader {
    fn load(&self, args: &[OsString]) -> Result<Config, AppError> {
        Config::load_from_iter(args.iter().cloned()).map_err(AppError::LoadConfiguration)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlagAction {
    Include { needs_value: bool },
    Skip,
}

fn process_config_flag(argument: &OsStr) -> FlagAction {
    let argument_text = argument.to_string_lossy();
    if !argument_text.starts_with("--") {
        return FlagAction::Skip;
    }
    let (flag, has_inline_value) = argument_text
        .split_once('=')
        .map_or((&*argument_text, false), |(flag, _)| (flag, true));
    if CONFIG_CLI_FLAGS.contains(&flag) {
        return FlagAction::Include {
            needs_value: !has_inline_value,
        };
    }
    FlagAction::Skip
}

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ConfigArgumentSplit {
    /// Program name followed by the configuration flags.
    pub(crate) config_arguments: Vec<OsString>,
    /// Program name followed by everything after the configuration flags.
    pub(crate) cli_arguments: Vec<OsString>,
}

pub(crate) fn split_config_arguments(args: &[OsString]) -> ConfigArgumentSplit {
    let mut remaining = args.iter();
    let Some(program) = remaining.next() else {
        return ConfigArgumentSplit::default();
    };
    let mut config_arguments = vec![program.clone()];
    let mut cli_arguments = vec![program.clone()];
    let mut pending_value = false;
    for argument in remaining.by_ref() {
        if pending_value {
            config_arguments.push(argument.clone());
            pending_value = false;
            continue;
        }
        match process_config_flag(argument) {
            FlagAction::Include { needs_value } => {
                config_arguments.push(argument.clone());
                pending_value = needs_value;
            }
            FlagAction::Skip => {
                cli_arguments.push(argument.clone());
                break;
            }
        }
    }
    cli_arguments.extend(remaining.cloned());
    ConfigArgumentSplit {
        config_arguments,
        cli_arguments,
    }
}
