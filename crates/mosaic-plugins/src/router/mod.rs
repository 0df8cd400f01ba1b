//! Routing of launcher input to command handlers.
//!
//! Input is split on its first whitespace character into a command token and
//! a remainder. A token that resolves through the registry dispatches to the
//! owning plugin's handler with the remainder; anything else falls back to
//! application search over the full input.

use tracing::{debug, trace};

use crate::command::{CommandOutput, CommandResultKind};
use crate::error::PluginError;
use crate::registry::PluginRegistry;
use crate::unit::isolate;

/// Tracing target for command routing.
const ROUTER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::router");

/// Splits launcher input into a command token and the remaining text.
///
/// The remainder is everything after the first whitespace character, kept
/// verbatim. Input without whitespace is all token.
///
/// # Example
///
/// ```
/// use mosaic_plugins::split_input;
///
/// assert_eq!(split_input("pl extra text"), ("pl", "extra text"));
/// assert_eq!(split_input("pl"), ("pl", ""));
/// assert_eq!(split_input(" firefox"), ("", "firefox"));
/// ```
#[must_use]
pub fn split_input(text: &str) -> (&str, &str) {
    text.split_once(char::is_whitespace).unwrap_or((text, ""))
}

/// What the launcher should render for a piece of input.
#[derive(Debug)]
pub enum LauncherResponse {
    /// A command token resolved and its handler produced output.
    Dispatched {
        /// The resolved command token.
        command: String,
        /// How the launcher renders the output.
        kind: CommandResultKind,
        /// Output built by the handler.
        output: CommandOutput,
    },
    /// No command matched; run default application search.
    ApplicationSearch {
        /// Text to search applications for.
        query: String,
    },
}

impl LauncherResponse {
    /// Returns `true` when a command handler ran.
    #[must_use]
    pub const fn is_dispatched(&self) -> bool {
        matches!(self, Self::Dispatched { .. })
    }

    /// Returns `true` when actions must be confirmed before they run.
    #[must_use]
    pub const fn requires_confirmation(&self) -> bool {
        match self {
            Self::Dispatched { kind, .. } => kind.requires_confirmation(),
            Self::ApplicationSearch { .. } => false,
        }
    }
}

/// Resolves launcher input against a registry.
#[derive(Debug, Clone, Copy)]
pub struct CommandRouter<'r> {
    registry: &'r PluginRegistry,
}

impl<'r> CommandRouter<'r> {
    /// Creates a router over `registry`.
    #[must_use]
    pub const fn new(registry: &'r PluginRegistry) -> Self {
        Self { registry }
    }

    /// Routes one launcher input.
    ///
    /// # Errors
    ///
    /// Returns the handler's [`PluginError`] when a resolved command fails to
    /// produce output, including when plugin code panics.
    pub fn route(&self, text: &str) -> Result<LauncherResponse, PluginError> {
        let (token, remainder) = split_input(text);
        if token.is_empty() {
            return Ok(Self::search(text));
        }
        let Some(owner) = self.registry.command_owner(token) else {
            trace!(target: ROUTER_TARGET, token, "no command owns token");
            return Ok(Self::search(text));
        };

        let resolved = isolate(owner, "run_command", || self.registry.resolve_command(token))?;
        let Some(handler) = resolved else {
            debug!(target: ROUTER_TARGET, token, plugin = owner, "plugin declined its command");
            return Ok(Self::search(text));
        };

        let kind = handler.kind();
        debug!(target: ROUTER_TARGET, token, plugin = owner, %kind, "dispatching command");
        let output = isolate(owner, "produce", || handler.produce(token, remainder))
            .and_then(|result| result)?;
        Ok(LauncherResponse::Dispatched {
            command: token.to_owned(),
            kind,
            output,
        })
    }

    fn search(text: &str) -> LauncherResponse {
        LauncherResponse::ApplicationSearch {
            query: text.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests;
