//! Command handlers returned by command contributors.
//!
//! A [`CommandHandler`] pairs a [`CommandResultKind`] with the producer that
//! builds the launcher output. The producer's shape is fixed by the
//! constructor that created the handler, so a handler can never promise a
//! list and deliver a widget.

use std::fmt;

use crate::capability::Widget;
use crate::entry::LauncherEntry;
use crate::error::PluginError;

type EntryProducer = Box<dyn Fn(&str) -> Result<LauncherEntry, PluginError>>;
type ListProducer = Box<dyn Fn(&str) -> Result<Vec<LauncherEntry>, PluginError>>;
type WidgetProducer = Box<dyn Fn(&str) -> Result<Box<dyn Widget>, PluginError>>;

/// How the launcher renders a command result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandResultKind {
    /// One entry, executed directly.
    SingleEntry,
    /// One entry, executed after the user confirms.
    SingleEntryWithConfirmation,
    /// A list of entries, executed directly.
    List,
    /// A list of entries, executed after the user confirms.
    ListWithConfirmation,
    /// A widget shown inside the launcher.
    Widget,
    /// A widget shown inside the launcher after the user confirms.
    WidgetWithConfirmation,
}

impl CommandResultKind {
    /// Returns `true` when the launcher must ask before executing actions.
    #[must_use]
    pub const fn requires_confirmation(self) -> bool {
        matches!(
            self,
            Self::SingleEntryWithConfirmation | Self::ListWithConfirmation | Self::WidgetWithConfirmation
        )
    }

    /// Returns the confirmation-gated variant of this kind.
    #[must_use]
    pub const fn with_confirmation(self) -> Self {
        match self {
            Self::SingleEntry | Self::SingleEntryWithConfirmation => {
                Self::SingleEntryWithConfirmation
            }
            Self::List | Self::ListWithConfirmation => Self::ListWithConfirmation,
            Self::Widget | Self::WidgetWithConfirmation => Self::WidgetWithConfirmation,
        }
    }

    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SingleEntry => "single_entry",
            Self::SingleEntryWithConfirmation => "single_entry_with_confirmation",
            Self::List => "list",
            Self::ListWithConfirmation => "list_with_confirmation",
            Self::Widget => "widget",
            Self::WidgetWithConfirmation => "widget_with_confirmation",
        }
    }
}

impl fmt::Display for CommandResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds launcher output from the text that follows the command token.
pub enum ResultProducer {
    /// Produces a single entry.
    Entry(EntryProducer),
    /// Produces a sequence of entries.
    List(ListProducer),
    /// Produces a renderable widget.
    Widget(WidgetProducer),
}

impl fmt::Debug for ResultProducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = match self {
            Self::Entry(_) => "Entry",
            Self::List(_) => "List",
            Self::Widget(_) => "Widget",
        };
        f.debug_tuple("ResultProducer").field(&shape).finish()
    }
}

/// Output produced by a dispatched command.
#[derive(Debug)]
pub enum CommandOutput {
    /// A single entry.
    Entry(LauncherEntry),
    /// A sequence of entries.
    List(Vec<LauncherEntry>),
    /// A widget for the launcher viewport.
    Widget(Box<dyn Widget>),
}

impl CommandOutput {
    /// Entries carried by the output; widgets carry none.
    #[must_use]
    pub fn entries(&self) -> &[LauncherEntry] {
        match self {
            Self::Entry(entry) => std::slice::from_ref(entry),
            Self::List(entries) => entries,
            Self::Widget(_) => &[],
        }
    }
}

/// A command result kind together with its producer.
///
/// # Example
///
/// ```
/// use mosaic_plugins::{CommandHandler, CommandResultKind, LauncherEntry};
///
/// let handler = CommandHandler::single_entry(|prompt| {
///     Ok(LauncherEntry::new("echo", prompt, Some("Echo".into()), None)?)
/// })
/// .with_confirmation();
///
/// assert_eq!(handler.kind(), CommandResultKind::SingleEntryWithConfirmation);
/// let output = handler.produce("echo", "hi").expect("producer succeeds");
/// assert_eq!(output.entries()[0].title(), "hi");
/// ```
#[derive(Debug)]
pub struct CommandHandler {
    kind: CommandResultKind,
    producer: ResultProducer,
}

impl CommandHandler {
    /// Handler producing a single entry.
    pub fn single_entry<F>(producer: F) -> Self
    where
        F: Fn(&str) -> Result<LauncherEntry, PluginError> + 'static,
    {
        Self {
            kind: CommandResultKind::SingleEntry,
            producer: ResultProducer::Entry(Box::new(producer)),
        }
    }

    /// Handler producing a list of entries.
    pub fn list<F>(producer: F) -> Self
    where
        F: Fn(&str) -> Result<Vec<LauncherEntry>, PluginError> + 'static,
    {
        Self {
            kind: CommandResultKind::List,
            producer: ResultProducer::List(Box::new(producer)),
        }
    }

    /// Handler producing a widget.
    pub fn widget<F>(producer: F) -> Self
    where
        F: Fn(&str) -> Result<Box<dyn Widget>, PluginError> + 'static,
    {
        Self {
            kind: CommandResultKind::Widget,
            producer: ResultProducer::Widget(Box::new(producer)),
        }
    }

    /// Gates the handler's result behind a confirmation step.
    #[must_use]
    pub fn with_confirmation(mut self) -> Self {
        self.kind = self.kind.with_confirmation();
        self
    }

    /// Render kind of the handler.
    #[must_use]
    pub const fn kind(&self) -> CommandResultKind {
        self.kind
    }

    /// The handler's producer.
    #[must_use]
    pub const fn producer(&self) -> &ResultProducer {
        &self.producer
    }

    /// Invokes the producer with the remainder of the launcher input.
    ///
    /// # Errors
    ///
    /// Propagates the producer's failure, attributing plugin-specific errors
    /// to `command`.
    pub fn produce(&self, command: &str, remainder: &str) -> Result<CommandOutput, PluginError> {
        let output = match &self.producer {
            ResultProducer::Entry(produce) => produce(remainder).map(CommandOutput::Entry),
            ResultProducer::List(produce) => produce(remainder).map(CommandOutput::List),
            ResultProducer::Widget(produce) => produce(remainder).map(CommandOutput::Widget),
        };
        output.map_err(|error| match error {
            PluginError::Command { .. } => error,
            other => PluginError::command(command, other.to_string()),
        })
    }
}
