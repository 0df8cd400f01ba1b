//! Launcher display records returned by command handlers.
//!
//! A [`LauncherEntry`] is what the launcher renders for a single result row:
//! an icon, a title, exactly one description (plain text or markup), an
//! optional right-aligned label, and the [`LauncherAction`]s bound to it.

use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde_json::Value;
use strum::{Display, EnumString};

use crate::error::EntryError;

/// Callback executed when a launcher action fires. It receives the data bound
/// to the action, if any.
pub type ActionCallback = Rc<dyn Fn(Option<&Value>)>;

/// Description shown beneath an entry title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Description {
    /// Plain text, rendered verbatim.
    Plain(String),
    /// Pango-style markup.
    Markup(String),
}

impl Description {
    /// Returns the description text regardless of its flavour.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(text) | Self::Markup(text) => text,
        }
    }

    /// Returns `true` for markup descriptions.
    #[must_use]
    pub const fn is_markup(&self) -> bool {
        matches!(self, Self::Markup(_))
    }
}

/// A single launcher result row.
///
/// # Example
///
/// ```
/// use mosaic_plugins::{EntryError, LauncherEntry};
///
/// let entry = LauncherEntry::new("view-refresh", "Reload plugins", Some("Rebuild every plugin".into()), None)
///     .expect("one description supplied")
///     .with_label("Plugin manager");
/// assert_eq!(entry.label(), Some("Plugin manager"));
///
/// let missing = LauncherEntry::new("view-refresh", "Reload plugins", None, None);
/// assert_eq!(missing.err(), Some(EntryError::MissingDescription));
/// ```
#[derive(Debug, Clone)]
pub struct LauncherEntry {
    icon: String,
    title: String,
    description: Description,
    label: Option<String>,
    actions: Vec<LauncherAction>,
}

impl LauncherEntry {
    /// Creates an entry from exactly one of a plain or a markup description.
    ///
    /// # Errors
    ///
    /// Returns [`EntryError::MissingDescription`] when neither description is
    /// supplied and [`EntryError::ConflictingDescriptions`] when both are.
    pub fn new(
        icon: impl Into<String>,
        title: impl Into<String>,
        description_label: Option<String>,
        description_markup: Option<String>,
    ) -> Result<Self, EntryError> {
        let description = match (description_label, description_markup) {
            (Some(plain), None) => Description::Plain(plain),
            (None, Some(markup)) => Description::Markup(markup),
            (None, None) => return Err(EntryError::MissingDescription),
            (Some(_), Some(_)) => return Err(EntryError::ConflictingDescriptions),
        };
        Ok(Self {
            icon: icon.into(),
            title: title.into(),
            description,
            label: None,
            actions: Vec::new(),
        })
    }

    /// Sets the right-aligned label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Appends an action.
    #[must_use]
    pub fn with_action(mut self, action: LauncherAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Icon name or path.
    #[must_use]
    pub fn icon(&self) -> &str {
        &self.icon
    }

    /// Entry title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Entry description.
    #[must_use]
    pub const fn description(&self) -> &Description {
        &self.description
    }

    /// Optional right-aligned label.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Actions bound to the entry, in declaration order.
    #[must_use]
    pub fn actions(&self) -> &[LauncherAction] {
        &self.actions
    }
}

/// An action the user can trigger on a launcher entry.
#[derive(Clone)]
pub struct LauncherAction {
    name: String,
    keys: KeyCombination,
    callback: ActionCallback,
    data: Option<Value>,
}

impl LauncherAction {
    /// Creates an action without bound data.
    pub fn new(name: impl Into<String>, keys: KeyCombination, callback: ActionCallback) -> Self {
        Self {
            name: name.into(),
            keys,
            callback,
            data: None,
        }
    }

    /// Binds data that is handed to the callback when the action fires.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Action name shown to the user.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key combination that triggers the action.
    #[must_use]
    pub const fn keys(&self) -> &KeyCombination {
        &self.keys
    }

    /// Data bound to the action.
    #[must_use]
    pub const fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Runs the callback with the bound data.
    pub fn trigger(&self) {
        (self.callback)(self.data.as_ref());
    }
}

impl fmt::Debug for LauncherAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LauncherAction")
            .field("name", &self.name)
            .field("keys", &self.keys)
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}

/// Modifier keys accepted in a [`KeyCombination`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumString, Display,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Modifier {
    /// Control key.
    #[strum(to_string = "ctrl", serialize = "control")]
    Ctrl,
    /// Shift key.
    Shift,
    /// Alt key.
    Alt,
    /// Super (logo) key.
    #[strum(to_string = "super", serialize = "meta", serialize = "logo")]
    Super,
}

/// Key combination such as `enter` or `ctrl+shift+r`.
///
/// Parsing is case-insensitive. Modifiers are kept in a canonical order so
/// `shift+ctrl+r` and `ctrl+shift+r` compare equal and display identically.
///
/// # Example
///
/// ```
/// use mosaic_plugins::KeyCombination;
///
/// let keys: KeyCombination = "Shift+Ctrl+R".parse().expect("valid keys");
/// assert_eq!(keys.to_string(), "ctrl+shift+r");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombination {
    modifiers: BTreeSet<Modifier>,
    key: String,
}

impl KeyCombination {
    /// Creates a combination with no modifiers.
    #[must_use]
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            modifiers: BTreeSet::new(),
            key: key.into().to_lowercase(),
        }
    }

    /// The `enter` key alone.
    #[must_use]
    pub fn enter() -> Self {
        Self::key("enter")
    }

    /// Adds a modifier.
    #[must_use]
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.insert(modifier);
        self
    }

    /// Modifiers held with the key, in canonical order.
    pub fn modifiers(&self) -> impl Iterator<Item = Modifier> + '_ {
        self.modifiers.iter().copied()
    }

    /// The non-modifier key.
    #[must_use]
    pub fn key_name(&self) -> &str {
        &self.key
    }
}

impl FromStr for KeyCombination {
    type Err = EntryError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input.trim().is_empty() {
            return Err(EntryError::EmptyKeys);
        }

        let mut modifiers = BTreeSet::new();
        let mut key: Option<String> = None;
        for part in input.split('+').map(str::trim) {
            if let Ok(modifier) = Modifier::from_str(part) {
                modifiers.insert(modifier);
                continue;
            }
            if part.is_empty() {
                continue;
            }
            if key.is_some() {
                return Err(EntryError::MultipleKeys(input.to_owned()));
            }
            key = Some(part.to_lowercase());
        }

        let key = key.ok_or_else(|| EntryError::MissingKey(input.to_owned()))?;
        Ok(Self { modifiers, key })
    }
}

impl fmt::Display for KeyCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{modifier}+")?;
        }
        f.write_str(&self.key)
    }
}
