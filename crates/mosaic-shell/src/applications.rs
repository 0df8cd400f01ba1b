//! Application search used when launcher input names no command.
//!
//! Applications are read from freedesktop `.desktop` files. Only the
//! `[Desktop Entry]` group is consulted, and only its untranslated keys.

use std::collections::BTreeMap;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use tracing::{debug, warn};

const APPLICATIONS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::applications");
const DESKTOP_GROUP: &str = "[Desktop Entry]";
const DESKTOP_SUFFIX: &str = "desktop";

/// An application described by a desktop entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DesktopApplication {
    name: String,
    display_name: Option<String>,
    generic_name: Option<String>,
    exec: Option<String>,
    path: Utf8PathBuf,
}

impl DesktopApplication {
    /// Parses desktop entry text. Entries marked `NoDisplay` or `Hidden`, and
    /// entries whose `Type` is not `Application`, yield `None`.
    #[must_use]
    pub fn parse(name: &str, path: &Utf8Path, text: &str) -> Option<Self> {
        let keys = desktop_entry_keys(text)?;
        let flag = |key: &str| keys.get(key).is_some_and(|value| value.eq_ignore_ascii_case("true"));
        if flag("NoDisplay") || flag("Hidden") {
            return None;
        }
        if keys.get("Type").is_some_and(|kind| kind != "Application") {
            return None;
        }
        Some(Self {
            name: name.to_owned(),
            display_name: keys.get("Name").cloned(),
            generic_name: keys.get("GenericName").cloned(),
            exec: keys.get("Exec").cloned(),
            path: path.to_owned(),
        })
    }

    /// Desktop file identifier, the file name without `.desktop`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The entry's `Name`.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// The entry's `GenericName`.
    #[must_use]
    pub fn generic_name(&self) -> Option<&str> {
        self.generic_name.as_deref()
    }

    /// The entry's `Exec` line.
    #[must_use]
    pub fn exec(&self) -> Option<&str> {
        self.exec.as_deref()
    }

    /// File the entry was read from.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Name shown to the user.
    #[must_use]
    pub fn title(&self) -> &str {
        self.display_name.as_deref().unwrap_or("Unknown")
    }

    /// Returns `true` when the case-folded query occurs in the display name,
    /// identifier, or generic name.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let haystack = format!(
            "{} {} {}",
            self.display_name.as_deref().unwrap_or_default(),
            self.name,
            self.generic_name.as_deref().unwrap_or_default()
        );
        haystack.to_lowercase().contains(&query.to_lowercase())
    }
}

fn desktop_entry_keys(text: &str) -> Option<BTreeMap<String, String>> {
    let mut lines = text.lines().map(str::trim);
    lines.by_ref().find(|line| *line == DESKTOP_GROUP)?;
    let keys = lines
        .take_while(|line| !line.starts_with('['))
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_owned(), value.trim().to_owned()))
        .filter(|(key, _)| !key.contains('['))
        .collect();
    Some(keys)
}

/// Applications found in the configured directories.
#[derive(Debug, Clone, Default)]
pub struct ApplicationIndex {
    applications: Vec<DesktopApplication>,
}

impl ApplicationIndex {
    /// Reads every desktop entry below `directories`.
    ///
    /// When two directories hold the same identifier the earlier directory
    /// wins. Missing directories and unreadable files are skipped.
    #[must_use]
    pub fn load(directories: &[Utf8PathBuf]) -> Self {
        let mut found: BTreeMap<String, DesktopApplication> = BTreeMap::new();
        for directory in directories {
            for application in read_directory(directory) {
                found.entry(application.name.clone()).or_insert(application);
            }
        }
        let mut applications: Vec<_> = found.into_values().collect();
        applications.sort_by(|left, right| {
            left.title()
                .to_lowercase()
                .cmp(&right.title().to_lowercase())
                .then_with(|| left.name.cmp(&right.name))
        });
        debug!(target: APPLICATIONS_TARGET, count = applications.len(), "indexed applications");
        Self { applications }
    }

    /// Builds an index from applications already parsed.
    #[must_use]
    pub const fn from_applications(applications: Vec<DesktopApplication>) -> Self {
        Self { applications }
    }

    /// Applications whose text contains `query`. An empty query matches
    /// everything.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&DesktopApplication> {
        self.applications
            .iter()
            .filter(|application| application.matches(query))
            .collect()
    }

    /// Number of indexed applications.
    #[must_use]
    pub fn len(&self) -> usize {
        self.applications.len()
    }

    /// Returns `true` when no applications were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.applications.is_empty()
    }
}

fn read_directory(directory: &Utf8Path) -> Vec<DesktopApplication> {
    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(error) => {
            debug!(target: APPLICATIONS_TARGET, %directory, %error, "skipping application directory");
            return Vec::new();
        }
    };
    let mut paths: Vec<Utf8PathBuf> = entries
        .filter_map(Result::ok)
        .filter_map(|entry| Utf8PathBuf::from_path_buf(entry.path()).ok())
        .filter(|path| path.extension() == Some(DESKTOP_SUFFIX))
        .collect();
    paths.sort();
    paths
        .iter()
        .filter_map(|path| read_application(path))
        .collect()
}

fn read_application(path: &Utf8Path) -> Option<DesktopApplication> {
    let name = path.file_stem()?;
    match fs::read_to_string(path) {
        Ok(text) => DesktopApplication::parse(name, path, &text),
        Err(error) => {
            warn!(target: APPLICATIONS_TARGET, %path, %error, "failed to read desktop entry");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    const FIREFOX: &str = "\
[Desktop Entry]
Type=Application
Name=Firefox
Name[de]=Feuerfuchs
GenericName=Web Browser
Exec=firefox %u

[Desktop Action new-window]
Name=New Window
";

    fn firefox() -> DesktopApplication {
        DesktopApplication::parse("firefox", Utf8Path::new("/apps/firefox.desktop"), FIREFOX)
            .expect("firefox entry should parse")
    }

    #[test]
    fn parse_reads_untranslated_keys_of_the_entry_group() {
        let application = firefox();
        assert_eq!(application.display_name(), Some("Firefox"));
        assert_eq!(application.generic_name(), Some("Web Browser"));
        assert_eq!(application.exec(), Some("firefox %u"));
    }

    #[rstest]
    #[case("[Desktop Entry]\nName=Hidden\nNoDisplay=true\n")]
    #[case("[Desktop Entry]\nName=Gone\nHidden=True\n")]
    #[case("[Desktop Entry]\nName=Link\nType=Link\n")]
    #[case("Name=No group\n")]
    fn parse_rejects_entries_not_shown_to_users(#[case] text: &str) {
        assert!(DesktopApplication::parse("x", Utf8Path::new("/x.desktop"), text).is_none());
    }

    #[rstest]
    #[case("fire", true)]
    #[case("FIREFOX", true)]
    #[case("web browser", true)]
    #[case("x web", true)]
    #[case("", true)]
    #[case("chrome", false)]
    fn matches_case_folded_text(#[case] query: &str, #[case] expected: bool) {
        assert_eq!(firefox().matches(query), expected);
    }

    #[test]
    fn load_prefers_earlier_directories_and_skips_missing_ones() {
        let first = TempDir::new().expect("create temp dir");
        let second = TempDir::new().expect("create temp dir");
        fs::write(first.path().join("editor.desktop"), "[Desktop Entry]\nName=First Editor\n")
            .expect("write entry");
        fs::write(second.path().join("editor.desktop"), "[Desktop Entry]\nName=Second Editor\n")
            .expect("write entry");
        fs::write(second.path().join("notes.txt"), "ignored").expect("write file");
        let directories = vec![
            Utf8PathBuf::from("/definitely/not/here"),
            Utf8PathBuf::from_path_buf(first.path().to_path_buf()).expect("utf-8 path"),
            Utf8PathBuf::from_path_buf(second.path().to_path_buf()).expect("utf-8 path"),
        ];

        let index = ApplicationIndex::load(&directories);

        assert_eq!(index.len(), 1);
        let titles: Vec<_> = index.search("editor").iter().map(|app| app.title()).collect();
        assert_eq!(titles, vec!["First Editor"]);
    }
}
