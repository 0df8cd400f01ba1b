//! Fixtures binding plugins to a headless shell.

use std::fs;
use std::path::Path;
use std::rc::Rc;

use mosaic_plugins::{ENTRY_FILE, Launcher, ShellContext, StatusBar};
use rstest::fixture;

use crate::headless::{HeadlessLauncher, HeadlessStatusBar};

/// A headless launcher and a context bound to one bar.
pub(crate) struct HeadlessFixture {
    pub(crate) launcher: Rc<HeadlessLauncher>,
    pub(crate) context: ShellContext,
}

#[fixture]
pub(crate) fn headless() -> HeadlessFixture {
    let bars = HeadlessStatusBar::for_monitors(&[0]);
    let launcher = Rc::new(HeadlessLauncher::default());
    let dyn_bars: Vec<Rc<dyn StatusBar>> = bars
        .iter()
        .map(|bar| Rc::clone(bar) as Rc<dyn StatusBar>)
        .collect();
    let shell_launcher: Rc<dyn Launcher> = Rc::clone(&launcher) as Rc<dyn Launcher>;
    let context = ShellContext::new(&dyn_bars, shell_launcher, 0)
        .expect("one bar is enough for a context");
    HeadlessFixture {
        launcher,
        context,
    }
}

/// Writes `<root>/<directory>/plugin.toml` naming `unit`.
pub(crate) fn write_unit(root: &Path, directory: &str, unit: &str) {
    let unit_dir = root.join(directory);
    fs::create_dir_all(&unit_dir).expect("create unit directory");
    fs::write(unit_dir.join(ENTRY_FILE), format!("unit = \"{unit}\"\n"))
        .expect("write plugin.toml");
}
