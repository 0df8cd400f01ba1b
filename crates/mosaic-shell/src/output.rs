//! Text and JSON rendering of shell state.

use std::io::Write;

use mosaic_plugins::{BarComposition, CommandOutput, LauncherEntry, LauncherResponse, LoadReport, StatusBar};
use serde_json::{Value, json};

use crate::applications::ApplicationIndex;
use crate::errors::AppError;
use crate::headless::{HeadlessStatusBar, Label};
use crate::shell::{HeadlessShell, RunOutcome};

/// Writes the loaded plugins and the units or plugins that failed.
///
/// # Errors
///
/// Returns [`AppError::Output`] when writing fails.
pub fn write_plugins<W: Write>(out: &mut W, shell: &HeadlessShell, as_json: bool) -> Result<(), AppError> {
    let summaries = shell.host().registry().summaries();
    let failures = failures(shell.report());
    if as_json {
        let document = json!({
            "plugins": summaries,
            "failures": failures
                .iter()
                .map(|(name, error)| json!({ "name": name, "error": error }))
                .collect::<Vec<_>>(),
            "skipped": shell.report().discovery.skipped(),
        });
        return write_json(out, &document);
    }
    for summary in &summaries {
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            summary.name,
            summary.state,
            summary.capabilities.join(","),
            summary.commands.join(",")
        )?;
    }
    for (name, error) in &failures {
        writeln!(out, "failed\t{name}\t{error}")?;
    }
    Ok(())
}

fn failures(report: &LoadReport) -> Vec<(String, String)> {
    let units = report
        .discovery
        .failures()
        .iter()
        .map(|failure| (failure.unit.clone(), failure.error.to_string()));
    let plugins = report
        .initialisation
        .failures()
        .iter()
        .map(|failure| (failure.plugin.clone(), failure.error.to_string()));
    units.chain(plugins).collect()
}

/// Writes every bar's toolbar.
///
/// # Errors
///
/// Returns [`AppError::Output`] when writing fails.
pub fn write_toolbars<W: Write>(out: &mut W, shell: &HeadlessShell, as_json: bool) -> Result<(), AppError> {
    let composition = &shell.report().composition;
    if as_json {
        let bars: Vec<Value> = shell
            .bars()
            .iter()
            .map(|bar| bar_document(bar, composition.bar(bar.monitor())))
            .collect();
        return write_json(out, &Value::Array(bars));
    }
    for bar in shell.bars() {
        let widgets = bar.headless_toolbar().rendered();
        writeln!(out, "monitor {}: {}", bar.monitor(), widgets.join("  "))?;
        let omitted = composition
            .bar(bar.monitor())
            .map(|bar_composition| bar_composition.failures.as_slice())
            .unwrap_or_default();
        for failure in omitted {
            writeln!(out, "  omitted {}: {}", failure.plugin, failure.error)?;
        }
    }
    Ok(())
}

fn bar_document(bar: &HeadlessStatusBar, composition: Option<&BarComposition>) -> Value {
    let (plugins, failures) = composition.map_or_else(Default::default, |bar_composition| {
        let failures: Vec<Value> = bar_composition
            .failures
            .iter()
            .map(|failure| json!({ "plugin": failure.plugin, "error": failure.error.to_string() }))
            .collect();
        (bar_composition.plugins.clone(), failures)
    });
    json!({
        "monitor": bar.monitor(),
        "plugins": plugins,
        "widgets": bar.headless_toolbar().rendered(),
        "failures": failures,
    })
}

/// Writes what the launcher renders for a response.
///
/// # Errors
///
/// Returns [`AppError::Output`] when writing fails.
pub fn write_response<W: Write>(
    out: &mut W,
    response: &LauncherResponse,
    applications: &ApplicationIndex,
    as_json: bool,
) -> Result<(), AppError> {
    if as_json {
        return write_json(out, &response_document(response, applications));
    }
    match response {
        LauncherResponse::Dispatched { command, kind, output } => {
            let gate = if kind.requires_confirmation() {
                ", confirm before running"
            } else {
                ""
            };
            writeln!(out, "{command}: {kind}{gate}")?;
            if let CommandOutput::Widget(widget) = output {
                writeln!(out, "[{}]", widget.widget_name())?;
                for line in Label::render(widget.as_ref()).lines() {
                    writeln!(out, "  {line}")?;
                }
            }
            for (index, entry) in output.entries().iter().enumerate() {
                write_entry(out, index, entry)?;
            }
        }
        LauncherResponse::ApplicationSearch { query } => {
            let matches = applications.search(query);
            writeln!(out, "applications matching '{query}': {}", matches.len())?;
            for application in matches {
                writeln!(
                    out,
                    "  {}\t{}\t{}",
                    application.title(),
                    application.name(),
                    application.exec().unwrap_or_default()
                )?;
            }
        }
    }
    Ok(())
}

fn write_entry<W: Write>(out: &mut W, index: usize, entry: &LauncherEntry) -> Result<(), AppError> {
    let label = entry.label().map(|text| format!(" [{text}]")).unwrap_or_default();
    writeln!(out, "{index}. {}{label}", entry.title())?;
    writeln!(out, "   {}", entry.description().text())?;
    for (action_index, action) in entry.actions().iter().enumerate() {
        writeln!(out, "   {action_index}) {} <{}>", action.name(), action.keys())?;
    }
    Ok(())
}

fn response_document(response: &LauncherResponse, applications: &ApplicationIndex) -> Value {
    match response {
        LauncherResponse::Dispatched { command, kind, output } => {
            let widget = match output {
                CommandOutput::Widget(widget) => Some(json!({
                    "name": widget.widget_name(),
                    "text": Label::render(widget.as_ref()),
                })),
                CommandOutput::Entry(_) | CommandOutput::List(_) => None,
            };
            json!({
                "type": "dispatched",
                "command": command,
                "kind": kind.as_str(),
                "confirm": kind.requires_confirmation(),
                "entries": output.entries().iter().map(entry_document).collect::<Vec<_>>(),
                "widget": widget,
            })
        }
        LauncherResponse::ApplicationSearch { query } => json!({
            "type": "application_search",
            "query": query,
            "applications": applications.search(query),
        }),
    }
}

fn entry_document(entry: &LauncherEntry) -> Value {
    let actions: Vec<Value> = entry
        .actions()
        .iter()
        .map(|action| {
            json!({
                "name": action.name(),
                "keys": action.keys().to_string(),
                "data": action.data(),
            })
        })
        .collect();
    json!({
        "icon": entry.icon(),
        "title": entry.title(),
        "description": entry.description().text(),
        "markup": entry.description().is_markup(),
        "label": entry.label(),
        "actions": actions,
    })
}

/// Writes the result of running an entry action.
///
/// # Errors
///
/// Returns [`AppError::Output`] when writing fails.
pub fn write_outcome<W: Write>(out: &mut W, outcome: &RunOutcome, as_json: bool) -> Result<(), AppError> {
    let requests: Vec<String> = outcome
        .requests
        .iter()
        .map(|request| format!("{request:?}"))
        .collect();
    if as_json {
        let document = json!({
            "command": outcome.command,
            "entry": outcome.entry,
            "action": outcome.action,
            "requests": requests,
        });
        return write_json(out, &document);
    }
    writeln!(out, "ran '{}' on '{}' ({})", outcome.action, outcome.entry, outcome.command)?;
    for request in requests {
        writeln!(out, "applied {request}")?;
    }
    Ok(())
}

fn write_json<W: Write>(out: &mut W, document: &Value) -> Result<(), AppError> {
    serde_json::to_writer_pretty(&mut *out, document)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}
