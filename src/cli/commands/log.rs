//! `packlist log` command - operation log management

use chrono::{DateTime, Local, Utc};
use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use serde_json::Value as JsonValue;
use std::path::PathBuf;

use crate::cli::commands::{confirm_destructive, open_store};
use crate::cli::helpers::{format_short_id, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::oplog::OplogError;
use crate::entities::log_entry::OperationKind;

#[derive(Subcommand, Debug)]
pub enum LogCommands {
    /// List log entries, newest first
    List(ListArgs),

    /// Clear the operation log
    Clear(ClearArgs),

    /// Export the operation log to a JSON file
    Export(ExportArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by operation kind
    #[arg(long, short = 't')]
    pub r#type: Option<OperationKind>,

    /// Show only entries an undo could consume right now
    #[arg(long)]
    pub undoable: bool,

    /// Limit output to N entries
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show count only, not the entries
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct ClearArgs {
    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Output file (default: operation-log-YYYY-MM-DD.json)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(cmd: LogCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        LogCommands::List(args) => run_list(args, global),
        LogCommands::Clear(args) => run_clear(args, global),
        LogCommands::Export(args) => run_export(args, global),
    }
}

/// Format a timestamp the way the log view shows it: `M/D HH:MM:SS` local time
fn format_time(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%-m/%-d %H:%M:%S")
        .to_string()
}

/// Flatten a details payload to `key: value | key: value`
fn format_details(details: &JsonValue) -> String {
    match details {
        JsonValue::String(s) => s.clone(),
        JsonValue::Object(map) => map
            .iter()
            .map(|(k, v)| match v {
                JsonValue::String(s) => format!("{}: {}", k, s),
                other => format!("{}: {}", k, other),
            })
            .collect::<Vec<_>>()
            .join(" | "),
        other => other.to_string(),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let (store, _) = open_store(global)?;

    let entries: Vec<_> = store
        .oplog()
        .entries()
        .iter()
        .filter(|e| args.r#type.map_or(true, |t| e.kind == t))
        .filter(|e| !args.undoable || e.is_undoable_now())
        .take(args.limit.unwrap_or(usize::MAX))
        .collect();

    if args.count {
        println!("{}", entries.len());
        return Ok(());
    }

    if entries.is_empty() {
        match global.format {
            OutputFormat::Json | OutputFormat::Yaml => println!("[]"),
            _ => println!("No log entries."),
        }
        return Ok(());
    }

    let format = match global.format {
        OutputFormat::Auto => OutputFormat::Tsv,
        f => f,
    };

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&entries).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&entries).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Id => {
            for entry in &entries {
                println!("{}", entry.id);
            }
        }
        _ => {
            println!(
                "{:<16} {:<15} {:<8} {:<44} {:<6}",
                style("ID").bold(),
                style("TIME").bold(),
                style("TYPE").bold(),
                style("ACTION").bold(),
                style("UNDO").bold()
            );
            println!("{}", "-".repeat(92));
            for entry in &entries {
                let undo_marker = if entry.undone {
                    "↩"
                } else if entry.is_undoable_now() {
                    "✓"
                } else {
                    "·"
                };
                println!(
                    "{:<16} {:<15} {:<8} {:<44} {:<6}",
                    format_short_id(entry.id.as_str()),
                    format_time(entry.timestamp),
                    entry.kind,
                    truncate_str(&entry.action, 42),
                    undo_marker
                );
                if global.verbose {
                    if let Some(details) = &entry.details {
                        println!("    {}", style(format_details(details)).dim());
                    }
                }
            }
            println!();
            println!(
                "{} entr(ies), {} undoable",
                style(entries.len()).cyan(),
                style(store.oplog().undoable_count()).cyan()
            );
        }
    }

    Ok(())
}

fn run_clear(args: ClearArgs, global: &GlobalOpts) -> Result<()> {
    let (mut store, config) = open_store(global)?;

    let count = store.oplog().log_count();
    if !confirm_destructive(
        &format!("Clear all {} log entr(ies)?", count),
        args.yes,
        &config,
    )? {
        println!("Aborted.");
        return Ok(());
    }

    store
        .oplog_mut()
        .clear_logs()
        .map_err(|e| miette::miette!("{}", e))?;
    println!("{} Cleared {} log entr(ies)", style("✓").green(), count);
    Ok(())
}

fn run_export(args: ExportArgs, global: &GlobalOpts) -> Result<()> {
    let (mut store, _) = open_store(global)?;

    let json = match store.oplog_mut().export_logs() {
        Ok(json) => json,
        Err(OplogError::Empty) => {
            return Err(miette::miette!("no log entries to export"));
        }
        Err(e) => return Err(miette::miette!("{}", e)),
    };

    let path = args.output.unwrap_or_else(|| {
        PathBuf::from(format!(
            "operation-log-{}.json",
            Local::now().format("%Y-%m-%d")
        ))
    });
    std::fs::write(&path, json).into_diagnostic()?;

    println!(
        "{} Exported operation log to {}",
        style("✓").green(),
        path.display()
    );
    Ok(())
}
