//! `packlist stats` command - checklist totals

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::open_store;
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(clap::Args, Debug)]
pub struct StatsArgs {}

pub fn run(_args: StatsArgs, global: &GlobalOpts) -> Result<()> {
    let (store, _) = open_store(global)?;
    let summary = store.summary();

    match global.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&summary).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&summary).into_diagnostic()?;
            print!("{}", yaml);
        }
        _ => {
            println!("{}", style("Checklist totals").bold());
            println!("  Categories: {}", style(summary.total_categories).cyan());
            println!("  Items:      {}", style(summary.total_items).cyan());
            println!(
                "  Packed:     {} ({} remaining)",
                style(summary.completed_items).green(),
                style(summary.remaining_items).yellow()
            );
            println!("  Weight:     {}", style(&summary.total_weight).cyan());
            println!("  Price:      {}", style(&summary.total_price).cyan());
        }
    }
    Ok(())
}
