//! `packlist data` command - whole-checklist import, export, clear

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::commands::{confirm_destructive, open_store, print_report, print_store_warnings};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::entities::log_entry::OperationKind;
use crate::schema::{ImportValidator, SchemaError};

#[derive(Subcommand, Debug)]
pub enum DataCommands {
    /// Replace the checklist with a JSON export
    Import(ImportArgs),

    /// Export the checklist as JSON or CSV
    Export(ExportArgs),

    /// Delete every category and item
    Clear(ClearArgs),
}

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// JSON file containing an array of categories
    pub file: PathBuf,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Output file (default: stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct ClearArgs {
    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn run(cmd: DataCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        DataCommands::Import(args) => run_import(args, global),
        DataCommands::Export(args) => run_export(args, global),
        DataCommands::Clear(args) => run_clear(args, global),
    }
}

fn run_import(args: ImportArgs, global: &GlobalOpts) -> Result<()> {
    let contents = std::fs::read_to_string(&args.file).into_diagnostic()?;
    let payload: serde_json::Value = serde_json::from_str(&contents)
        .map_err(|e| miette::miette!("{} is not valid JSON: {}", args.file.display(), e))?;

    // Early field-level diagnostics; the store's migration engine is the
    // actual import boundary and would repair anything structural.
    let validator = ImportValidator::new().map_err(|e| miette::miette!("{}", e))?;
    if let Err(SchemaError::PayloadInvalid { violations }) = validator.validate(&payload) {
        for violation in violations.iter().take(10) {
            eprintln!("{} {}", style("✗").red(), violation);
        }
        if violations.len() > 10 {
            eprintln!("  ... and {} more", violations.len() - 10);
        }
        return Err(miette::miette!(
            "import payload failed schema validation ({} violation(s))",
            violations.len()
        ));
    }

    let (mut store, config) = open_store(global)?;
    let prompt = format!(
        "Replace the current checklist ({} categor(ies)) with {}?",
        store.categories().len(),
        args.file.display()
    );
    if !confirm_destructive(&prompt, args.yes, &config)? {
        println!("Aborted.");
        return Ok(());
    }

    let outcome = store
        .import_data(payload)
        .map_err(|e| miette::miette!("{}", e))?;
    print_report(&outcome.report, global);
    print_store_warnings(&mut store, global);

    println!(
        "{} Imported {} categor(ies), {} item(s)",
        style("✓").green(),
        outcome.category_count,
        outcome.item_count
    );
    Ok(())
}

fn run_export(args: ExportArgs, global: &GlobalOpts) -> Result<()> {
    let (mut store, _) = open_store(global)?;

    let format = match global.format {
        OutputFormat::Csv => OutputFormat::Csv,
        _ => OutputFormat::Json,
    };

    let rendered = match format {
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer
                .write_record([
                    "category",
                    "id",
                    "index",
                    "name",
                    "completed",
                    "quantity",
                    "quantityUnit",
                    "weight",
                    "weightUnit",
                    "price",
                    "priceUnit",
                    "priority",
                ])
                .into_diagnostic()?;
            for category in store.categories() {
                for item in &category.items {
                    let record = vec![
                        category.name.clone(),
                        item.id.to_string(),
                        item.index.to_string(),
                        item.name.clone(),
                        item.completed.to_string(),
                        item.quantity.to_string(),
                        item.quantity_unit.clone(),
                        item.weight.to_string(),
                        item.weight_unit.to_string(),
                        item.price.to_string(),
                        item.price_unit.to_string(),
                        item.priority.to_string(),
                    ];
                    writer.write_record(&record).into_diagnostic()?;
                }
            }
            let bytes = writer.into_inner().into_diagnostic()?;
            String::from_utf8(bytes).into_diagnostic()?
        }
        _ => serde_json::to_string_pretty(store.categories()).into_diagnostic()?,
    };

    let summary = store.summary();
    store.oplog_mut().log(
        OperationKind::Export,
        "Exported checklist data",
        Some(serde_json::json!({
            "categories": summary.total_categories,
            "items": summary.total_items,
        })),
        None,
        true,
    );
    print_store_warnings(&mut store, global);

    match args.output {
        Some(path) => {
            std::fs::write(&path, rendered).into_diagnostic()?;
            println!(
                "{} Exported checklist to {}",
                style("✓").green(),
                path.display()
            );
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

fn run_clear(args: ClearArgs, global: &GlobalOpts) -> Result<()> {
    let (mut store, config) = open_store(global)?;

    let summary = store.summary();
    let prompt = format!(
        "Delete all {} categor(ies) and {} item(s)?",
        summary.total_categories, summary.total_items
    );
    if !confirm_destructive(&prompt, args.yes, &config)? {
        println!("Aborted.");
        return Ok(());
    }

    let (categories, items) = store
        .clear_all_data()
        .map_err(|e| miette::miette!("{}", e))?;
    print_store_warnings(&mut store, global);

    println!(
        "{} Cleared {} categor(ies), {} item(s)",
        style("✓").green(),
        categories,
        items
    );
    Ok(())
}
