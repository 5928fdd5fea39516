//! `packlist cat` command - category management

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::{
    confirm_destructive, open_store, print_store_warnings, resolve_category,
};
use crate::cli::helpers::{escape_csv, format_short_id, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::CategoryId;
use crate::core::store::StoreError;

#[derive(Subcommand, Debug)]
pub enum CatCommands {
    /// List categories
    List(ListArgs),

    /// Add a new category
    Add(AddArgs),

    /// Rename a category
    Rename(RenameArgs),

    /// Change a category's icon
    Icon(IconArgs),

    /// Delete a category and all of its items
    Rm(RmArgs),

    /// Toggle a category's collapsed flag
    Collapse(CollapseArgs),

    /// Reorder categories (every category id or name, in the new order)
    Sort(SortArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Show count only, not the categories
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Category name
    pub name: String,

    /// Pictogram label (default: configured icon)
    #[arg(long, short = 'i')]
    pub icon: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct RenameArgs {
    /// Category id or name
    pub category: String,

    /// New name
    pub name: String,
}

#[derive(clap::Args, Debug)]
pub struct IconArgs {
    /// Category id or name
    pub category: String,

    /// New icon
    pub icon: String,
}

#[derive(clap::Args, Debug)]
pub struct RmArgs {
    /// Category id or name
    pub category: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(clap::Args, Debug)]
pub struct CollapseArgs {
    /// Category id or name
    pub category: String,
}

#[derive(clap::Args, Debug)]
pub struct SortArgs {
    /// Category ids or names in the desired order
    #[arg(required = true)]
    pub categories: Vec<String>,
}

pub fn run(cmd: CatCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        CatCommands::List(args) => run_list(args, global),
        CatCommands::Add(args) => run_add(args, global),
        CatCommands::Rename(args) => run_rename(args, global),
        CatCommands::Icon(args) => run_icon(args, global),
        CatCommands::Rm(args) => run_rm(args, global),
        CatCommands::Collapse(args) => run_collapse(args, global),
        CatCommands::Sort(args) => run_sort(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let (store, _) = open_store(global)?;
    let categories = store.categories();

    if args.count {
        println!("{}", categories.len());
        return Ok(());
    }

    if categories.is_empty() {
        match global.format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Yaml => println!("[]"),
            _ => {
                println!("No categories found.");
                println!();
                println!("Create one with: {}", style("packlist cat add").yellow());
            }
        }
        return Ok(());
    }

    let format = match global.format {
        OutputFormat::Auto => OutputFormat::Tsv,
        f => f,
    };

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(categories).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&categories).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Csv => {
            println!("id,icon,name,items,completed,collapsed");
            for cat in categories {
                let completed = cat.items.iter().filter(|i| i.completed).count();
                println!(
                    "{},{},{},{},{},{}",
                    cat.id,
                    escape_csv(&cat.icon),
                    escape_csv(&cat.name),
                    cat.items.len(),
                    completed,
                    cat.collapsed
                );
            }
        }
        OutputFormat::Tsv => {
            println!(
                "{:<16} {:<4} {:<24} {:>6} {:>6}",
                style("ID").bold(),
                style("ICON").bold(),
                style("NAME").bold(),
                style("ITEMS").bold(),
                style("DONE").bold()
            );
            println!("{}", "-".repeat(62));
            for cat in categories {
                let completed = cat.items.iter().filter(|i| i.completed).count();
                println!(
                    "{:<16} {:<4} {:<24} {:>6} {:>6}",
                    format_short_id(cat.id.as_str()),
                    cat.icon,
                    truncate_str(&cat.name, 22),
                    cat.items.len(),
                    completed
                );
            }
            println!();
            println!("{} categor(ies) found", style(categories.len()).cyan());
        }
        OutputFormat::Id => {
            for cat in categories {
                println!("{}", cat.id);
            }
        }
        OutputFormat::Md => {
            println!("| ID | Icon | Name | Items | Done |");
            println!("|---|---|---|---|---|");
            for cat in categories {
                let completed = cat.items.iter().filter(|i| i.completed).count();
                println!(
                    "| {} | {} | {} | {} | {} |",
                    format_short_id(cat.id.as_str()),
                    cat.icon,
                    cat.name,
                    cat.items.len(),
                    completed
                );
            }
        }
        OutputFormat::Auto => unreachable!(),
    }

    Ok(())
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let (mut store, config) = open_store(global)?;
    let icon = args.icon.as_deref().unwrap_or_else(|| config.default_icon());

    let id = store
        .add_category(&args.name, icon)
        .map_err(|e| miette::miette!("{}", e))?;
    print_store_warnings(&mut store, global);

    println!(
        "{} Added category {} {}",
        style("✓").green(),
        id,
        args.name.trim()
    );
    Ok(())
}

fn run_rename(args: RenameArgs, global: &GlobalOpts) -> Result<()> {
    let (mut store, _) = open_store(global)?;
    let id = resolve_category(&store, &args.category)?;

    match store.edit_category_name(&id, &args.name) {
        Ok(()) => {
            print_store_warnings(&mut store, global);
            println!(
                "{} Renamed category to \"{}\"",
                style("✓").green(),
                args.name.trim()
            );
            Ok(())
        }
        Err(StoreError::Unchanged) => {
            println!("{} Name unchanged, nothing to do", style("!").yellow());
            Ok(())
        }
        Err(e) => Err(miette::miette!("{}", e)),
    }
}

fn run_icon(args: IconArgs, global: &GlobalOpts) -> Result<()> {
    let (mut store, _) = open_store(global)?;
    let id = resolve_category(&store, &args.category)?;

    match store.edit_category_icon(&id, &args.icon) {
        Ok(()) => {
            print_store_warnings(&mut store, global);
            println!("{} Changed icon to {}", style("✓").green(), args.icon.trim());
            Ok(())
        }
        Err(StoreError::Unchanged) => {
            println!("{} Icon unchanged, nothing to do", style("!").yellow());
            Ok(())
        }
        Err(e) => Err(miette::miette!("{}", e)),
    }
}

fn run_rm(args: RmArgs, global: &GlobalOpts) -> Result<()> {
    let (mut store, config) = open_store(global)?;
    let id = resolve_category(&store, &args.category)?;

    let name = store
        .find_category(&id)
        .map(|c| c.name.clone())
        .unwrap_or_default();
    let item_count = store.find_category(&id).map(|c| c.items.len()).unwrap_or(0);
    let prompt = format!("Delete category \"{}\" and its {} item(s)?", name, item_count);
    if !confirm_destructive(&prompt, args.yes, &config)? {
        println!("Aborted.");
        return Ok(());
    }

    let removed = store.delete_category(&id).map_err(|e| miette::miette!("{}", e))?;
    print_store_warnings(&mut store, global);

    println!(
        "{} Deleted category \"{}\" ({} item(s))",
        style("✓").green(),
        removed.name,
        removed.items.len()
    );
    Ok(())
}

fn run_collapse(args: CollapseArgs, global: &GlobalOpts) -> Result<()> {
    let (mut store, _) = open_store(global)?;
    let id = resolve_category(&store, &args.category)?;

    let collapsed = store
        .toggle_category_collapse(&id)
        .map_err(|e| miette::miette!("{}", e))?;
    println!(
        "{} Category is now {}",
        style("✓").green(),
        if collapsed { "collapsed" } else { "expanded" }
    );
    Ok(())
}

fn run_sort(args: SortArgs, global: &GlobalOpts) -> Result<()> {
    let (mut store, _) = open_store(global)?;

    let order: Vec<CategoryId> = args
        .categories
        .iter()
        .map(|reference| resolve_category(&store, reference))
        .collect::<Result<_>>()?;

    store
        .update_categories_order(&order)
        .map_err(|e| miette::miette!("{}", e))?;
    print_store_warnings(&mut store, global);

    println!("{} Reordered {} categories", style("✓").green(), order.len());
    Ok(())
}
