//! `packlist item` command - item management

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::{
    confirm_destructive, open_store, print_store_warnings, resolve_category, resolve_item, Store,
};
use crate::cli::helpers::{escape_csv, format_short_id, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::{CategoryId, ItemId};
use crate::entities::item::{ItemDraft, Priority};
use crate::entities::units::{PriceUnit, WeightUnit};

#[derive(Subcommand, Debug)]
pub enum ItemCommands {
    /// List items (all categories, or one)
    List(ListArgs),

    /// Add an item to a category
    Add(AddArgs),

    /// Edit an item (overwrites fields; unspecified ones reset to defaults)
    Edit(EditArgs),

    /// Delete an item
    Rm(RmArgs),

    /// Toggle an item's completed flag
    Toggle(ToggleArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Category id or name (default: all categories)
    pub category: Option<String>,

    /// Show only items still to pack
    #[arg(long)]
    pub remaining: bool,

    /// Show count only, not the items
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct FieldArgs {
    /// Quantity (default 1)
    #[arg(long)]
    pub quantity: Option<f64>,

    /// Quantity unit (default: configured unit)
    #[arg(long)]
    pub quantity_unit: Option<String>,

    /// Weight of a single unit
    #[arg(long, short = 'w')]
    pub weight: Option<f64>,

    /// Weight unit: g, kg, 斤, 磅 (unknown tags count as grams)
    #[arg(long)]
    pub weight_unit: Option<String>,

    /// Price of a single unit
    #[arg(long, short = 'p')]
    pub price: Option<f64>,

    /// Currency: 人民币, 美元, 英镑, 日元 (unknown tags count as base currency)
    #[arg(long)]
    pub price_unit: Option<String>,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,

    /// Packing priority
    #[arg(long)]
    pub priority: Option<Priority>,

    /// Mark as recommended gear
    #[arg(long)]
    pub recommended: bool,

    /// Mark as already packed
    #[arg(long)]
    pub completed: bool,
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Category id or name
    pub category: String,

    /// Item name
    pub name: String,

    /// Create the category if it does not exist
    #[arg(long)]
    pub create: bool,

    #[command(flatten)]
    pub fields: FieldArgs,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Category id or name
    pub category: String,

    /// Item id or name
    pub item: String,

    /// New item name
    #[arg(long, short = 'n')]
    pub name: String,

    #[command(flatten)]
    pub fields: FieldArgs,
}

#[derive(clap::Args, Debug)]
pub struct RmArgs {
    /// Category id or name
    pub category: String,

    /// Item id or name
    pub item: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(clap::Args, Debug)]
pub struct ToggleArgs {
    /// Category id or name
    pub category: String,

    /// Item id or name
    pub item: String,
}

pub fn run(cmd: ItemCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ItemCommands::List(args) => run_list(args, global),
        ItemCommands::Add(args) => run_add(args, global),
        ItemCommands::Edit(args) => run_edit(args, global),
        ItemCommands::Rm(args) => run_rm(args, global),
        ItemCommands::Toggle(args) => run_toggle(args, global),
    }
}

fn draft_from(name: String, fields: FieldArgs, default_quantity_unit: &str) -> ItemDraft {
    ItemDraft {
        name,
        completed: fields.completed,
        quantity: fields.quantity,
        quantity_unit: fields
            .quantity_unit
            .or_else(|| Some(default_quantity_unit.to_string())),
        weight: fields.weight,
        weight_unit: fields.weight_unit.map(WeightUnit::from),
        price: fields.price,
        price_unit: fields.price_unit.map(PriceUnit::from),
        is_recommended: fields.recommended,
        notes: fields.notes,
        priority: fields.priority,
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let (store, _) = open_store(global)?;

    // (category name, item) pairs across the selected categories
    let selected = match &args.category {
        Some(reference) => {
            let id = resolve_category(&store, reference)?;
            vec![id]
        }
        None => store.categories().iter().map(|c| c.id.clone()).collect(),
    };

    let mut rows = Vec::new();
    for id in &selected {
        if let Some(category) = store.find_category(id) {
            for item in &category.items {
                if args.remaining && item.completed {
                    continue;
                }
                rows.push((category.name.as_str(), item));
            }
        }
    }

    if args.count {
        println!("{}", rows.len());
        return Ok(());
    }

    if rows.is_empty() {
        match global.format {
            OutputFormat::Json | OutputFormat::Yaml => println!("[]"),
            _ => {
                println!("No items found.");
                println!();
                println!("Add one with: {}", style("packlist item add").yellow());
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
            let items: Vec<_> = rows.iter().map(|(_, item)| item).collect();
            let json = serde_json::to_string_pretty(&items).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let items: Vec<_> = rows.iter().map(|(_, item)| item).collect();
            let yaml = serde_yml::to_string(&items).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Csv => {
            println!("category,id,index,name,completed,quantity,quantityUnit,weight,weightUnit,price,priceUnit");
            for (category, item) in &rows {
                println!(
                    "{},{},{},{},{},{},{},{},{},{},{}",
                    escape_csv(category),
                    item.id,
                    item.index,
                    escape_csv(&item.name),
                    item.completed,
                    item.quantity,
                    escape_csv(&item.quantity_unit),
                    item.weight,
                    escape_csv(item.weight_unit.as_str()),
                    item.price,
                    escape_csv(item.price_unit.as_str())
                );
            }
        }
        OutputFormat::Tsv => {
            println!(
                "{:<16} {:>3} {:<20} {:<14} {:>10} {:>10} {:>5}",
                style("ID").bold(),
                style("#").bold(),
                style("NAME").bold(),
                style("CATEGORY").bold(),
                style("WEIGHT").bold(),
                style("PRICE").bold(),
                style("DONE").bold()
            );
            println!("{}", "-".repeat(86));
            for (category, item) in &rows {
                println!(
                    "{:<16} {:>3} {:<20} {:<14} {:>10} {:>10} {:>5}",
                    format_short_id(item.id.as_str()),
                    item.index,
                    truncate_str(&item.name, 18),
                    truncate_str(category, 12),
                    format!("{}{}", item.weight, item.weight_unit),
                    format!("{}{}", item.price, item.price_unit),
                    if item.completed { "✓" } else { "·" }
                );
            }
            println!();
            println!("{} item(s) found", style(rows.len()).cyan());
        }
        OutputFormat::Id => {
            for (_, item) in &rows {
                println!("{}", item.id);
            }
        }
        OutputFormat::Md => {
            println!("| ID | # | Name | Category | Weight | Price | Done |");
            println!("|---|---|---|---|---|---|---|");
            for (category, item) in &rows {
                println!(
                    "| {} | {} | {} | {} | {}{} | {}{} | {} |",
                    format_short_id(item.id.as_str()),
                    item.index,
                    item.name,
                    category,
                    item.weight,
                    item.weight_unit,
                    item.price,
                    item.price_unit,
                    if item.completed { "✓" } else { "" }
                );
            }
        }
        OutputFormat::Auto => unreachable!(),
    }

    Ok(())
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let (mut store, config) = open_store(global)?;

    let category_id = if args.create {
        store
            .get_or_create_category(&args.category, config.default_icon())
            .map_err(|e| miette::miette!("{}", e))?
    } else {
        resolve_category(&store, &args.category)?
    };

    let draft = draft_from(args.name, args.fields, config.default_quantity_unit());
    let id = store
        .add_item(&category_id, draft)
        .map_err(|e| miette::miette!("{}", e))?;
    print_store_warnings(&mut store, global);

    let item = lookup(&store, &category_id, &id);
    println!(
        "{} Added item {} #{} {}",
        style("✓").green(),
        id,
        item.0,
        item.1
    );
    Ok(())
}

fn lookup(store: &Store, category_id: &CategoryId, id: &ItemId) -> (u32, String) {
    store
        .find_category(category_id)
        .and_then(|c| c.find_item(id))
        .map(|i| (i.index, i.name.clone()))
        .unwrap_or((0, String::new()))
}

fn run_edit(args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let (mut store, config) = open_store(global)?;
    let category_id = resolve_category(&store, &args.category)?;
    let item_id = resolve_item(&store, &category_id, &args.item)?;

    let draft = draft_from(args.name.clone(), args.fields, config.default_quantity_unit());
    store
        .edit_item(&category_id, &item_id, draft)
        .map_err(|e| miette::miette!("{}", e))?;
    print_store_warnings(&mut store, global);

    println!("{} Updated item \"{}\"", style("✓").green(), args.name.trim());
    Ok(())
}

fn run_rm(args: RmArgs, global: &GlobalOpts) -> Result<()> {
    let (mut store, config) = open_store(global)?;
    let category_id = resolve_category(&store, &args.category)?;
    let item_id = resolve_item(&store, &category_id, &args.item)?;

    let (_, name) = lookup(&store, &category_id, &item_id);
    if !confirm_destructive(&format!("Delete item \"{}\"?", name), args.yes, &config)? {
        println!("Aborted.");
        return Ok(());
    }

    let removed = store
        .delete_item(&category_id, &item_id)
        .map_err(|e| miette::miette!("{}", e))?;
    print_store_warnings(&mut store, global);

    println!("{} Deleted item \"{}\"", style("✓").green(), removed.name);
    Ok(())
}

fn run_toggle(args: ToggleArgs, global: &GlobalOpts) -> Result<()> {
    let (mut store, _) = open_store(global)?;
    let category_id = resolve_category(&store, &args.category)?;
    let item_id = resolve_item(&store, &category_id, &args.item)?;

    let completed = store
        .toggle_item(&category_id, &item_id)
        .map_err(|e| miette::miette!("{}", e))?;
    print_store_warnings(&mut store, global);

    let (_, name) = lookup(&store, &category_id, &item_id);
    println!(
        "{} \"{}\" is now {}",
        style("✓").green(),
        name,
        if completed { "packed" } else { "unpacked" }
    );
    Ok(())
}
