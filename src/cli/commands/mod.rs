//! Command implementations

pub mod cat;
pub mod completions;
pub mod data;
pub mod doctor;
pub mod init;
pub mod item;
pub mod log;
pub mod stats;
pub mod undo;

use console::style;
use miette::Result;

use crate::cli::GlobalOpts;
use crate::core::config::Config;
use crate::core::identity::{CategoryId, ItemId};
use crate::core::migrate::MigrationReport;
use crate::core::oplog::OperationLogStore;
use crate::core::store::EquipmentStore;
use crate::core::workspace::Workspace;
use crate::storage::FileBackend;

/// The store type every command works against
pub(crate) type Store = EquipmentStore<FileBackend>;

/// Resolve the workspace from --workspace or by walking up from the cwd
pub(crate) fn resolve_workspace(global: &GlobalOpts) -> Result<Workspace> {
    let workspace = match &global.workspace {
        Some(path) => Workspace::discover_from(path),
        None => Workspace::discover(),
    };
    workspace.map_err(|e| miette::miette!("{}", e))
}

/// Open the workspace's store, running migration and printing its warnings
pub(crate) fn open_store(global: &GlobalOpts) -> Result<(Store, Config)> {
    let workspace = resolve_workspace(global)?;
    let config = Config::load(Some(&workspace));
    let backend = FileBackend::new(workspace.data_dir());

    let (oplog, oplog_warning) = OperationLogStore::load(backend.clone());
    if let Some(warning) = oplog_warning {
        if !global.quiet {
            eprintln!("{} {}", style("!").yellow(), warning);
        }
    }

    let (store, report) = EquipmentStore::load(backend, oplog);
    print_report(&report, global);
    Ok((store, config))
}

/// Print a migration/repair report's diagnostics
pub(crate) fn print_report(report: &MigrationReport, global: &GlobalOpts) {
    if global.quiet {
        return;
    }
    for warning in &report.warnings {
        eprintln!("{} {}", style("!").yellow(), warning);
    }
    if global.verbose && report.repaired() {
        eprintln!(
            "{} repaired persisted data: {} re-indexed, {} duplicate ids fixed, {} ids minted, {} fields defaulted",
            style("i").cyan(),
            report.reindexed_categories,
            report.duplicate_ids_fixed,
            report.minted_ids,
            report.defaulted_fields,
        );
    }
}

/// Print any non-fatal log-persistence warnings accumulated during a command
pub(crate) fn print_store_warnings(store: &mut Store, global: &GlobalOpts) {
    for warning in store.oplog_mut().take_warnings() {
        if !global.quiet {
            eprintln!("{} {}", style("!").yellow(), warning);
        }
    }
}

/// Resolve a category reference: exact id first, then exact name
pub(crate) fn resolve_category(store: &Store, reference: &str) -> Result<CategoryId> {
    if let Some(category) = store.find_category(&CategoryId::from(reference)) {
        return Ok(category.id.clone());
    }
    if let Some(category) = store.find_category_by_name(reference) {
        return Ok(category.id.clone());
    }
    Err(miette::miette!(
        "no category matches '{}' (by id or name)",
        reference
    ))
}

/// Resolve an item reference within a category: exact id first, then exact name
pub(crate) fn resolve_item(
    store: &Store,
    category_id: &CategoryId,
    reference: &str,
) -> Result<ItemId> {
    let category = store
        .find_category(category_id)
        .ok_or_else(|| miette::miette!("category not found: {}", category_id))?;
    if let Some(item) = category.find_item(&ItemId::from(reference)) {
        return Ok(item.id.clone());
    }
    if let Some(item) = category.items.iter().find(|i| i.name == reference) {
        return Ok(item.id.clone());
    }
    Err(miette::miette!(
        "no item in '{}' matches '{}' (by id or name)",
        category.name,
        reference
    ))
}

/// Ask for confirmation before a destructive operation
///
/// `--yes` or `confirm_destructive: false` skips the prompt. When no
/// terminal is attached the operation is refused rather than silently
/// confirmed.
pub(crate) fn confirm_destructive(
    prompt: &str,
    assume_yes: bool,
    config: &Config,
) -> Result<bool> {
    if assume_yes || !config.confirm_destructive() {
        return Ok(true);
    }
    match dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
    {
        Ok(confirmed) => Ok(confirmed),
        Err(_) => Err(miette::miette!(
            "confirmation required but no terminal is attached; pass --yes to proceed"
        )),
    }
}
