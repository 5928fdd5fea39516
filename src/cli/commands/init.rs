//! `packlist init` command - workspace initialization

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::GlobalOpts;
use crate::core::oplog::OperationLogStore;
use crate::core::store::EquipmentStore;
use crate::core::workspace::{Workspace, WorkspaceError};
use crate::storage::FileBackend;

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    pub path: Option<PathBuf>,

    /// Re-initialize even if a workspace already exists
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, global: &GlobalOpts) -> Result<()> {
    let path = args.path.unwrap_or_else(|| PathBuf::from("."));

    let workspace = if args.force {
        Workspace::init_force(&path)
    } else {
        match Workspace::init(&path) {
            Err(WorkspaceError::AlreadyExists(root)) => {
                println!(
                    "Packlist workspace already exists at {} (use --force to re-initialize)",
                    root.display()
                );
                return Ok(());
            }
            other => other,
        }
    }
    .map_err(|e| miette::miette!("{}", e))?;

    // Seed the default checklist so the first list command has data
    let backend = FileBackend::new(workspace.data_dir());
    let (oplog, _) = OperationLogStore::load(backend.clone());
    let (store, _) = EquipmentStore::load(backend, oplog);

    println!(
        "{} Initialized packlist workspace at {}",
        style("✓").green(),
        workspace.root().display()
    );
    if !global.quiet {
        println!(
            "  {} default categories ready; add gear with {}",
            store.categories().len(),
            style("packlist item add").yellow()
        );
    }
    Ok(())
}
