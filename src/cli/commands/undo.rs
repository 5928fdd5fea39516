//! `packlist undo` command - snapshot-based undo

use console::style;
use miette::Result;

use crate::cli::commands::{open_store, print_store_warnings};
use crate::cli::helpers::truncate_str;
use crate::cli::GlobalOpts;
use crate::core::identity::LogId;
use crate::core::store::StoreError;

#[derive(clap::Args, Debug)]
pub struct UndoArgs {
    /// Log entry id to undo (default: the most recent undoable one)
    pub log_id: Option<String>,

    /// List undoable entries instead of undoing
    #[arg(long, short = 'l')]
    pub list: bool,
}

pub fn run(args: UndoArgs, global: &GlobalOpts) -> Result<()> {
    let (mut store, _) = open_store(global)?;

    if args.list {
        let undoable: Vec<_> = store
            .oplog()
            .entries()
            .iter()
            .filter(|e| e.is_undoable_now())
            .collect();
        if undoable.is_empty() {
            println!("Nothing to undo.");
            return Ok(());
        }
        for entry in undoable {
            println!("{}  {}", entry.id, truncate_str(&entry.action, 60));
        }
        return Ok(());
    }

    let result = match &args.log_id {
        Some(raw) => store.undo(&LogId::from(raw.as_str())),
        None => store.quick_undo(),
    };

    match result {
        Ok(action) => {
            print_store_warnings(&mut store, global);
            println!("{} Undid: {}", style("✓").green(), action);
            Ok(())
        }
        Err(StoreError::NothingToUndo) => {
            println!("Nothing to undo.");
            Ok(())
        }
        Err(e) => Err(miette::miette!("{}", e)),
    }
}
