//! `packlist doctor` command - re-apply index and duplicate-id repairs

use console::style;
use miette::Result;

use crate::cli::commands::{open_store, print_report};
use crate::cli::GlobalOpts;

#[derive(clap::Args, Debug)]
pub struct DoctorArgs {}

pub fn run(_args: DoctorArgs, global: &GlobalOpts) -> Result<()> {
    let (mut store, _) = open_store(global)?;

    let report = store.repair_all().map_err(|e| miette::miette!("{}", e))?;
    print_report(&report, global);

    if report.repaired() {
        println!(
            "{} Repaired checklist: {} categor(ies) re-indexed, {} duplicate id(s) fixed",
            style("✓").green(),
            report.reindexed_categories,
            report.duplicate_ids_fixed
        );
    } else {
        println!("{} No repairs needed", style("✓").green());
    }
    Ok(())
}
