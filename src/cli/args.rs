//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    cat::CatCommands,
    completions::CompletionsArgs,
    data::DataCommands,
    doctor::DoctorArgs,
    init::InitArgs,
    item::ItemCommands,
    log::LogCommands,
    stats::StatsArgs,
    undo::UndoArgs,
};

#[derive(Parser)]
#[command(name = "packlist")]
#[command(author, version, about = "Packlist Toolkit")]
#[command(long_about = "A CLI for managing outdoor gear checklists as local JSON stores with operation history and undo.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Workspace root (default: auto-detect by finding .packlist/)
    #[arg(long, global = true)]
    pub workspace: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new packlist workspace
    Init(InitArgs),

    /// Category management
    #[command(subcommand)]
    Cat(CatCommands),

    /// Item management
    #[command(subcommand)]
    Item(ItemCommands),

    /// Show checklist totals (items, weight, price)
    Stats(StatsArgs),

    /// Operation log management
    #[command(subcommand)]
    Log(LogCommands),

    /// Undo a logged operation (most recent by default)
    Undo(UndoArgs),

    /// Import, export, or clear the whole checklist
    #[command(subcommand)]
    Data(DataCommands),

    /// Re-apply index and duplicate-id repairs across all categories
    Doctor(DoctorArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (tsv for list commands)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// Just IDs, one per line
    Id,
}
