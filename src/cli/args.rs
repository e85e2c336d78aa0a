//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    add::AddArgs, completions::CompletionsArgs, export::ExportArgs, init::InitArgs,
    list::ListArgs, seed::SeedArgs, show::ShowArgs, stats::StatsArgs, update::UpdateArgs,
};
use crate::core::query::FilterCriteria;

#[derive(Parser)]
#[command(name = "irt")]
#[command(author, version, about = "Incident Response Tracker")]
#[command(long_about = "Track security incidents through the NIST SP 800-61 incident-handling lifecycle in a local YAML file.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Incident store file (default: ./incidents.yaml or `store` from config)
    #[arg(long, short = 's', global = true, env = "IRT_STORE")]
    pub store: Option<PathBuf>,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable verbose output (debug logging on stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty incident store (keeps an existing one)
    Init(InitArgs),

    /// Record a new incident
    Add(AddArgs),

    /// List incidents, optionally filtered
    List(ListArgs),

    /// Show one incident
    Show(ShowArgs),

    /// Change fields of an incident
    Update(UpdateArgs),

    /// Export incidents to CSV
    Export(ExportArgs),

    /// Counts by phase, severity and status
    Stats(StatsArgs),

    /// Insert a demonstration set of incidents
    Seed(SeedArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Filters shared by `list`, `export` and `stats`
#[derive(clap::Args, Clone, Debug, Default)]
pub struct FilterArgs {
    /// Only this lifecycle phase (detect, respond/contain, eradicate, ...)
    #[arg(long, short = 'p')]
    pub phase: Option<String>,

    /// Only this severity (low, medium, high, critical)
    #[arg(long, short = 'S')]
    pub severity: Option<String>,

    /// Only this status (open, in_progress, contained, resolved, closed)
    #[arg(long)]
    pub status: Option<String>,

    /// Only this category
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Owner contains this text (case-insensitive)
    #[arg(long, short = 'O')]
    pub owner: Option<String>,
}

impl FilterArgs {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            phase: self.phase.clone(),
            severity: self.severity.clone(),
            status: self.status.clone(),
            category: self.category.clone(),
            owner: self.owner.clone(),
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pick per command (table for listings)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Aligned columns, one record per line
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (same columns as `irt export`)
    Csv,
    /// Markdown tables
    Md,
    /// Just ids, one per line
    Id,
}
