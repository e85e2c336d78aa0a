//! `irt export` command - write incidents to a CSV file

use std::path::PathBuf;

use console::style;
use miette::Result;

use crate::cli::helpers::open_store;
use crate::cli::{FilterArgs, GlobalOpts};
use crate::core::export::write_csv;
use crate::core::query::{self, IncidentFilter};

/// Default export file, relative to the working directory
pub const DEFAULT_EXPORT_FILE: &str = "incidents_export.csv";

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Destination file (replaced if it exists)
    #[arg(long, short = 'o', default_value = DEFAULT_EXPORT_FILE)]
    pub output: PathBuf,

    #[command(flatten)]
    pub filter: FilterArgs,
}

pub fn run(args: ExportArgs, global: &GlobalOpts) -> Result<()> {
    let (_config, store) = open_store(global);

    let criteria = IncidentFilter::from_criteria(&args.filter.criteria())?;
    let incidents = store.load()?;
    let rows = query::filter(&incidents, &criteria);

    let written = write_csv(&args.output, rows)?;
    tracing::debug!(path = %args.output.display(), rows = written, "wrote export");

    if global.quiet {
        return Ok(());
    }

    println!(
        "{} Exported {} incident(s) to {}",
        style("✓").green(),
        style(written).cyan(),
        style(args.output.display()).cyan()
    );

    Ok(())
}
