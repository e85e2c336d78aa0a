//! `irt stats` command - counts by phase, severity and status

use std::collections::BTreeMap;
use std::fmt::Display;

use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::open_store;
use crate::cli::{FilterArgs, GlobalOpts, OutputFormat};
use crate::core::query::{self, IncidentFilter};
use crate::core::stats::{summarize, Summary};

#[derive(clap::Args, Debug)]
pub struct StatsArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Output format (tsv, md, json, yaml)
    #[arg(long, short = 'o', value_enum, default_value_t = OutputFormat::Auto)]
    pub format: OutputFormat,
}

pub fn run(args: StatsArgs, global: &GlobalOpts) -> Result<()> {
    let (_config, store) = open_store(global);

    let criteria = IncidentFilter::from_criteria(&args.filter.criteria())?;
    let incidents = store.load()?;
    let summary = summarize(query::filter(&incidents, &criteria));

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&summary).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&summary).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Auto | OutputFormat::Tsv => print_tables(&summary, false),
        OutputFormat::Md => print_tables(&summary, true),
        OutputFormat::Csv | OutputFormat::Id => {
            miette::bail!(
                help = "use tsv, md, json or yaml",
                "stats has no {:?} output",
                args.format
            );
        }
    }

    Ok(())
}

fn count_table<K: Display>(heading: &str, counts: &BTreeMap<K, usize>, markdown: bool) -> String {
    let mut builder = Builder::default();
    builder.push_record([heading.to_string(), "Count".to_string()]);
    for (key, count) in counts {
        builder.push_record([key.to_string(), count.to_string()]);
    }
    let mut table = builder.build();
    if markdown {
        table.with(Style::markdown());
    } else {
        table.with(Style::rounded());
    }
    table.to_string()
}

fn print_tables(summary: &Summary, markdown: bool) {
    println!("{}", count_table("Phase", &summary.by_phase, markdown));
    println!();
    println!("{}", count_table("Severity", &summary.by_severity, markdown));
    println!();
    println!("{}", count_table("Status", &summary.by_status, markdown));
    if !summary.by_category.is_empty() {
        println!();
        println!("{}", count_table("Category", &summary.by_category, markdown));
    }

    println!();
    if summary.is_empty() {
        println!("{} total, no incidents match", style(summary.total).cyan().bold());
        return;
    }
    println!(
        "{} total, {} open ({:.1}%), {} closed",
        style(summary.total).cyan().bold(),
        style(summary.open_count).yellow(),
        summary.open_pct(),
        style(summary.closed_count).green()
    );
}
