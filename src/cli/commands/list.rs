//! `irt list` command - filtered incident listing

use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{first_line, open_store, style_severity, style_status, truncate_str};
use crate::cli::{FilterArgs, GlobalOpts, OutputFormat};
use crate::core::export::to_csv;
use crate::core::query::{self, IncidentFilter, SortKey};
use crate::core::shortid::ShortIdIndex;
use crate::entities::incident::Incident;

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Sort by field (default: insertion order)
    #[arg(long)]
    pub sort: Option<SortKey>,

    /// Reverse the order
    #[arg(long, short = 'r')]
    pub reverse: bool,

    /// Show at most N incidents
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show only the count
    #[arg(long)]
    pub count: bool,

    /// Output format
    #[arg(long, short = 'o', value_enum, default_value_t = OutputFormat::Auto)]
    pub format: OutputFormat,
}

pub fn run(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let (_config, store) = open_store(global);

    let criteria = IncidentFilter::from_criteria(&args.filter.criteria())?;
    let incidents = store.load()?;

    let mut rows = query::filter(&incidents, &criteria);
    match args.sort {
        Some(key) => query::sort(&mut rows, key, args.reverse),
        None if args.reverse => rows.reverse(),
        None => {}
    }
    if let Some(limit) = args.limit {
        rows.truncate(limit);
    }

    if args.count {
        println!("{}", rows.len());
        return Ok(());
    }

    if rows.is_empty() {
        match args.format {
            OutputFormat::Json | OutputFormat::Yaml => println!("[]"),
            OutputFormat::Csv => print!("{}", to_csv(rows.iter().copied())?),
            OutputFormat::Id => {}
            _ => println!("No incidents found."),
        }
        return Ok(());
    }

    let mut short_ids = ShortIdIndex::load(store.path());
    short_ids.rebuild(rows.iter().map(|i| i.id.to_string()));
    short_ids.save(store.path());

    let format = if args.format == OutputFormat::Auto {
        OutputFormat::Tsv
    } else {
        args.format
    };

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&rows).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&rows).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Csv => {
            print!("{}", to_csv(rows.iter().copied())?);
        }
        OutputFormat::Tsv => print_table(&rows, &short_ids, global.quiet),
        OutputFormat::Id => {
            for incident in &rows {
                println!("{}", incident.id);
            }
        }
        OutputFormat::Md => {
            let mut builder = Builder::default();
            builder.push_record(["Short", "ID", "Title", "Category", "Severity", "Phase", "Status", "Owner"]);
            for incident in &rows {
                builder.push_record([
                    short_ids.display_for(&incident.id),
                    incident.id.to_string(),
                    first_line(&incident.title).to_string(),
                    incident.category.to_string(),
                    incident.severity.to_string(),
                    incident.phase.to_string(),
                    incident.status.to_string(),
                    incident.owner.clone().unwrap_or_default(),
                ]);
            }
            println!("{}", builder.build().with(Style::markdown()));
        }
        OutputFormat::Auto => unreachable!(),
    }

    Ok(())
}

fn print_table(rows: &[&Incident], short_ids: &ShortIdIndex, quiet: bool) {
    println!(
        "{:<6} {:<30} {:<30} {:<20} {:<9} {:<16} {:<12} {:<16}",
        style("SHORT").bold().dim(),
        style("ID").bold(),
        style("TITLE").bold(),
        style("CATEGORY").bold(),
        style("SEVERITY").bold(),
        style("PHASE").bold(),
        style("STATUS").bold(),
        style("OWNER").bold()
    );
    println!("{}", "-".repeat(145));

    for incident in rows {
        println!(
            "{:<6} {:<30} {:<30} {:<20} {:<9} {:<16} {:<12} {:<16}",
            style(short_ids.display_for(&incident.id)).cyan(),
            incident.id,
            truncate_str(first_line(&incident.title), 28),
            truncate_str(incident.category.as_str(), 20),
            style_severity(incident.severity),
            incident.phase,
            style_status(incident.status),
            truncate_str(incident.owner.as_deref().unwrap_or("-"), 16)
        );
    }

    if !quiet {
        println!();
        println!(
            "{} incident(s) found. Use {} to reference by short ID.",
            style(rows.len()).cyan(),
            style("@N").cyan()
        );
    }
}
