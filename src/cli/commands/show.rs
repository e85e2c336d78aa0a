//! `irt show` command - display one incident

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{open_store, style_severity, style_status};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::export::format_timestamp;
use crate::core::shortid::{resolve_reference, ShortIdIndex};
use crate::entities::incident::Incident;

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Incident id, unique id prefix, or short id (@N)
    pub id: String,

    /// Output format (yaml, json, or a readable summary by default)
    #[arg(long, short = 'o', value_enum, default_value_t = OutputFormat::Auto)]
    pub format: OutputFormat,
}

pub fn run(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let (_config, store) = open_store(global);
    let incidents = store.load()?;
    let short_ids = ShortIdIndex::load(store.path());

    let id = resolve_reference(&args.id, &short_ids, &incidents)?;
    let incident = store.get(&id)?;

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&incident).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&incident).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Id => println!("{}", incident.id),
        _ => print_details(&incident, &short_ids),
    }

    Ok(())
}

fn print_details(incident: &Incident, short_ids: &ShortIdIndex) {
    let short = short_ids.display_for(&incident.id);
    println!("{} {}", style(&incident.id).cyan().bold(), style(short).dim());
    println!("{}", style(&incident.title).bold());
    println!();
    println!("  {:<10} {}", style("Category").dim(), incident.category);
    println!("  {:<10} {}", style("Severity").dim(), style_severity(incident.severity));
    println!("  {:<10} {}", style("Phase").dim(), style(incident.phase).yellow());
    println!("  {:<10} {}", style("Status").dim(), style_status(incident.status));
    println!(
        "  {:<10} {}",
        style("Owner").dim(),
        incident.owner.as_deref().unwrap_or("-")
    );
    println!("  {:<10} {}", style("Created").dim(), format_timestamp(&incident.created_at));
    println!("  {:<10} {}", style("Updated").dim(), format_timestamp(&incident.updated_at));

    if let Some(notes) = &incident.notes {
        println!();
        println!("{}", style("Notes").dim());
        for line in notes.lines() {
            println!("  {}", line);
        }
    }
}
