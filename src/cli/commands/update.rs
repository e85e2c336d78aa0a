//! `irt update` command - partial update of one incident

use console::style;
use miette::Result;

use crate::cli::helpers::{open_store, style_severity, style_status};
use crate::cli::GlobalOpts;
use crate::core::shortid::{resolve_reference, ShortIdIndex};
use crate::core::TrackerError;
use crate::entities::incident::{IncidentChanges, RawChanges};

#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    /// Incident id, unique id prefix, or short id (@N)
    pub id: String,

    /// New title
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// New category
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// New severity (low, medium, high, critical)
    #[arg(long, short = 'S')]
    pub severity: Option<String>,

    /// New lifecycle phase
    #[arg(long, short = 'p')]
    pub phase: Option<String>,

    /// New status (open, in_progress, contained, resolved, closed)
    #[arg(long)]
    pub status: Option<String>,

    /// New owner (empty string clears it)
    #[arg(long, short = 'O')]
    pub owner: Option<String>,

    /// Append a line to the notes
    #[arg(long, short = 'n', conflicts_with = "replace_notes")]
    pub notes: Option<String>,

    /// Replace the notes (empty string clears them)
    #[arg(long)]
    pub replace_notes: Option<String>,
}

impl UpdateArgs {
    fn raw_changes(&self) -> RawChanges {
        RawChanges {
            title: self.title.clone(),
            category: self.category.clone(),
            severity: self.severity.clone(),
            phase: self.phase.clone(),
            status: self.status.clone(),
            owner: self.owner.clone(),
            append_notes: self.notes.clone(),
            replace_notes: self.replace_notes.clone(),
        }
    }
}

pub fn run(args: UpdateArgs, global: &GlobalOpts) -> Result<()> {
    let (_config, store) = open_store(global);

    let changes = IncidentChanges::parse(&args.raw_changes())?;
    if changes.is_empty() {
        return Err(TrackerError::NoChanges.into());
    }

    let incidents = store.load()?;
    let short_ids = ShortIdIndex::load(store.path());
    let id = resolve_reference(&args.id, &short_ids, &incidents)?;

    let updated = store.find_and_update(&id, &changes)?;

    if global.quiet {
        return Ok(());
    }

    println!(
        "{} Updated incident {} {}",
        style("✓").green(),
        style(&updated.id).cyan(),
        style(short_ids.display_for(&updated.id)).dim()
    );
    println!(
        "   {} | {} | {} | {}",
        style_severity(updated.severity),
        style(updated.phase).yellow(),
        style_status(updated.status),
        style(&updated.title).white()
    );

    Ok(())
}
