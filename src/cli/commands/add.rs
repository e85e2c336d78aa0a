//! `irt add` command - record a new incident

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{open_store, style_severity};
use crate::cli::GlobalOpts;
use crate::core::shortid::ShortIdIndex;
use crate::entities::incident::{Category, IncidentDraft, Phase, Severity, Tag};

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Incident title (prompted for when omitted)
    pub title: Option<String>,

    /// Category (phishing, malware, unauthorized_access, data_leak, denial_of_service, other, or any tag)
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Severity (low, medium, high, critical) [default: medium]
    #[arg(long, short = 'S')]
    pub severity: Option<String>,

    /// Lifecycle phase [default: detect]
    #[arg(long, short = 'p')]
    pub phase: Option<String>,

    /// Person or team handling it
    #[arg(long, short = 'O')]
    pub owner: Option<String>,

    /// Free-form notes
    #[arg(long, short = 'n')]
    pub notes: Option<String>,

    /// Interactive mode (prompt for fields)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

pub fn run(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let (config, store) = open_store(global);

    // Fail before prompting if there is nowhere to put the incident
    store.load()?;

    let mut draft = if args.interactive || args.title.is_none() {
        prompt_draft(&args)?
    } else {
        IncidentDraft {
            title: args.title.clone().unwrap_or_default(),
            category: args.category.clone(),
            severity: args.severity.clone(),
            phase: args.phase.clone(),
            owner: args.owner.clone(),
            notes: args.notes.clone(),
        }
    };

    if draft.owner.is_none() {
        draft.owner = config.default_owner.clone();
    }

    let incident = store.create(&draft)?;

    let mut short_ids = ShortIdIndex::load(store.path());
    let short_id = short_ids.add(incident.id.to_string());
    short_ids.save(store.path());

    if global.quiet {
        println!("{}", incident.id);
        return Ok(());
    }

    println!(
        "{} Added incident {} {}",
        style("✓").green(),
        style(&incident.id).cyan(),
        style(format!("(@{})", short_id)).dim()
    );
    println!(
        "   {} | {} | {} | {}",
        style_severity(incident.severity),
        style(incident.phase).yellow(),
        incident.status,
        style(&incident.title).white()
    );

    Ok(())
}

/// Index of the supplied value in `T::ALL`, or of the default when absent
fn select_default<T: Tag + Default + PartialEq>(supplied: Option<&str>) -> crate::core::Result<usize> {
    let selected = supplied.map(T::parse_field).transpose()?.unwrap_or_default();
    Ok(T::ALL.iter().position(|t| *t == selected).unwrap_or(0))
}

fn prompt_draft(args: &AddArgs) -> Result<IncidentDraft> {
    use dialoguer::{Input, Select};

    let title: String = Input::new()
        .with_prompt("Incident title")
        .with_initial_text(args.title.clone().unwrap_or_default())
        .interact_text()
        .into_diagnostic()?;

    // A custom category from the command line is kept as is
    let category = match args.category.as_deref().map(Category::parse_field).transpose()? {
        Some(custom) if custom.is_custom() => custom.to_string(),
        supplied => {
            let selected = supplied.unwrap_or_default();
            let categories: Vec<&str> = Category::KNOWN.iter().map(|c| c.as_str()).collect();
            let idx = Select::new()
                .with_prompt("Category")
                .items(&categories)
                .default(Category::KNOWN.iter().position(|c| *c == selected).unwrap_or(0))
                .interact()
                .into_diagnostic()?;
            categories[idx].to_string()
        }
    };

    let severities: Vec<&str> = Severity::ALL.iter().map(|s| s.as_str()).collect();
    let severity_idx = Select::new()
        .with_prompt("Severity")
        .items(&severities)
        .default(select_default::<Severity>(args.severity.as_deref())?)
        .interact()
        .into_diagnostic()?;

    let phases: Vec<&str> = Phase::ALL.iter().map(|p| p.as_str()).collect();
    let phase_idx = Select::new()
        .with_prompt("Phase")
        .items(&phases)
        .default(select_default::<Phase>(args.phase.as_deref())?)
        .interact()
        .into_diagnostic()?;

    let owner: String = Input::new()
        .with_prompt("Owner (optional)")
        .with_initial_text(args.owner.clone().unwrap_or_default())
        .allow_empty(true)
        .interact_text()
        .into_diagnostic()?;

    Ok(IncidentDraft {
        title,
        category: Some(category),
        severity: Some(severities[severity_idx].to_string()),
        phase: Some(phases[phase_idx].to_string()),
        owner: Some(owner).filter(|o| !o.trim().is_empty()),
        notes: args.notes.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TrackerError;

    #[test]
    fn test_select_default_uses_supplied_value() {
        assert_eq!(select_default::<Severity>(Some("critical")).unwrap(), 3);
        assert_eq!(select_default::<Phase>(Some("respond")).unwrap(), 2);
        assert_eq!(select_default::<Phase>(Some("Lessons Learned")).unwrap(), 5);
    }

    #[test]
    fn test_select_default_falls_back_to_tag_default() {
        assert_eq!(select_default::<Severity>(None).unwrap(), 1);
        assert_eq!(select_default::<Phase>(None).unwrap(), 1);
    }

    #[test]
    fn test_select_default_rejects_unknown_value() {
        let err = select_default::<Severity>(Some("urgent")).unwrap_err();
        assert!(matches!(err, TrackerError::InvalidField { name: "severity", .. }));
    }
}
