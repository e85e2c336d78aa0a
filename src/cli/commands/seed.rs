//! `irt seed` command - load a demonstration set of incidents

use console::style;
use miette::Result;

use crate::cli::helpers::open_store;
use crate::cli::GlobalOpts;
use crate::core::shortid::ShortIdIndex;
use crate::entities::incident::IncidentDraft;

#[derive(clap::Args, Debug)]
pub struct SeedArgs {}

/// The fixed demonstration set, one incident per common category
pub fn demo_drafts() -> Vec<IncidentDraft> {
    vec![
        IncidentDraft::new("Phishing email reported")
            .with_category("phishing")
            .with_severity("medium")
            .with_phase("detect")
            .with_owner("SOC Tier 1")
            .with_notes("User forwarded a credential-harvesting email to the abuse mailbox."),
        IncidentDraft::new("Ransomware beacon on finance workstation")
            .with_category("malware")
            .with_severity("critical")
            .with_phase("contain")
            .with_owner("IR Team")
            .with_notes("EDR flagged outbound C2 traffic; host isolated from the network."),
        IncidentDraft::new("Brute-force logins against VPN gateway")
            .with_category("unauthorized_access")
            .with_severity("high")
            .with_phase("detect")
            .with_owner("Network Security"),
        IncidentDraft::new("Customer list shared to personal cloud drive")
            .with_category("data_leak")
            .with_severity("high")
            .with_phase("eradicate")
            .with_owner("Privacy Office")
            .with_notes("Share link revoked; awaiting confirmation of deletion."),
        IncidentDraft::new("SYN flood on public web tier")
            .with_category("denial_of_service")
            .with_severity("medium")
            .with_phase("recover")
            .with_owner("Platform SRE"),
        IncidentDraft::new("Tabletop exercise findings")
            .with_category("other")
            .with_severity("low")
            .with_phase("lessons_learned"),
    ]
}

pub fn run(_args: SeedArgs, global: &GlobalOpts) -> Result<()> {
    let (_config, store) = open_store(global);

    let created = store.create_all(&demo_drafts())?;

    let mut short_ids = ShortIdIndex::load(store.path());
    for incident in &created {
        short_ids.add(incident.id.to_string());
    }
    short_ids.save(store.path());

    println!(
        "{} Seeded {} incidents into {}",
        style("✓").green(),
        style(created.len()).cyan(),
        style(store.path().display()).cyan()
    );

    Ok(())
}
