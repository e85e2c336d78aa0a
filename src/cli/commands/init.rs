//! `irt init` command - create an empty incident store

use console::style;
use miette::Result;

use crate::cli::helpers::open_store;
use crate::cli::GlobalOpts;
use crate::core::store::InitOutcome;

#[derive(clap::Args, Debug)]
pub struct InitArgs {}

pub fn run(_args: InitArgs, global: &GlobalOpts) -> Result<()> {
    let (_config, store) = open_store(global);

    match store.init()? {
        InitOutcome::Created => {
            println!(
                "{} Initialized empty incident store at {}",
                style("✓").green(),
                style(store.path().display()).cyan()
            );
            if !global.quiet {
                println!();
                println!("Next steps:");
                println!(
                    "  {} Record your first incident",
                    style("irt add \"Suspicious login\" --severity high").yellow()
                );
                println!("  {} Load demonstration data", style("irt seed").yellow());
            }
        }
        InitOutcome::AlreadyInitialized => {
            let count = store.load()?.len();
            println!(
                "{} Incident store already initialized at {} ({} incident(s) kept)",
                style("!").yellow(),
                style(store.path().display()).cyan(),
                count
            );
        }
    }

    Ok(())
}
