//! `mrt task` command - tasks performed by a role

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::{confirm, load_document, print_saved, save_document};
use crate::cli::GlobalOpts;

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Add a task to a role
    Add {
        role: String,
        /// Task name (e.g. "Clear jam")
        name: String,
    },

    /// Rename a task
    Rename {
        role: String,
        old: String,
        new: String,
    },

    /// Remove a task with all its hazards
    Rm {
        role: String,
        name: String,

        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

pub fn run(cmd: TaskCommands, global: &GlobalOpts) -> Result<()> {
    let (path, mut doc) = load_document(global)?;

    match cmd {
        TaskCommands::Add { role, name } => {
            doc.add_task(&role, &name)?;
            println!(
                "{} Added task {} to {}",
                style("✓").green(),
                style(name.trim()).cyan(),
                role
            );
        }
        TaskCommands::Rename { role, old, new } => {
            doc.rename_task(&role, &old, &new)?;
            println!("{} Renamed task {} to {}", style("✓").green(), old, style(new.trim()).cyan());
        }
        TaskCommands::Rm { role, name, yes } => {
            let hazards = doc
                .task(&role, &name)
                .map(|t| t.hazards.len())
                .ok_or_else(|| miette::miette!("Task '{}' not found for '{}'", name, role))?;
            let prompt = format!("Remove task '{}' and its {} hazard(s)?", name, hazards);
            if !confirm(&prompt, yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            doc.remove_task(&role, &name)?;
            println!("{} Removed task {}", style("✓").green(), name);
            println!("Run `mrt risk refresh` to update the risk table.");
        }
    }

    save_document(&path, &doc)?;
    print_saved(&path);
    Ok(())
}
