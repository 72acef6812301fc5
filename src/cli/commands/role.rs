//! `mrt role` command - users/roles of the machine

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::{confirm, load_document, print_saved, save_document};
use crate::cli::output::effective_format;
use crate::cli::table::Listing;
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(Subcommand, Debug)]
pub enum RoleCommands {
    /// Add a user/role
    Add {
        /// Role name (e.g. "Operator")
        name: String,
    },

    /// Rename a user/role
    Rename { old: String, new: String },

    /// Remove a user/role with all its tasks and hazards
    Rm {
        name: String,

        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Show the role/task/hazard tree
    List,
}

pub fn run(cmd: RoleCommands, global: &GlobalOpts) -> Result<()> {
    let (path, mut doc) = load_document(global)?;

    match cmd {
        RoleCommands::Add { name } => {
            doc.add_role(&name)?;
            println!("{} Added role {}", style("✓").green(), style(name.trim()).cyan());
        }
        RoleCommands::Rename { old, new } => {
            doc.rename_role(&old, &new)?;
            println!("{} Renamed role {} to {}", style("✓").green(), old, style(new.trim()).cyan());
        }
        RoleCommands::Rm { name, yes } => {
            let hazards = doc
                .role(&name)
                .map(|r| r.hazard_count())
                .ok_or_else(|| miette::miette!("User/role not found: {}", name))?;
            let prompt = format!("Remove role '{}' and its {} hazard(s)?", name, hazards);
            if !confirm(&prompt, yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            doc.remove_role(&name)?;
            println!("{} Removed role {}", style("✓").green(), name);
            println!("Run `mrt risk refresh` to update the risk table.");
        }
        RoleCommands::List => return list(&doc, global),
    }

    save_document(&path, &doc)?;
    print_saved(&path);
    Ok(())
}

fn list(doc: &crate::core::AssessmentDocument, global: &GlobalOpts) -> Result<()> {
    match global.output {
        OutputFormat::Auto => {
            if doc.users.is_empty() {
                println!("No users/roles defined.");
            }
            for user in &doc.users {
                println!("{}", style(&user.name).bold());
                for task in &user.tasks {
                    println!("  {}", style(&task.name).cyan());
                    for hazard in &task.hazards {
                        println!("    - {}", hazard.text());
                    }
                }
            }
            Ok(())
        }
        format => {
            let refs = doc.hazard_refs();
            let rows = refs
                .iter()
                .map(|r| {
                    vec![
                        r.role.clone(),
                        r.task.clone(),
                        r.hazard.hazard_name.clone(),
                        r.hazard.cause.clone(),
                    ]
                })
                .collect();
            Listing {
                headers: &["ROLE", "TASK", "HAZARD", "CAUSE"],
                rows,
                records: &doc.users,
                empty_text: "No hazards defined.",
            }
            .print(effective_format(format, true))
        }
    }
}
