//! `mrt hazard` command - hazards identified for a task

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::{confirm, load_document, print_saved, save_document};
use crate::cli::GlobalOpts;
use crate::core::catalog::{find_template, hazards_for, CategoryView, HazardTemplate};
use crate::entities::HazardRecord;

#[derive(Subcommand, Debug)]
pub enum HazardCommands {
    /// Add a hazard to a task
    Add {
        role: String,
        task: String,

        /// Hazard as "name - cause", or just the name when --cause is given
        hazard: String,

        /// Cause / failure mode
        #[arg(long)]
        cause: Option<String>,
    },

    /// Add hazards from the catalog
    Pick {
        role: String,
        task: String,

        /// Catalog hazard names
        names: Vec<String>,

        /// Catalog category ("all" searches every category)
        #[arg(long, short = 'c', default_value = "all")]
        category: CategoryView,

        /// Add every hazard of the category
        #[arg(long, conflicts_with = "names")]
        all: bool,
    },

    /// Remove a hazard from a task
    Rm {
        role: String,
        task: String,

        /// Hazard as "name - cause"
        hazard: String,

        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

fn record_from_args(hazard: &str, cause: Option<String>) -> HazardRecord {
    match cause {
        Some(cause) => HazardRecord::new(hazard.trim(), cause.trim()),
        None => HazardRecord::from_text(hazard.trim()),
    }
}

pub fn run(cmd: HazardCommands, global: &GlobalOpts) -> Result<()> {
    let (path, mut doc) = load_document(global)?;

    match cmd {
        HazardCommands::Add {
            role,
            task,
            hazard,
            cause,
        } => {
            let record = record_from_args(&hazard, cause);
            let text = record.text();
            if doc.add_hazard(&role, &task, record)? {
                println!("{} Added hazard {}", style("✓").green(), style(text).cyan());
            } else {
                println!("{} Hazard already listed for {} / {}", style("!").yellow(), role, task);
                return Ok(());
            }
        }
        HazardCommands::Pick {
            role,
            task,
            names,
            category,
            all,
        } => {
            let templates: Vec<HazardTemplate> = if all {
                hazards_for(category)
            } else {
                if names.is_empty() {
                    return Err(miette::miette!(
                        help = "list names with `mrt catalog list`",
                        "Give hazard names or --all"
                    ));
                }
                names
                    .iter()
                    .map(|name| {
                        find_template(category, name).ok_or_else(|| {
                            miette::miette!("'{}' is not in the {} catalog", name, category.label())
                        })
                    })
                    .collect::<Result<_>>()?
            };
            let added = doc.add_catalog_hazards(&role, &task, &templates)?;
            println!(
                "{} Added {} of {} catalog hazard(s) to {} / {}",
                style("✓").green(),
                added,
                templates.len(),
                role,
                task
            );
        }
        HazardCommands::Rm {
            role,
            task,
            hazard,
            yes,
        } => {
            let record = HazardRecord::from_text(hazard.trim());
            if !confirm(&format!("Remove hazard '{}'?", record.text()), yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            doc.remove_hazard(&role, &task, &record)?;
            println!("{} Removed hazard {}", style("✓").green(), record.text());
        }
    }

    save_document(&path, &doc)?;
    print_saved(&path);
    Ok(())
}
