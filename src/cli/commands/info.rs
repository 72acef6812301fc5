//! `mrt info` command - project information

use console::style;
use miette::Result;

use crate::cli::helpers::{load_document, print_saved, save_document};
use crate::cli::output::{is_structured, print_structured};
use crate::cli::GlobalOpts;

#[derive(clap::Args, Debug)]
pub struct InfoArgs {
    /// Set the assessment name
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub company: Option<String>,

    #[arg(long)]
    pub facility: Option<String>,

    #[arg(long)]
    pub machine_id: Option<String>,

    #[arg(long)]
    pub stage: Option<String>,
}

impl InfoArgs {
    fn has_updates(&self) -> bool {
        self.name.is_some()
            || self.description.is_some()
            || self.company.is_some()
            || self.facility.is_some()
            || self.machine_id.is_some()
            || self.stage.is_some()
    }
}

pub fn run(args: InfoArgs, global: &GlobalOpts) -> Result<()> {
    let (path, mut doc) = load_document(global)?;

    if args.has_updates() {
        let info = &mut doc.project_info;
        let updates = [
            (&mut info.name, args.name),
            (&mut info.description, args.description),
            (&mut info.company, args.company),
            (&mut info.facility, args.facility),
            (&mut info.machine_id, args.machine_id),
            (&mut info.lifecycle_stage, args.stage),
        ];
        for (field, value) in updates {
            if let Some(value) = value {
                *field = value;
            }
        }
        save_document(&path, &doc)?;
        print_saved(&path);
    }

    if is_structured(global.output) {
        return print_structured(global.output, &doc.project_info);
    }

    let info = &doc.project_info;
    let rows = [
        ("Application", info.name.as_str()),
        ("Description", info.description.as_str()),
        ("Company", info.company.as_str()),
        ("Facility", info.facility.as_str()),
        ("Machine ID", info.machine_id.as_str()),
        ("Lifecycle Stage", info.lifecycle_stage.as_str()),
    ];
    for (label, value) in rows {
        let label = format!("{:<17}", format!("{}:", label));
        println!("{}{}", style(label).bold(), value);
    }

    let tasks: usize = doc.users.iter().map(|u| u.tasks.len()).sum();
    println!(
        "\n{} roles, {} tasks, {} hazards, {} risk entries, {} control rows, {} alternative methods",
        doc.users.len(),
        tasks,
        doc.hazard_refs().len(),
        doc.risk_entries.len(),
        doc.control_entries.len(),
        doc.alt_method_entries.len()
    );
    Ok(())
}
