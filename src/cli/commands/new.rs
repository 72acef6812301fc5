//! `mrt new` command - create an assessment file

use console::style;
use dialoguer::{theme::ColorfulTheme, Input};
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{document_path, save_document};
use crate::cli::output::{is_structured, print_structured};
use crate::cli::GlobalOpts;
use crate::core::AssessmentDocument;
use crate::entities::ProjectInfo;

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Assessment (application) name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Scope of the assessment
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    #[arg(long)]
    pub company: Option<String>,

    /// Facility location
    #[arg(long)]
    pub facility: Option<String>,

    /// Machine or product identifier
    #[arg(long)]
    pub machine_id: Option<String>,

    /// Lifecycle stage (design, commissioning, modification...)
    #[arg(long)]
    pub stage: Option<String>,

    /// Use interactive wizard
    #[arg(long, short = 'i')]
    pub interactive: bool,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

fn prompt(theme: &ColorfulTheme, label: &str, initial: Option<String>) -> Result<String> {
    Input::with_theme(theme)
        .with_prompt(label)
        .with_initial_text(initial.unwrap_or_default())
        .allow_empty(true)
        .interact_text()
        .into_diagnostic()
}

pub fn run(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let path = document_path(global);
    if path.exists() && !args.force {
        return Err(miette::miette!(
            help = "use --force to overwrite",
            "{} already exists",
            path.display()
        ));
    }

    let info = if args.interactive {
        let theme = ColorfulTheme::default();
        let name: String = Input::with_theme(&theme)
            .with_prompt("Assessment name")
            .with_initial_text(args.name.unwrap_or_default())
            .interact_text()
            .into_diagnostic()?;
        ProjectInfo {
            name,
            description: prompt(&theme, "Description", args.description)?,
            company: prompt(&theme, "Company", args.company)?,
            facility: prompt(&theme, "Facility location", args.facility)?,
            machine_id: prompt(&theme, "Machine ID", args.machine_id)?,
            lifecycle_stage: prompt(&theme, "Lifecycle stage", args.stage)?,
        }
    } else {
        let name = args.name.ok_or_else(|| {
            miette::miette!("--name is required (or use --interactive for wizard mode)")
        })?;
        ProjectInfo {
            name,
            description: args.description.unwrap_or_default(),
            company: args.company.unwrap_or_default(),
            facility: args.facility.unwrap_or_default(),
            machine_id: args.machine_id.unwrap_or_default(),
            lifecycle_stage: args.stage.unwrap_or_default(),
        }
    };

    let doc = AssessmentDocument::new(info);
    save_document(&path, &doc)?;

    if is_structured(global.output) {
        let output = serde_json::json!({
            "name": doc.project_info.name,
            "path": path.display().to_string(),
        });
        print_structured(global.output, &output)?;
    } else {
        println!(
            "Created assessment {} at {}",
            style(doc.project_info.display_name()).cyan(),
            path.display()
        );
    }
    Ok(())
}
