//! `mrt validate` command - alternative methods against ANSI Z244.1

use console::style;
use miette::Result;

use crate::cli::helpers::load_document;
use crate::cli::output::{is_structured, print_structured};
use crate::cli::GlobalOpts;
use crate::core::{validate_document, ValidationOutcome};

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Strict mode - warnings become errors
    #[arg(long)]
    pub strict: bool,
}

pub fn run(args: ValidateArgs, global: &GlobalOpts) -> Result<()> {
    let (_, doc) = load_document(global)?;
    let outcome = validate_document(&doc);

    if is_structured(global.output) {
        print_structured(global.output, &outcome)?;
    } else {
        match &outcome {
            ValidationOutcome::NothingToValidate => {
                println!("No alternative methods to validate.");
            }
            ValidationOutcome::Checked(report) => print!("{}", report.render()),
        }
    }

    let Some(report) = outcome.report() else {
        return Ok(());
    };

    if !report.is_compliant() {
        return Err(miette::miette!(
            help = "fix the rows listed under CRITICAL ISSUES",
            "{} critical issue(s) found",
            report.critical_issues.len()
        ));
    }
    if args.strict && !report.warnings.is_empty() {
        return Err(miette::miette!(
            "{} warning(s) found (strict mode)",
            report.warnings.len()
        ));
    }
    if !is_structured(global.output) && report.warnings.is_empty() {
        eprintln!("{} Compliant", style("✓").green());
    }
    Ok(())
}
