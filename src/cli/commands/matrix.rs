//! `mrt matrix` command - the severity x probability matrix

use console::style;
use miette::Result;

use crate::cli::output::{is_structured, print_structured};
use crate::cli::table::{render_table, styled_band};
use crate::cli::GlobalOpts;
use crate::core::matrix::{evaluate, matrix_rows, ProbabilityLevel, SeverityLevel};

#[derive(clap::Args, Debug)]
pub struct MatrixArgs {
    /// Severity (Catastrophic, Serious, Moderate, Minor)
    #[arg(requires = "probability")]
    pub severity: Option<SeverityLevel>,

    /// Probability (Very Likely, Likely, Unlikely, Remote)
    pub probability: Option<ProbabilityLevel>,
}

pub fn run(args: MatrixArgs, global: &GlobalOpts) -> Result<()> {
    if let (Some(severity), Some(probability)) = (args.severity, args.probability) {
        let band = evaluate(severity, probability);
        if is_structured(global.output) {
            let output = serde_json::json!({
                "severity": severity,
                "probability": probability,
                "risk": band,
            });
            return print_structured(global.output, &output);
        }
        println!("{} / {}: {}", severity, probability, styled_band(band));
        return Ok(());
    }

    let rows: Vec<Vec<String>> = matrix_rows()
        .into_iter()
        .map(|(severity, bands)| {
            std::iter::once(severity.label().to_string())
                .chain(bands.iter().map(|b| b.label().to_string()))
                .collect()
        })
        .collect();

    if is_structured(global.output) {
        return print_structured(global.output, &rows);
    }

    let mut headers = vec!["Severity \\ Probability"];
    headers.extend(ProbabilityLevel::ALL.iter().map(|p| p.label()));
    println!("{}", style("ANSI B11.0 (TR3) two-factor risk matrix").bold());
    println!("{}", render_table(&headers, &rows));
    Ok(())
}
