//! List output for tables and TSV

use console::style;
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::OutputFormat;
use crate::core::matrix::RiskBand;

/// Rows of one listing, plus the serializable records behind them
pub struct Listing<'a, T: Serialize> {
    pub headers: &'a [&'a str],
    pub rows: Vec<Vec<String>>,
    pub records: &'a [T],
    /// Printed instead of an empty table
    pub empty_text: &'a str,
}

impl<T: Serialize> Listing<'_, T> {
    pub fn print(&self, format: OutputFormat) -> miette::Result<()> {
        use miette::IntoDiagnostic;

        match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(self.records).into_diagnostic()?);
            }
            OutputFormat::Yaml => {
                print!("{}", serde_yml::to_string(self.records).into_diagnostic()?);
            }
            OutputFormat::Tsv => {
                println!("{}", self.headers.join("\t"));
                for row in &self.rows {
                    let cells: Vec<String> = row.iter().map(|c| tsv_cell(c)).collect();
                    println!("{}", cells.join("\t"));
                }
            }
            OutputFormat::Auto | OutputFormat::Table => {
                if self.rows.is_empty() {
                    println!("{}", self.empty_text);
                } else {
                    println!("{}", render_table(self.headers, &self.rows));
                }
            }
        }
        Ok(())
    }
}

fn tsv_cell(s: &str) -> String {
    s.replace(['\t', '\n'], " ")
}

pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut builder = Builder::default();
    builder.push_record(headers.iter().copied());
    for row in rows {
        builder.push_record(row.iter().cloned());
    }
    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

/// Risk level colored for terminals
pub fn styled_band(band: RiskBand) -> String {
    match band {
        RiskBand::High => style(band.label()).red().bold().to_string(),
        RiskBand::Medium => style(band.label()).yellow().to_string(),
        RiskBand::Low => style(band.label()).green().to_string(),
    }
}
