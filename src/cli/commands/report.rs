//! `mrt report` command - export the assessment

use clap::ValueEnum;
use console::style;
use miette::Result;
use std::path::{Path, PathBuf};

use crate::cli::helpers::load_document;
use crate::cli::GlobalOpts;
use crate::core::Config;
use crate::report::{export_csv, write_atomic, ReportFormat, ReportGenerator, ReportMeta};

#[derive(clap::Args, Debug)]
pub struct ReportArgs {
    /// Output file
    #[arg(id = "report_output", value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Report format [default: from the output extension, else html]
    #[arg(long, value_enum)]
    pub format: Option<ExportFormat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Print-ready HTML, one table per page
    Html,
    Markdown,
    /// Risk assessment table only
    Csv,
}

impl ExportFormat {
    fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "html" | "htm" => Some(ExportFormat::Html),
            "md" | "markdown" => Some(ExportFormat::Markdown),
            "csv" => Some(ExportFormat::Csv),
            _ => None,
        }
    }
}

pub fn run(args: ReportArgs, global: &GlobalOpts) -> Result<()> {
    let (_, doc) = load_document(global)?;
    let format = args
        .format
        .or_else(|| ExportFormat::from_path(&args.output))
        .unwrap_or(ExportFormat::Html);

    let bytes = match format {
        ExportFormat::Csv => export_csv(&doc)?,
        ExportFormat::Html | ExportFormat::Markdown => {
            let report_format = if format == ExportFormat::Html {
                ReportFormat::Html
            } else {
                ReportFormat::Markdown
            };
            let meta = ReportMeta::new(&doc, &Config::load());
            let generator = ReportGenerator::new()?;
            generator.render(&doc, report_format, &meta)?.into_bytes()
        }
    };

    write_atomic(&args.output, &bytes)?;
    println!(
        "{} Report written to {}",
        style("✓").green(),
        style(args.output.display()).cyan()
    );
    Ok(())
}
