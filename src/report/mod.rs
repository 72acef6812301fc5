//! Report export - printable HTML, Markdown and CSV
//!
//! Reports have a metadata header followed by the risk, control system and
//! alternative method tables. Templates are embedded from `templates/`; if one
//! is missing the hardcoded layout below is used instead.

use chrono::{Local, NaiveDate};
use miette::Diagnostic;
use rust_embed::Embed;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Tera, Value};
use thiserror::Error;

use crate::core::config::Config;
use crate::core::document::AssessmentDocument;
use crate::entities::risk::RiskEntry;
use crate::persist::{
    alt_method_cells, control_cells, risk_cells, PersistError, ALT_METHOD_HEADERS,
    CONTROL_HEADERS, RISK_HEADERS,
};

pub use crate::persist::write_atomic;

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

pub const DEFAULT_ASSESSMENT_TYPE: &str = "Detailed";
pub const DEFAULT_LIMITS: &str = "Risk assessment analysis";
pub const DEFAULT_SOURCES: &str =
    "Personnel experiences, ANSI B11 standards, machine documentation";
pub const DEFAULT_SCORING_SYSTEM: &str = "ANSI B11.0 (TR3) Two Factor";
pub const DEFAULT_GUIDE_SENTENCE: &str =
    "When doing [task], the [user] could be injured by the [hazard] due to the [failure mode].";

#[derive(Debug, Error, Diagnostic)]
pub enum ReportError {
    #[error("Template rendering error: {0}")]
    RenderError(String),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Write(#[from] PersistError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Html,
    Markdown,
}

impl ReportFormat {
    fn template_name(&self) -> &'static str {
        match self {
            ReportFormat::Html => "report.html.tera",
            ReportFormat::Markdown => "report.md.tera",
        }
    }
}

/// Header block of a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportMeta {
    pub application: String,
    pub description: String,
    pub product_identifier: String,
    pub assessment_type: String,
    pub limits: String,
    pub sources: String,
    pub scoring_system: String,
    pub guide_sentence: String,
    pub analyst: String,
    pub company: String,
    pub facility: String,
    pub date: String,
}

fn or_na(value: &str) -> String {
    if value.trim().is_empty() {
        "N/A".to_string()
    } else {
        value.to_string()
    }
}

impl ReportMeta {
    /// Header for `doc` dated today, with configured wording where set
    pub fn new(doc: &AssessmentDocument, config: &Config) -> Self {
        let info = &doc.project_info;
        let report = &config.report;
        let pick = |value: &Option<String>, default: &str| {
            value.clone().unwrap_or_else(|| default.to_string())
        };
        Self {
            application: or_na(&info.name),
            description: or_na(&info.description),
            product_identifier: or_na(&info.machine_id),
            assessment_type: pick(&report.assessment_type, DEFAULT_ASSESSMENT_TYPE),
            limits: pick(&report.limits, DEFAULT_LIMITS),
            sources: pick(&report.sources, DEFAULT_SOURCES),
            scoring_system: pick(&report.scoring_system, DEFAULT_SCORING_SYSTEM),
            guide_sentence: pick(&report.guide_sentence, DEFAULT_GUIDE_SENTENCE),
            analyst: config.analyst(),
            company: or_na(&info.company),
            facility: or_na(&info.facility),
            date: format_date(Local::now().date_naive()),
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = format_date(date);
        self
    }

    /// Labelled fields in print order
    pub fn fields(&self) -> Vec<MetaField> {
        [
            ("Application", &self.application),
            ("Description", &self.description),
            ("Product Identifier", &self.product_identifier),
            ("Assessment Type", &self.assessment_type),
            ("Limits", &self.limits),
            ("Sources", &self.sources),
            ("Risk Scoring System", &self.scoring_system),
            ("Guide Sentence", &self.guide_sentence),
            ("Analyst Name(s)", &self.analyst),
            ("Company", &self.company),
            ("Facility Location", &self.facility),
            ("Date", &self.date),
        ]
        .into_iter()
        .map(|(label, value)| MetaField {
            label,
            value: value.clone(),
        })
        .collect()
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct MetaField {
    pub label: &'static str,
    pub value: String,
}

/// One titled table of a report
#[derive(Debug, Clone, Serialize)]
struct ReportTable {
    title: &'static str,
    empty_text: &'static str,
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

const RISK_REPORT_HEADERS: [&str; 10] = [
    "Item Id",
    "User / Task",
    "Hazard / Failure Mode",
    "Initial Severity",
    "Initial Probability",
    "Initial Risk Level",
    "Risk Reduction Methods / Control System",
    "Final Severity",
    "Final Probability",
    "Final Risk Level",
];

/// Risk rows are condensed for print: role with task, category with hazard
fn risk_report_row(e: &RiskEntry) -> Vec<String> {
    let user_task = match (e.role.is_empty(), e.task.is_empty()) {
        (false, false) => format!("{} / {}", e.role, e.task),
        _ => format!("{}{}", e.role, e.task),
    };
    let hazard = format!("{}: {} {}", e.hazard_category, e.hazard_name, e.cause)
        .trim()
        .to_string();
    vec![
        e.item_id.to_string(),
        user_task,
        hazard,
        e.initial_severity.to_string(),
        e.initial_probability.to_string(),
        e.initial_risk().to_string(),
        e.risk_reduction_measures.clone(),
        e.residual_severity.to_string(),
        e.residual_probability.to_string(),
        e.residual_risk().to_string(),
    ]
}

fn report_tables(doc: &AssessmentDocument) -> Vec<ReportTable> {
    vec![
        ReportTable {
            title: "Risk Assessment Details",
            empty_text: "No risk assessment data available",
            headers: RISK_REPORT_HEADERS.to_vec(),
            rows: doc.risk_entries.iter().map(risk_report_row).collect(),
        },
        ReportTable {
            title: "Control System Assessment",
            empty_text: "No control system data available",
            headers: CONTROL_HEADERS.to_vec(),
            rows: doc
                .control_entries
                .iter()
                .map(|c| control_cells(c).to_vec())
                .collect(),
        },
        ReportTable {
            title: "Alternative Methods Assessment",
            empty_text: "No alternative method data available",
            headers: ALT_METHOD_HEADERS.to_vec(),
            rows: doc
                .alt_method_entries
                .iter()
                .map(|a| alt_method_cells(a).to_vec())
                .collect(),
        },
    ]
}

/// Escape a value for a Markdown table cell
pub fn escape_markdown_cell(s: &str) -> String {
    s.replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace('\n', "<br>")
}

fn md_cell(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    match value.as_str() {
        Some(s) => Ok(Value::String(escape_markdown_cell(s))),
        None => Ok(value.clone()),
    }
}

/// Report renderer using Tera
pub struct ReportGenerator {
    tera: Tera,
}

impl ReportGenerator {
    /// Create a generator with the embedded templates
    pub fn new() -> Result<Self, ReportError> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![".html.tera", ".html"]);
        tera.register_filter("md_cell", md_cell);

        for file in EmbeddedTemplates::iter() {
            let filename = file.as_ref();
            if let Some(content) = EmbeddedTemplates::get(filename) {
                if let Ok(template_str) = std::str::from_utf8(&content.data) {
                    tera.add_raw_template(filename, template_str)
                        .map_err(|e| ReportError::RenderError(e.to_string()))?;
                }
            }
        }

        Ok(Self { tera })
    }

    /// Render the whole document
    pub fn render(
        &self,
        doc: &AssessmentDocument,
        format: ReportFormat,
        meta: &ReportMeta,
    ) -> Result<String, ReportError> {
        let fields = meta.fields();
        let tables = report_tables(doc);
        let name = format.template_name();

        if self.tera.get_template_names().any(|n| n == name) {
            let mut context = tera::Context::new();
            context.insert("meta", meta);
            context.insert("fields", &fields);
            context.insert("tables", &tables);
            self.tera
                .render(name, &context)
                .map_err(|e| ReportError::RenderError(e.to_string()))
        } else {
            tracing::debug!(template = name, "template not embedded, using fallback");
            Ok(match format {
                ReportFormat::Html => hardcoded_html(meta, &fields, &tables),
                ReportFormat::Markdown => hardcoded_markdown(&fields, &tables),
            })
        }
    }
}

fn hardcoded_markdown(fields: &[MetaField], tables: &[ReportTable]) -> String {
    let mut out = String::from("# Risk Assessment Report\n\n## Report Information\n\n");
    out.push_str("| Field | Value |\n|---|---|\n");
    for field in fields {
        out.push_str(&format!(
            "| {} | {} |\n",
            field.label,
            escape_markdown_cell(&field.value)
        ));
    }

    for table in tables {
        out.push_str(&format!("\n## {}\n\n", table.title));
        if table.rows.is_empty() {
            out.push_str(&format!("_{}_\n", table.empty_text));
            continue;
        }
        out.push_str(&format!("| {} |\n", table.headers.join(" | ")));
        out.push_str(&format!("|{}\n", "---|".repeat(table.headers.len())));
        for row in &table.rows {
            let cells: Vec<String> = row.iter().map(|c| escape_markdown_cell(c)).collect();
            out.push_str(&format!("| {} |\n", cells.join(" | ")));
        }
    }
    out
}

fn hardcoded_html(meta: &ReportMeta, fields: &[MetaField], tables: &[ReportTable]) -> String {
    let esc = tera::escape_html;
    let mut out = format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Risk Assessment Report - {}</title>\n\
         <style>table {{ border-collapse: collapse; }} th, td {{ border: 1px solid #000; padding: 4px; }} \
         section {{ page-break-before: always; }}</style>\n</head>\n<body>\n\
         <h1>Risk Assessment Report</h1>\n<h2>Report Information</h2>\n<table>\n",
        esc(&meta.application)
    );
    for field in fields {
        out.push_str(&format!(
            "<tr><th>{}:</th><td>{}</td></tr>\n",
            field.label,
            esc(&field.value)
        ));
    }
    out.push_str("</table>\n");

    for table in tables {
        out.push_str(&format!("<section>\n<h2>{}</h2>\n", table.title));
        if table.rows.is_empty() {
            out.push_str(&format!("<p>{}</p>\n</section>\n", table.empty_text));
            continue;
        }
        out.push_str("<table>\n<tr>");
        for header in &table.headers {
            out.push_str(&format!("<th>{}</th>", header));
        }
        out.push_str("</tr>\n");
        for row in &table.rows {
            out.push_str("<tr>");
            for cell in row {
                out.push_str(&format!("<td>{}</td>", esc(cell)));
            }
            out.push_str("</tr>\n");
        }
        out.push_str("</table>\n</section>\n");
    }
    out.push_str("</body>\n</html>\n");
    out
}

/// The full 13-column risk table as CSV
pub fn export_csv(doc: &AssessmentDocument) -> Result<Vec<u8>, ReportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(RISK_HEADERS)?;
    for entry in &doc.risk_entries {
        writer.write_record(risk_cells(entry))?;
    }
    writer
        .into_inner()
        .map_err(|e| ReportError::Csv(e.into_error().into()))
}
