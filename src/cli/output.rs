//! Output formatting utilities

use crate::cli::OutputFormat;

/// Determine the effective output format based on context
pub fn effective_format(format: OutputFormat, is_list: bool) -> OutputFormat {
    match format {
        OutputFormat::Auto => {
            if is_list {
                OutputFormat::Table
            } else {
                OutputFormat::Auto
            }
        }
        other => other,
    }
}

/// Whether machine-readable output was asked for
pub fn is_structured(format: OutputFormat) -> bool {
    matches!(format, OutputFormat::Json | OutputFormat::Yaml)
}

/// Print a value as JSON or YAML
pub fn print_structured<T: serde::Serialize>(format: OutputFormat, value: &T) -> miette::Result<()> {
    use miette::IntoDiagnostic;

    match format {
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(value).into_diagnostic()?),
        _ => println!("{}", serde_json::to_string_pretty(value).into_diagnostic()?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_format() {
        assert_eq!(effective_format(OutputFormat::Auto, true), OutputFormat::Table);
        assert_eq!(effective_format(OutputFormat::Auto, false), OutputFormat::Auto);
        assert_eq!(effective_format(OutputFormat::Json, true), OutputFormat::Json);
        assert!(is_structured(OutputFormat::Yaml));
        assert!(!is_structured(OutputFormat::Tsv));
    }
}
