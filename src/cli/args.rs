//! Command-line argument definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    alt::AltCommands, catalog::CatalogCommands, completions::CompletionsArgs,
    control::ControlCommands, hazard::HazardCommands, info::InfoArgs, matrix::MatrixArgs,
    new::NewArgs, report::ReportArgs, risk::RiskCommands, role::RoleCommands,
    task::TaskCommands, validate::ValidateArgs,
};

/// Machine safety risk assessment (ANSI B11.0 / ANSI Z244.1)
#[derive(Parser, Debug)]
#[command(name = "mrt", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options accepted by every command
#[derive(clap::Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Assessment file [default: config `default_file` or assessment.json]
    #[arg(long, short = 'f', global = true, env = "MRT_FILE")]
    pub file: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', global = true, value_enum, default_value = "auto")]
    pub output: OutputFormat,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Table for lists, text otherwise
    Auto,
    Table,
    Json,
    Yaml,
    /// Tab-separated, no styling
    Tsv,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new assessment file
    New(NewArgs),

    /// Show or update project information
    Info(InfoArgs),

    /// Manage users/roles
    #[command(subcommand)]
    Role(RoleCommands),

    /// Manage tasks of a role
    #[command(subcommand)]
    Task(TaskCommands),

    /// Manage hazards of a task
    #[command(subcommand)]
    Hazard(HazardCommands),

    /// Browse the hazard and risk reduction catalogs
    #[command(subcommand)]
    Catalog(CatalogCommands),

    /// Show the risk matrix or score one pair
    Matrix(MatrixArgs),

    /// Risk assessment table
    #[command(subcommand)]
    Risk(RiskCommands),

    /// Control system assessment table
    #[command(subcommand)]
    Control(ControlCommands),

    /// Alternative method (LOTO exception) table
    #[command(subcommand)]
    Alt(AltCommands),

    /// Check alternative methods against ANSI Z244.1
    Validate(ValidateArgs),

    /// Export a report
    Report(ReportArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["mrt", "role", "list", "-f", "x.json", "-o", "json", "-vv"])
            .unwrap();
        assert_eq!(cli.global.file, Some(PathBuf::from("x.json")));
        assert_eq!(cli.global.output, OutputFormat::Json);
        assert_eq!(cli.global.verbose, 2);
    }
}
