use clap::Parser;
use miette::Result;
use mrt::cli::{Cli, Commands};
use mrt::core::Config;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let (config, config_errors) = Config::load_reporting();
    init_tracing(cli.global.verbose, config.log_level.as_deref());
    for e in config_errors {
        tracing::warn!("{}", e);
    }

    let global = &cli.global;
    match cli.command {
        Commands::New(args) => mrt::cli::commands::new::run(args, global),
        Commands::Info(args) => mrt::cli::commands::info::run(args, global),
        Commands::Role(cmd) => mrt::cli::commands::role::run(cmd, global),
        Commands::Task(cmd) => mrt::cli::commands::task::run(cmd, global),
        Commands::Hazard(cmd) => mrt::cli::commands::hazard::run(cmd, global),
        Commands::Catalog(cmd) => mrt::cli::commands::catalog::run(cmd, global),
        Commands::Matrix(args) => mrt::cli::commands::matrix::run(args, global),
        Commands::Risk(cmd) => mrt::cli::commands::risk::run(cmd, global),
        Commands::Control(cmd) => mrt::cli::commands::control::run(cmd, global),
        Commands::Alt(cmd) => mrt::cli::commands::alt::run(cmd, global),
        Commands::Validate(args) => mrt::cli::commands::validate::run(args, global),
        Commands::Report(args) => mrt::cli::commands::report::run(args, global),
        Commands::Completions(args) => mrt::cli::commands::completions::run(args),
    }
}

/// Logs go to stderr. `-v` flags win over RUST_LOG, which wins over the
/// config `log_level`.
fn init_tracing(verbose: u8, config_level: Option<&str>) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::try_new(config_level.unwrap_or("warn"))
                .unwrap_or_else(|_| EnvFilter::new("warn"))
        }),
        1 => EnvFilter::new("mrt=info"),
        2 => EnvFilter::new("mrt=debug"),
        _ => EnvFilter::new("mrt=trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
