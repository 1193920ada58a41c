//! Bundlegate CLI - OpenShift version compatibility checks for operator bundles
//!
//! Loads a bundle directory, detects Kubernetes APIs removed in the
//! configured release and checks the bundle's `olm.maxOpenShiftVersion`
//! property and `com.redhat.openshift.versions` label against each other.

mod cli;
mod config;
mod deprecation;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands, OutputFormat};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;
use tracing_appender::non_blocking::WorkerGuard;

fn main() {
    let cli = Cli::parse_args();

    let config = match Config::load_with_file(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", error::format_error(&e, cli.use_color()));
            process::exit(e.exit_code());
        }
    };

    let use_color = cli.use_color() && config.output.color;
    control::set_override(use_color);

    let guard = match init_logging(&cli, &config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            None
        }
    };

    let code = match run(cli, &config, use_color) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{}", error::format_error(&e, use_color));
            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }
            e.exit_code()
        }
    };

    // process::exit skips destructors; flush the log file first
    drop(guard);
    process::exit(code);
}

/// Main application logic
#[instrument(skip_all, fields(command = ?cli.command))]
fn run(cli: Cli, config: &Config, use_color: bool) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let format = cli
        .output
        .or_else(|| config.output.output_format())
        .unwrap_or(OutputFormat::Human);
    let mut output = OutputWriter::new(format, use_color, cli.quiet, cli.verbosity_level())
        .with_progress(config.output.progress);
    output.debug(&format!(
        "run {}",
        logging::current_run_id().unwrap_or("unknown")
    ))?;

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        "Executing command"
    );

    match cli.command {
        Commands::Validate(args) => handlers::handle_validate(args, config, &mut output),
        Commands::RangeContains(args) => handlers::handle_range_contains(args, &mut output),
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

/// Initialize the logging system from flags, config file and environment
fn init_logging(cli: &Cli, config: &Config) -> Result<Option<WorkerGuard>> {
    let verbosity = cli.verbosity_level();
    let mut logging_config = LoggingConfig::from_verbosity(verbosity);
    logging_config.merge_with_config(&config.logging, verbosity);
    logging_config.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging::init_logging(logging_config)
}
