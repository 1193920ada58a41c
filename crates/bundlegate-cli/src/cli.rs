//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use std::path::PathBuf;

/// Bundlegate - OpenShift version compatibility checks for operator bundles
///
/// Verifies that a bundle still using Kubernetes APIs removed in a given
/// release declares a consistent `olm.maxOpenShiftVersion` and
/// `com.redhat.openshift.versions` label.
#[derive(Parser, Debug)]
#[command(
    name = "bundlegate",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "BUNDLEGATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results [default: human, or the configured format]
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a bundle directory for OpenShift version compatibility
    Validate(ValidateArgs),

    /// Evaluate whether a label range contains a version
    RangeContains(RangeContainsArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Bundle directory (containing `manifests/`, or the manifests themselves)
    #[arg(value_name = "BUNDLE_DIR")]
    pub bundle_dir: PathBuf,

    /// Label source: `file=<Dockerfile or annotations.yaml>` or `range=<range>`
    #[arg(
        long = "optional-values",
        value_name = "KEY=VALUE",
        value_delimiter = ',',
        value_parser = parse_key_value
    )]
    pub optional_values: Vec<(String, String)>,

    /// Override a CSV annotation, e.g. `olm.properties=[...]`
    #[arg(long = "annotation", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub annotations: Vec<(String, String)>,

    /// First OpenShift version that no longer serves the removed APIs
    #[arg(long, value_name = "X.Y")]
    pub unsupported_version: Option<String>,

    /// Kubernetes release that removed the APIs
    #[arg(long, value_name = "X.Y")]
    pub removed_in_kube: Option<String>,
}

/// Arguments for the range-contains command
#[derive(Parser, Debug)]
pub struct RangeContainsArgs {
    /// Range expression, e.g. `v4.6-v4.8`, `=v4.8` or `v4.6`
    #[arg(value_name = "RANGE")]
    pub range: String,

    /// Version to look up, e.g. `4.9`
    #[arg(id = "target_version", value_name = "VERSION")]
    pub version: String,

    /// Truncate a version with a patch level to major.minor instead of failing
    #[arg(long)]
    pub tolerant: bool,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

/// Parse a `key=value` pair, splitting on the first `=`
fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got `{}`", raw)),
    }
}
