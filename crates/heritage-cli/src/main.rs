//! Heritage CLI
//!
//! Command-line interface for heritage, the controller inheritance checker

mod commands;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use heritage_core::init_tracing;
use tracing::error;

#[derive(Parser)]
#[command(name = "heritage")]
#[command(about = "Heritage: check and fix controller inheritance conventions in C# projects")]
#[command(version = heritage_core::VERSION)]
#[command(
    long_about = "Heritage checks that every class in a Controllers/ or ApiControllers/ folder\n\
derives from a project base controller (a class whose name carries the reserved\n\
prefix, `_` by default) and rewrites offending declarations on request.\n\
\n\
Examples:\n  \
heritage check                    # Check the current directory\n  \
heritage check --format json src/ # Machine-readable report\n  \
heritage fix --dry-run            # Show the fixes as a diff\n  \
heritage fix --base _BaseController\n  \
heritage config init              # Write a default .heritagerc.toml"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        env = "HERITAGE_CONFIG",
        help = "Path to configuration file (.heritagerc.toml/.heritagerc.json)"
    )]
    config: Option<PathBuf>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Report controllers that do not inherit from a base controller
    #[command(alias = "lint")]
    Check {
        /// Files or directories to check
        #[arg(help = "Files or directories to process (default: current directory)")]
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(
            short,
            long,
            default_value = "human",
            help = "Output format for diagnostics"
        )]
        format: OutputFormat,
    },

    /// Rewrite offending controllers to inherit from a base controller
    Fix {
        /// Files or directories to fix
        #[arg(help = "Files or directories to process (default: current directory)")]
        paths: Vec<PathBuf>,

        /// Base controller to use when a folder offers more than one
        #[arg(long, value_name = "NAME", help = "Base class to inherit from")]
        base: Option<String>,

        /// Show fixes without writing them
        #[arg(long, help = "Print a diff of the fixes instead of writing files")]
        dry_run: bool,
    },

    /// List the available rules
    Rules {
        /// Show detailed rule information
        #[arg(long, help = "Show detailed information for each rule")]
        detailed: bool,

        /// Output format
        #[arg(short, long, default_value = "human", help = "Output format")]
        format: OutputFormat,
    },

    /// Configuration file management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a default configuration file to the current directory
    Init {
        /// Configuration file format
        #[arg(long, default_value = "toml", help = "Configuration file format")]
        format: ConfigFormat,

        /// Overwrite existing configuration file
        #[arg(long, help = "Overwrite existing configuration file")]
        force: bool,
    },

    /// Show the configuration in effect
    Show {
        /// Output format
        #[arg(long, default_value = "toml", help = "Output format")]
        format: ConfigFormat,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Human-readable output with colors
    Human,
    /// JSON format for programmatic consumption
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ConfigFormat {
    /// TOML configuration format
    Toml,
    /// JSON configuration format
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    init_tracing(cli.verbose);

    match run_command(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("heritage failed: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run_command(cli: Cli) -> anyhow::Result<ExitCode> {
    let config_path = cli.config;

    match cli.command {
        Some(Commands::Check { paths, format }) => {
            commands::check_command(default_paths(paths), format, config_path.as_deref())
        }

        Some(Commands::Fix {
            paths,
            base,
            dry_run,
        }) => commands::fix_command(
            default_paths(paths),
            base.as_deref(),
            dry_run,
            config_path.as_deref(),
        ),

        Some(Commands::Rules { detailed, format }) => {
            commands::rules_command(detailed, format, config_path.as_deref())
        }

        Some(Commands::Config { action }) => match action {
            ConfigAction::Init { format, force } => commands::config_init_command(format, force),
            ConfigAction::Show { format } => {
                commands::config_show_command(format, config_path.as_deref())
            }
        },

        None => {
            // No subcommand provided, show help
            Cli::command().print_help()?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn default_paths(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    if paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths
    }
}
