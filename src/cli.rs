use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rat-audit")]
#[command(about = "Audit a source tree for approved license headers")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the release audit on a directory
    Check {
        /// Directory to audit (default: current directory)
        path: Option<PathBuf>,

        /// Configuration file (default: ./rat-audit.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Exclusion file, one glob pattern per line
        #[arg(long)]
        exclude_file: Option<PathBuf>,

        /// Template for the styled report
        #[arg(long)]
        stylesheet: Option<PathBuf>,

        /// Directory the reports are written to
        #[arg(long)]
        report_dir: Option<PathBuf>,

        /// Approved license family name; repeat to build the list
        #[arg(long = "approve", value_name = "FAMILY")]
        approved: Vec<String>,

        /// Disable the built-in license matchers
        #[arg(long)]
        no_default_matchers: bool,

        /// Report unapproved licenses without failing
        #[arg(long)]
        no_fail: bool,
    },
    /// Write a starter rat-audit.toml from a preset
    Init {
        /// Configuration preset
        preset: InitPreset,

        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
    /// Show or validate configuration
    Config {
        /// Configuration file (default: ./rat-audit.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },
}

#[derive(Clone, ValueEnum)]
pub enum InitPreset {
    Apache,
    Mit,
    Strict,
}
