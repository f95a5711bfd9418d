//! CLI argument definitions for docsave.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "docsave",
    version,
    about = "Save documents to local files or managed workspace resources",
    long_about = "Save documents to local files or managed workspace resources.\n\n\
                  Read-only targets are never overwritten, missing workspace folders\n\
                  are created, and a failed save leaves no partial file behind."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Saver configuration file (default: the platform config directory).
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Do not draw a progress bar.
    #[arg(long = "no-progress", global = true)]
    pub no_progress: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Save a document to a file or a workspace resource.
    Save(SaveArgs),

    /// Show where an editor input points.
    Resolve(ResolveArgs),

    /// Print the effective saver configuration.
    Info,
}

#[derive(Args)]
pub struct SaveArgs {
    /// File whose bytes make up the document.
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Save to this local path.
    #[arg(
        long = "to",
        value_name = "PATH",
        conflicts_with = "workspace",
        required_unless_present = "workspace"
    )]
    pub to: Option<PathBuf>,

    /// Workspace root directory.
    #[arg(long = "workspace", value_name = "DIR", requires = "resource")]
    pub workspace: Option<PathBuf>,

    /// Resource path inside the workspace, e.g. /project/report.rptdesign.
    #[arg(long = "resource", value_name = "RESOURCE", requires = "workspace")]
    pub resource: Option<String>,

    /// How local files are written (overrides the config file).
    #[arg(long = "strategy", value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Do not keep the previous contents of workspace resources.
    #[arg(long = "no-history")]
    pub no_history: bool,
}

#[derive(Args)]
pub struct ResolveArgs {
    /// A file URI, an absolute path, or `workspace:<DIR>:<RESOURCE>`.
    #[arg(value_name = "INPUT")]
    pub input: String,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    /// Write a temp file next to the target and rename it into place.
    AtomicReplace,
    /// Truncate the target and write into it directly.
    InPlace,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
