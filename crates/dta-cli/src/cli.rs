//! CLI argument definitions for the `dta` tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "dta",
    version,
    about = "Inspect and convert Stata .dta files (versions 5 and 6)",
    long_about = "Inspect and convert Stata .dta files.\n\n\
                  Reads version 5 and 6 files in either byte order and writes\n\
                  version 6 files."
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the header and the variable list.
    Info(InfoArgs),

    /// Print the first rows as a table.
    Head(HeadArgs),

    /// Export the data block as CSV.
    Csv(CsvArgs),

    /// Decode a file and write it back as version 6.
    Rewrite(RewriteArgs),
}

#[derive(Args)]
pub struct InfoArgs {
    /// Path to the .dta file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Args)]
pub struct HeadArgs {
    /// Path to the .dta file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Number of rows to show.
    #[arg(long = "rows", short = 'n', default_value_t = 10)]
    pub rows: usize,
}

#[derive(Args)]
pub struct CsvArgs {
    /// Path to the .dta file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output CSV path (default: stdout).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct RewriteArgs {
    /// Source .dta file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Destination .dta file.
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Dataset label to write (default: keep the source label).
    #[arg(long = "label", value_name = "TEXT")]
    pub label: Option<String>,

    /// Write a big-endian file.
    #[arg(long = "big-endian", conflicts_with = "little_endian")]
    pub big_endian: bool,

    /// Write a little-endian file.
    #[arg(long = "little-endian")]
    pub little_endian: bool,
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
