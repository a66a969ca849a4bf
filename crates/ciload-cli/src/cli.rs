//! CLI argument definitions for the declaration compiler.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "ciload",
    version,
    about = "CI Load declaration compiler - Compile canonical entries to declaration XML",
    long_about = "Compile canonical CI Load entries to the nested declaration XML consumed\n\
                  by the customs filing engine.\n\n\
                  Reference data (special-tariff catalog, buyer and manufacturer\n\
                  directories) is loaded from JSON fixture files."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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
    /// Compile a batch of canonical entries into one declaration document.
    Compile(CompileArgs),

    /// List the declared field-length contracts.
    Fields,
}

#[derive(Parser)]
pub struct CompileArgs {
    /// Path to the entry batch (JSON array of canonical entries).
    #[arg(value_name = "ENTRY_JSON")]
    pub entries: PathBuf,

    /// Special-tariff catalog fixture (JSON). Empty catalog when omitted.
    #[arg(long = "tariffs", value_name = "JSON")]
    pub tariffs: Option<PathBuf>,

    /// Buyer/customer address directory fixture (JSON).
    #[arg(long = "buyers", value_name = "JSON")]
    pub buyers: Option<PathBuf>,

    /// Manufacturer directory fixture (JSON).
    #[arg(long = "manufacturers", value_name = "JSON")]
    pub manufacturers: Option<PathBuf>,

    /// Default-value table keyed by node type (JSON).
    #[arg(long = "defaults", value_name = "JSON")]
    pub defaults: Option<PathBuf>,

    /// Output file. The document is written to a temporary file first and
    /// renamed into place only on success. Writes to stdout when omitted.
    #[arg(long = "output", value_name = "XML")]
    pub output: Option<PathBuf>,

    /// Document kind to build.
    #[arg(long = "kind", value_enum, default_value = "shipment")]
    pub kind: DocumentKindArg,

    /// Import country for special-tariff lookups.
    #[arg(long = "import-country", value_name = "ISO", default_value = "US")]
    pub import_country: String,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DocumentKindArg {
    Shipment,
    Parts,
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
