//! CLI argument definitions for the migration engine.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "folio-migrate",
    version,
    about = "Transform flat legacy library records into nested FOLIO records",
    long_about = "Transform flat legacy library exports into nested FOLIO records.\n\n\
                  Reads a tab-separated legacy export, a mapping file, reference data\n\
                  snapshots with their maps, and the instance-id lookup table from the\n\
                  bib pass, and writes newline-delimited JSON plus a markdown report."
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
    /// Transform a legacy holdings export into FOLIO holdings records.
    Holdings(HoldingsArgs),

    /// Print the property tree of a FOLIO record schema.
    InspectSchema(InspectSchemaArgs),
}

#[derive(Parser)]
pub struct HoldingsArgs {
    /// FOLIO holdings record schema (JSON).
    #[arg(long = "schema", value_name = "FILE")]
    pub schema: PathBuf,

    /// Tab-separated legacy holdings export with a header row.
    #[arg(long = "records", value_name = "FILE")]
    pub records: PathBuf,

    /// Mapping file linking legacy columns to schema paths (JSON).
    #[arg(long = "map", value_name = "FILE")]
    pub map: PathBuf,

    /// Location reference data snapshot from FOLIO (JSON).
    #[arg(long = "location-ref-data", value_name = "FILE")]
    pub location_ref_data: PathBuf,

    /// Tab-separated legacy-to-FOLIO location map.
    #[arg(long = "location-map", value_name = "FILE")]
    pub location_map: PathBuf,

    /// Call number type reference data snapshot (JSON).
    #[arg(long = "call-number-type-ref-data", value_name = "FILE")]
    pub call_number_type_ref_data: Option<PathBuf>,

    /// Tab-separated legacy-to-FOLIO call number type map.
    #[arg(long = "call-number-type-map", value_name = "FILE")]
    pub call_number_type_map: Option<PathBuf>,

    /// Legacy-id to instance-id lookup table from the bib pass (JSON).
    #[arg(long = "instance-id-map", value_name = "FILE")]
    pub instance_id_map: PathBuf,

    /// Output file for the transformed records (newline-delimited JSON).
    #[arg(long = "output", value_name = "FILE")]
    pub output: PathBuf,

    /// Markdown report path (default: <OUTPUT>.report.md).
    #[arg(long = "report", value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// FOLIO user id stamped into each record's metadata.
    #[arg(long = "created-by", value_name = "UUID")]
    pub created_by: String,

    /// Slot cap for arrays nested inside object properties.
    #[arg(long = "nested-slot-cap", value_name = "N", default_value_t = 5)]
    pub nested_slot_cap: usize,

    /// Slot cap for top-level repeatable arrays.
    #[arg(long = "array-slot-cap", value_name = "N", default_value_t = 15)]
    pub array_slot_cap: usize,
}

#[derive(Parser)]
pub struct InspectSchemaArgs {
    /// FOLIO record schema (JSON).
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,
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
