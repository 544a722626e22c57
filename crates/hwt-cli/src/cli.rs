//! CLI argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use hwt_model::DocumentKind;
use hwt_report::Granularity;

#[derive(Parser)]
#[command(
    name = "hwt",
    version,
    about = "Hospital wait-time ingestion and reporting",
    long_about = "Ingest hospital wait-time submissions (emergency, consultation and\n\
                  surgery reports), keep defective input quarantined, and answer\n\
                  aggregate reporting queries over the accepted records."
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

    /// JSON snapshot holding the session state; loaded at start and saved
    /// back after any mutation.
    #[arg(long = "state", value_name = "PATH", global = true)]
    pub state: Option<PathBuf>,

    /// Report output format.
    #[arg(long = "output", value_enum, default_value = "table", global = true)]
    pub output: OutputArg,
}

#[derive(Subcommand)]
pub enum Command {
    /// Submit one raw XML report through the ingestion pipeline.
    Submit(SubmitArgs),

    /// Bulk-load hospital reference data from a semicolon-separated CSV.
    LoadHospitals(LoadHospitalsArgs),

    /// Run an aggregate report query.
    #[command(subcommand)]
    Report(ReportCommand),

    /// Inspect and resolve quarantined integration errors.
    #[command(subcommand)]
    Errors(ErrorsCommand),
}

#[derive(Args)]
pub struct SubmitArgs {
    /// Document kind of the submission.
    #[arg(long = "kind", value_enum)]
    pub kind: KindArg,

    /// Path to the XML file to submit.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Args)]
pub struct LoadHospitalsArgs {
    /// Path to the hospital CSV export.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Subcommand)]
pub enum ReportCommand {
    /// Mean waiting population per typology and triage category.
    MeanWaiting(MeanWaitingArgs),

    /// Triage category share per time bucket and day period.
    TriageDistribution(TriageDistributionArgs),

    /// Mean pediatric emergency wait per region.
    PediatricRegions(RangeArgs),

    /// Oncology vs non-oncology mean consultation response time.
    OncologyDifference(OncologyDifferenceArgs),

    /// Scheduled-surgery wait, general vs oncological lists.
    SurgeryWait(SurgeryWaitArgs),

    /// Surgery-vs-consultation wait gap per time bucket.
    Discrepancy(DiscrepancyArgs),

    /// Hospitals with the shortest pediatric waits.
    TopHospitals(TopHospitalsArgs),

    /// Attendance and wait per 15-minute bucket across one day.
    Evolution(EvolutionArgs),
}

/// Inclusive reporting window shared by the ranged queries.
#[derive(Args)]
pub struct RangeArgs {
    /// First day of the window (YYYY-MM-DD).
    #[arg(long = "from", value_name = "DATE")]
    pub from: NaiveDate,

    /// Last day of the window (YYYY-MM-DD).
    #[arg(long = "to", value_name = "DATE")]
    pub to: NaiveDate,
}

#[derive(Args)]
pub struct MeanWaitingArgs {
    #[command(flatten)]
    pub range: RangeArgs,

    /// Restrict to one emergency typology (exact description).
    #[arg(long = "typology")]
    pub typology: Option<String>,
}

#[derive(Args)]
pub struct TriageDistributionArgs {
    #[command(flatten)]
    pub range: RangeArgs,

    /// Time bucket width.
    #[arg(long = "granularity", value_enum, default_value = "month")]
    pub granularity: GranularityArg,

    /// Restrict to one hospital id.
    #[arg(long = "hospital", value_name = "ID")]
    pub hospital: Option<String>,
}

#[derive(Args)]
pub struct OncologyDifferenceArgs {
    #[command(flatten)]
    pub range: RangeArgs,

    /// Restrict to one specialty (exact name).
    #[arg(long = "specialty")]
    pub specialty: Option<String>,
}

#[derive(Args)]
pub struct SurgeryWaitArgs {
    #[command(flatten)]
    pub range: RangeArgs,

    /// Restrict to one specialty (exact name).
    #[arg(long = "specialty")]
    pub specialty: Option<String>,
}

#[derive(Args)]
pub struct DiscrepancyArgs {
    #[command(flatten)]
    pub range: RangeArgs,

    /// Time bucket width.
    #[arg(long = "granularity", value_enum, default_value = "month")]
    pub granularity: GranularityArg,
}

#[derive(Args)]
pub struct TopHospitalsArgs {
    #[command(flatten)]
    pub range: RangeArgs,

    /// Number of hospitals to list.
    #[arg(long = "limit", default_value_t = 10)]
    pub limit: usize,
}

#[derive(Args)]
pub struct EvolutionArgs {
    /// Calendar day to report on (YYYY-MM-DD).
    #[arg(long = "date", value_name = "DATE")]
    pub date: NaiveDate,

    /// Restrict to one hospital id.
    #[arg(long = "hospital", value_name = "ID")]
    pub hospital: Option<String>,
}

#[derive(Subcommand)]
pub enum ErrorsCommand {
    /// List quarantined integration errors.
    List(ErrorsListArgs),

    /// Mark one integration error as resolved.
    Resolve(ErrorsResolveArgs),
}

#[derive(Args)]
pub struct ErrorsListArgs {
    /// Only show errors not yet resolved.
    #[arg(long = "unresolved")]
    pub unresolved: bool,
}

#[derive(Args)]
pub struct ErrorsResolveArgs {
    /// Id of the integration error to resolve.
    #[arg(value_name = "ID")]
    pub id: u64,

    /// Free-text resolution notes.
    #[arg(long = "notes")]
    pub notes: String,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum KindArg {
    Emergency,
    Consultation,
    Surgery,
}

impl From<KindArg> for DocumentKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Emergency => DocumentKind::Emergency,
            KindArg::Consultation => DocumentKind::Consultation,
            KindArg::Surgery => DocumentKind::Surgery,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum GranularityArg {
    Day,
    Week,
    Month,
}

impl From<GranularityArg> for Granularity {
    fn from(granularity: GranularityArg) -> Self {
        match granularity {
            GranularityArg::Day => Granularity::Day,
            GranularityArg::Week => Granularity::Week,
            GranularityArg::Month => Granularity::Month,
        }
    }
}

/// Report rendering choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum OutputArg {
    /// Human-readable table.
    Table,
    /// Pretty-printed JSON array of report rows.
    Json,
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
