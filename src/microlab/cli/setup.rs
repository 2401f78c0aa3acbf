use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use microlab::model::{ReportStatus, SampleType};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(name = "microlab", bin_name = "microlab", version)]
#[command(
    about = "Compose, store, browse and export microbiology laboratory reports",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding reports and config
    #[arg(long, global = true, env = "MICROLAB_HOME", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Verbose diagnostics on stderr (repeat for more)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compose and save a new report
    #[command(alias = "n")]
    Create {
        #[command(flatten)]
        fields: ReportArgs,

        /// Status to save with (draft, completed, sent)
        #[arg(long, default_value = "draft")]
        status: ReportStatus,
    },

    /// List reports, optionally filtered
    #[command(alias = "ls")]
    List {
        /// Match title, sample id or client name
        #[arg(short, long)]
        search: Option<String>,

        /// draft, completed, sent or all
        #[arg(long, default_value = "all", value_parser = parse_choice::<ReportStatus>)]
        status: Choice<ReportStatus>,

        /// Sample type or all
        #[arg(long = "type", default_value = "all", value_parser = parse_choice::<SampleType>)]
        sample_type: Choice<SampleType>,
    },

    /// Show every field of one or more reports
    #[command(alias = "v")]
    View {
        /// Report ids or unique id prefixes
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Change fields of a stored report
    #[command(alias = "e")]
    Edit {
        /// Report id or unique id prefix
        id: String,

        #[command(flatten)]
        fields: ReportArgs,

        /// New status (keeps the current one when omitted)
        #[arg(long)]
        status: Option<ReportStatus>,
    },

    /// Delete reports
    #[command(alias = "rm")]
    Delete {
        /// Report ids or unique id prefixes
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Export reports as Markdown documents
    Export {
        /// Report ids or prefixes (all reports when omitted)
        ids: Vec<String>,

        /// Directory to write into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Report counts per status
    Stats,

    /// Show or change configuration
    Config {
        /// lab-name, default-unit or default-sample-type
        key: Option<String>,

        /// New value
        value: Option<String>,
    },
}

/// Report fields as flags. Every flag is optional so the same set serves
/// create (fill in) and edit (overwrite what is given).
#[derive(Args, Debug, Clone, Default)]
pub struct ReportArgs {
    /// Report title
    #[arg(short, long)]
    pub title: Option<String>,

    /// Sample identifier
    #[arg(long)]
    pub sample_id: Option<String>,

    /// Water, Food, Soil, Clinical, Air, Surface or Other
    #[arg(long)]
    pub sample_type: Option<SampleType>,

    /// Free-text sample description
    #[arg(long)]
    pub description: Option<String>,

    /// Collection date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub collected: Option<NaiveDate>,

    /// Analysis date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub analyzed: Option<NaiveDate>,

    /// Client name
    #[arg(long)]
    pub client: Option<String>,

    /// Client email
    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub institution: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub address: Option<String>,

    /// NAME:COUNT[:UNIT], repeatable; replaces the list on edit. Escape a literal colon as \:
    #[arg(long = "organism", value_name = "ENTRY")]
    pub organisms: Vec<String>,

    /// NAME:RESULT[:RANGE[:INTERPRETATION]], repeatable; replaces the list on edit. Escape a literal colon as \:
    #[arg(long = "test", value_name = "ENTRY")]
    pub tests: Vec<String>,

    #[arg(long)]
    pub conclusion: Option<String>,

    #[arg(long)]
    pub recommendations: Option<String>,

    #[arg(long)]
    pub analyst: Option<String>,

    #[arg(long)]
    pub supervisor: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,
}

/// A filter value that may also be "all".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice<T> {
    All,
    Only(T),
}

impl<T> Choice<T> {
    pub fn only(self) -> Option<T> {
        match self {
            Choice::All => None,
            Choice::Only(value) => Some(value),
        }
    }
}

fn parse_choice<T: FromStr<Err = String>>(s: &str) -> Result<Choice<T>, String> {
    if s.trim().eq_ignore_ascii_case("all") {
        Ok(Choice::All)
    } else {
        s.parse().map(Choice::Only)
    }
}
