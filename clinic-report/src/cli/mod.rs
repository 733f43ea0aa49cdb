//! Command-line interface

pub mod commands;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Output format for report commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored tables and bar charts (default)
    Text,
    /// Pretty-printed JSON
    Json,
    /// CSV of the command's main table
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "clinic-report")]
#[command(version)]
#[command(about = "Cancellation and no-show analytics for diagnostic clinic exports", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Excel workbook to read (overrides DASHBOARD_DATA_PATH and the config file)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Config file (defaults to <config dir>/clinic-report/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// First appointment date to include (YYYY-MM-DD)
    #[arg(long, global = true, value_name = "DATE", value_parser = parse_date)]
    pub from: Option<NaiveDate>,

    /// Last appointment date to include (YYYY-MM-DD)
    #[arg(long, global = true, value_name = "DATE", value_parser = parse_date)]
    pub to: Option<NaiveDate>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Headline metrics, cancellations per category, weekly trend, OTHER drill-down
    Overview,

    /// Appointments booked per employee and the employee × category heatmap
    Employees {
        /// Show the detailed breakdown for one scheduler
        #[arg(short, long, value_name = "NAME")]
        employee: Option<String>,
    },

    /// Time between booking and cancellation
    Timing,

    /// Cancellations per cancelling employee
    Cancelers {
        /// Show the cancelled appointments of one employee
        #[arg(short, long, value_name = "NAME")]
        employee: Option<String>,
    },

    /// Write every report section to an Excel workbook
    Export {
        /// Destination .xlsx file
        #[arg(short, long, value_name = "PATH")]
        output: PathBuf,
    },
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{}' (expected YYYY-MM-DD): {}", s, e))
}
