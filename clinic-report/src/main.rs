mod cli;
mod config;
mod error;
mod excel;
mod models;
mod render;
mod services;

use anyhow::{Context, Result};
use clap::Parser;
use is_terminal::IsTerminal;

use cli::Cli;
use cli::commands::{self, ReportContext};
use config::Config;
use services::aggregation::DateRange;

/// Log level from `-v` count; `RUST_LOG` still wins when set
fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    // Pick up DASHBOARD_DATA_PATH from a local .env if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    if cli.global.no_color || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let config = Config::resolve(cli.global.config.as_deref(), cli.global.file.clone())?;
    log::debug!("Resolved config: {:?}", config);

    let range = DateRange::new(cli.global.from, cli.global.to);
    if let (Some(from), Some(to)) = (range.from, range.to) {
        if from > to {
            anyhow::bail!("--from ({}) is after --to ({})", from, to);
        }
    }

    let dataset = excel::load_dataset(&config.data_path).context("Error loading data")?;
    if dataset.appointments.is_empty() {
        log::warn!(
            "No appointments found in {}. Please check that the data file is complete.",
            config.data_path.display()
        );
    }

    let ctx = ReportContext {
        config,
        dataset,
        range,
        format: cli.global.format,
    };

    let output = commands::run(&cli.command, &ctx)?;
    print!("{}", output);

    Ok(())
}
