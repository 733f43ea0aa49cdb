//! Report command handlers
//!
//! Each handler builds a serializable report from the loaded dataset and
//! renders it in the requested format. Handlers return the rendered output
//! instead of printing so they can be exercised directly in tests.

pub mod cancelers;
pub mod employees;
pub mod export;
pub mod overview;
pub mod timing;

use anyhow::{Result, bail};
use serde::Serialize;

use super::{Commands, OutputFormat};
use crate::config::Config;
use crate::excel::Dataset;
use crate::services::aggregation::DateRange;

/// Everything a command needs, resolved once in `main`
#[derive(Debug)]
pub struct ReportContext {
    pub config: Config,
    pub dataset: Dataset,
    pub range: DateRange,
    pub format: OutputFormat,
}

impl ReportContext {
    /// Total procedures performed, when the count sheet loaded
    pub fn total_procedures(&self) -> Option<f64> {
        self.dataset
            .procedure_counts()
            .map(crate::services::aggregation::total_procedures)
    }
}

/// Run one command and return what should be written to stdout
pub fn run(command: &Commands, ctx: &ReportContext) -> Result<String> {
    match command {
        Commands::Overview => overview::handle(ctx),
        Commands::Employees { employee } => employees::handle(ctx, employee.as_deref()),
        Commands::Timing => timing::handle(ctx),
        Commands::Cancelers { employee } => cancelers::handle(ctx, employee.as_deref()),
        Commands::Export { output } => export::handle(ctx, output),
    }
}

pub(crate) fn to_json<T: Serialize>(report: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    Ok(json)
}

/// Match a user-supplied employee name against the known names.
///
/// Unknown names fail with the closest fuzzy matches as suggestions.
pub(crate) fn resolve_employee(name: &str, known: &[String], role: &str) -> Result<String> {
    use fuzzy_matcher::FuzzyMatcher;
    use fuzzy_matcher::skim::SkimMatcherV2;

    let wanted = name.trim();
    if let Some(exact) = known.iter().find(|k| k.as_str() == wanted) {
        return Ok(exact.clone());
    }

    let matcher = SkimMatcherV2::default();
    let mut scored: Vec<(&String, i64)> = known
        .iter()
        .filter_map(|k| matcher.fuzzy_match(k, wanted).map(|score| (k, score)))
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let suggestions: Vec<&str> = scored.iter().take(3).map(|(k, _)| k.as_str()).collect();
    if suggestions.is_empty() {
        bail!("No {} named '{}' in the selected data", role, wanted);
    }
    bail!(
        "No {} named '{}' in the selected data. Did you mean: {}?",
        role,
        wanted,
        suggestions.join(", ")
    )
}
