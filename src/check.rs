// 🧾 Check Pipeline - load → match → write
// The CLI drives these steps one by one so it can report progress between them

use crate::config::CheckConfig;
use crate::matcher::{Identity, MatchMode, MatchStats, Matcher, TextRecord};
use crate::report::{AnnotatedTable, RunSummary};
use crate::table::{identities, text_records, Table};
use anyhow::{Context, Result};
use tracing::{info, warn};

/// Everything read from disk for one run
#[derive(Debug, Clone)]
pub struct CheckInputs {
    pub records_table: Table,
    pub records: Vec<TextRecord>,
    pub identities: Vec<Identity>,
}

/// Read both tables and map them onto records and identities.
/// Missing columns fail here, before any matching starts.
pub fn load_inputs(config: &CheckConfig) -> Result<CheckInputs> {
    config.validate()?;

    let (records_path, roster_path) = match (&config.records_path, &config.roster_path) {
        (Some(records), Some(roster)) => (records, roster),
        _ => anyhow::bail!("Both records and roster files are required"),
    };

    let records_table = Table::from_path(records_path)?;
    let roster_table = Table::from_path(roster_path)?;

    let records = text_records(&records_table, &config.columns.text)
        .context("Records file does not match the configured columns")?;
    let identities = identities(&roster_table, &config.columns)
        .context("Roster file does not match the configured columns")?;

    Ok(CheckInputs {
        records_table,
        records,
        identities,
    })
}

pub fn build_matcher(config: &CheckConfig, identities: &[Identity]) -> Result<Matcher> {
    if config.mode == MatchMode::Legacy {
        warn!(
            "legacy mode: any email in a text, or any number as long as an id, \
             marks the record as matched regardless of identity (use --mode strict)"
        );
    }

    Matcher::new(identities, config.mode).context("Failed to compile identity patterns")
}

/// Write the annotated CSV plus the optional HTML report and JSON summary
pub fn write_outputs(
    config: &CheckConfig,
    inputs: &CheckInputs,
    stats: &MatchStats,
) -> Result<AnnotatedTable> {
    let annotated = AnnotatedTable::build(
        &inputs.records_table,
        &inputs.records,
        &config.columns.presence,
        &config.labels,
    );

    annotated.write_csv(&config.output_path)?;

    if let Some(html_path) = &config.html_path {
        annotated.write_html(html_path, None)?;
    }

    if let Some(summary_path) = &config.summary_path {
        RunSummary::new(config, inputs.identities.len(), stats.clone()).write_json(summary_path)?;
    }

    info!(summary = %stats.summary(), "check finished");
    Ok(annotated)
}

/// Whole pass without progress reporting
pub fn run_check(config: &CheckConfig) -> Result<(CheckInputs, MatchStats)> {
    let mut inputs = load_inputs(config)?;
    let matcher = build_matcher(config, &inputs.identities)?;
    let stats = matcher.annotate(&mut inputs.records);
    write_outputs(config, &inputs, &stats)?;
    Ok((inputs, stats))
}
