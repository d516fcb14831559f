//! End-to-end census run.

use chrono::Local;
use std::path::PathBuf;
use tracing::{info, instrument, warn};

use crate::aggregate::count_members;
use crate::mode::{ProcessingCap, ReportMode};
use crate::report::{
    artifact_file_name, build_rows, write_artifact, ReportRow, Summary, DEFAULT_TOP_N,
};
use crate::selection::{classify_all, count_by_type, select};
use crate::source::{DirectoryReader, FetchPlan, FetchStrategy};
use crate::CensusResult;

/// Options of a single run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Group types to report on.
    pub mode: ReportMode,
    /// Maximum number of groups processed.
    pub cap: ProcessingCap,
    /// Where the group type filter is applied.
    pub strategy: FetchStrategy,
    /// Concurrent member-count lookups, `1` for sequential.
    pub concurrency: usize,
    /// Number of largest groups kept in the summary.
    pub top_n: usize,
    /// Directory receiving the CSV artifact.
    pub output_dir: PathBuf,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            mode: ReportMode::default(),
            cap: ProcessingCap::UNLIMITED,
            strategy: FetchStrategy::default(),
            concurrency: 1,
            top_n: DEFAULT_TOP_N,
            output_dir: PathBuf::from("."),
        }
    }
}

/// Result of a finished run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Report rows in selection order.
    pub rows: Vec<ReportRow>,
    /// Statistics over `rows`.
    pub summary: Summary,
    /// Location of the written CSV.
    pub artifact_path: PathBuf,
}

/// How a run ended.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Selection was empty; no artifact was written.
    NothingToProcess,
    /// The artifact was written.
    Completed(RunReport),
}

/// Runs the full pipeline against `reader`.
///
/// Only connection and output failures abort the run. Per-group lookup
/// failures end up as error rows.
///
/// # Errors
///
/// Returns `ConnectionFailure` if the directory cannot be reached or listed,
/// and `Output` if the artifact cannot be written.
#[instrument(skip(reader), fields(mode = %options.mode))]
pub async fn run_census<R>(reader: &R, options: &RunOptions) -> CensusResult<RunOutcome>
where
    R: DirectoryReader + ?Sized,
{
    let started_at = Local::now();
    reader.verify_connection().await?;

    let plan = FetchPlan::new(options.mode, options.cap, options.strategy);
    let raw = reader.list_mail_enabled_groups(plan.query()).await?;
    let fetched = raw.len();

    let classified = classify_all(raw);
    let (dl_count, m365_count) = count_by_type(&classified);
    info!(
        fetched,
        distribution_lists = dl_count,
        m365_groups = m365_count,
        "Groups fetched and classified"
    );

    let selected = match select(classified, options.mode, options.cap) {
        Ok(selected) => selected,
        Err(e) => {
            info!("{e}");
            return Ok(RunOutcome::NothingToProcess);
        }
    };
    if plan.may_have_under_fetched(fetched, selected.len()) {
        warn!(
            fetched,
            selected = selected.len(),
            "Fewer groups than requested; the over-fetch bound may have been too small"
        );
    }

    info!(groups = selected.len(), "Counting transitive members");
    let counted = count_members(reader, selected, options.concurrency).await;
    let rows = build_rows(counted);

    let file_name = artifact_file_name(options.mode, started_at);
    let artifact_path = write_artifact(&rows, &options.output_dir, &file_name)?;
    let summary = Summary::from_rows(&rows, options.top_n);

    Ok(RunOutcome::Completed(RunReport {
        rows,
        summary,
        artifact_path,
    }))
}
