//! Mail-enabled group census.
//!
//! Enumerates mail-enabled groups, classifies them as Distribution Lists or
//! Microsoft 365 groups, counts transitive members per group, assigns each
//! group a size band and writes a CSV report with summary statistics.
//!
//! The directory itself is reached through the [`DirectoryReader`] trait;
//! `groupcensus-entra` provides the Microsoft Graph implementation.
//!
//! # Example
//!
//! ```no_run
//! use groupcensus_core::{run_census, DirectoryReader, RunOptions, RunOutcome, ReportMode};
//!
//! # async fn example(reader: &dyn DirectoryReader) -> Result<(), Box<dyn std::error::Error>> {
//! let options = RunOptions {
//!     mode: ReportMode::All,
//!     ..RunOptions::default()
//! };
//!
//! if let RunOutcome::Completed(report) = run_census(reader, &options).await? {
//!     println!("{} groups, {} errors", report.summary.total_rows, report.summary.error_count);
//! }
//! # Ok(())
//! # }
//! ```

mod aggregate;
mod bucket;
mod error;
mod group;
mod mode;
mod pipeline;
mod report;
mod selection;
mod source;

// Re-exports
pub use aggregate::{count_group, count_members, CountedGroup, MAX_CONCURRENCY};
pub use bucket::{bucket_for, MemberCount, SizeBucket};
pub use error::{CensusError, CensusResult, LookupError};
pub use group::{classify, GroupRecord, GroupType, RawGroup, UNIFIED_MARKER};
pub use mode::{ProcessingCap, ReportMode};
pub use pipeline::{run_census, RunOptions, RunOutcome, RunReport};
pub use report::{
    artifact_file_name, build_rows, csv_header, render_summary, write_artifact, write_csv,
    LargestGroup, ReportRow, Summary, DEFAULT_TOP_N, ERROR_LITERAL,
};
pub use selection::{classify_all, count_by_type, select, EmptySelection};
pub use source::{
    DirectoryReader, FetchPlan, FetchStrategy, GroupQuery, DEFAULT_OVER_FETCH_MULTIPLIER,
};
