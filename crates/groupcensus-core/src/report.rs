//! Report rows, CSV artifact and summary statistics.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::aggregate::CountedGroup;
use crate::bucket::{MemberCount, SizeBucket};
use crate::group::GroupType;
use crate::mode::ReportMode;
use crate::CensusResult;

/// Default number of largest groups shown in the summary.
pub const DEFAULT_TOP_N: usize = 5;

/// Literal written to the `Members` column for failed lookups.
pub const ERROR_LITERAL: &str = "ERROR";

/// One line of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub primary_smtp_address: String,
    pub display_name: String,
    pub group_type: GroupType,
    pub member_count: MemberCount,
    pub size_bucket: SizeBucket,
}

impl ReportRow {
    /// Returns true if the member count lookup succeeded.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.member_count.is_error()
    }
}

impl From<CountedGroup> for ReportRow {
    fn from(counted: CountedGroup) -> Self {
        let size_bucket = SizeBucket::for_count(&counted.member_count);
        let group_type = counted.group.group_type();
        Self {
            primary_smtp_address: counted.group.primary_smtp_address,
            display_name: counted.group.display_name,
            group_type,
            member_count: counted.member_count,
            size_bucket,
        }
    }
}

/// Builds one row per counted group, preserving order.
#[must_use]
pub fn build_rows(counted: Vec<CountedGroup>) -> Vec<ReportRow> {
    counted.into_iter().map(ReportRow::from).collect()
}

/// Flat CSV representation of a row.
///
/// Field order is the column order of the artifact.
#[derive(Debug, Serialize)]
struct CsvReportRecord<'a> {
    #[serde(rename = "PrimarySmtpAddress")]
    primary_smtp_address: &'a str,
    #[serde(rename = "DisplayName")]
    display_name: &'a str,
    #[serde(rename = "GroupType")]
    group_type: &'static str,
    #[serde(rename = "Members")]
    members: String,
    #[serde(rename = "Empty")]
    empty: &'static str,
    #[serde(rename = "1-10")]
    up_to_10: &'static str,
    #[serde(rename = "11-100")]
    up_to_100: &'static str,
    #[serde(rename = "101-200")]
    up_to_200: &'static str,
    #[serde(rename = "201-500")]
    up_to_500: &'static str,
    #[serde(rename = "501-1000")]
    up_to_1000: &'static str,
    #[serde(rename = "1001-5000")]
    up_to_5000: &'static str,
    #[serde(rename = "5000+")]
    over_5000: &'static str,
}

impl<'a> From<&'a ReportRow> for CsvReportRecord<'a> {
    fn from(row: &'a ReportRow) -> Self {
        let flag = |bucket: SizeBucket| match row.size_bucket {
            SizeBucket::Error => "error",
            active if active == bucket => "yes",
            _ => "no",
        };
        let members = match row.member_count {
            MemberCount::Known(n) => n.to_string(),
            MemberCount::Error(_) => ERROR_LITERAL.to_string(),
        };

        Self {
            primary_smtp_address: &row.primary_smtp_address,
            display_name: &row.display_name,
            group_type: row.group_type.as_str(),
            members,
            empty: flag(SizeBucket::Empty),
            up_to_10: flag(SizeBucket::UpTo10),
            up_to_100: flag(SizeBucket::UpTo100),
            up_to_200: flag(SizeBucket::UpTo200),
            up_to_500: flag(SizeBucket::UpTo500),
            up_to_1000: flag(SizeBucket::UpTo1000),
            up_to_5000: flag(SizeBucket::UpTo5000),
            over_5000: flag(SizeBucket::Over5000),
        }
    }
}

/// Writes rows as CSV with a header line.
///
/// # Errors
///
/// Returns `Output` if a record cannot be written.
pub fn write_csv<W: Write>(rows: &[ReportRow], writer: W) -> CensusResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    if rows.is_empty() {
        // serialize() emits the header with the first record only
        wtr.write_record(csv_header())?;
    }
    for row in rows {
        wtr.serialize(CsvReportRecord::from(row))?;
    }

    wtr.flush()?;
    Ok(())
}

/// Column names of the artifact.
#[must_use]
pub fn csv_header() -> [&'static str; 12] {
    [
        "PrimarySmtpAddress",
        "DisplayName",
        "GroupType",
        "Members",
        "Empty",
        "1-10",
        "11-100",
        "101-200",
        "201-500",
        "501-1000",
        "1001-5000",
        "5000+",
    ]
}

/// Artifact file name for a mode and run time.
#[must_use]
pub fn artifact_file_name(mode: ReportMode, started_at: DateTime<Local>) -> String {
    format!(
        "GroupMemberReport_{}_{}.csv",
        mode.file_tag(),
        started_at.format("%Y%m%d_%H%M%S")
    )
}

/// Writes the artifact into `dir`.
///
/// Rows go to a temporary file in the same directory which is renamed into
/// place only after a successful flush, so an interrupted run leaves no
/// partial report behind.
///
/// # Errors
///
/// Returns `Output` if the directory is not writable or persisting fails.
pub fn write_artifact(rows: &[ReportRow], dir: &Path, file_name: &str) -> CensusResult<PathBuf> {
    let target = dir.join(file_name);
    let mut tmp = tempfile::Builder::new()
        .prefix(".groupcensus-")
        .suffix(".csv.tmp")
        .tempfile_in(dir)?;

    write_csv(rows, tmp.as_file_mut())?;
    tmp.as_file().sync_all()?;
    tmp.persist(&target).map_err(|e| e.error)?;

    info!(path = %target.display(), rows = rows.len(), "Report written");
    Ok(target)
}

/// Aggregate statistics over a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Summary {
    pub total_rows: usize,
    pub valid_rows: usize,
    pub error_count: usize,
    /// Valid rows per group type.
    pub by_type: BTreeMap<String, usize>,
    /// Valid rows per numeric band, in band order.
    pub by_bucket: Vec<(SizeBucket, usize)>,
    /// Largest valid groups, descending.
    pub largest: Vec<LargestGroup>,
}

/// Entry of the largest-groups list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LargestGroup {
    pub group_type: GroupType,
    pub primary_smtp_address: String,
    pub display_name: String,
    pub member_count: u64,
}

impl Summary {
    /// Computes the summary of `rows`, keeping the `top_n` largest groups.
    #[must_use]
    pub fn from_rows(rows: &[ReportRow], top_n: usize) -> Self {
        let valid: Vec<(&ReportRow, u64)> = rows
            .iter()
            .filter_map(|r| r.member_count.value().map(|n| (r, n)))
            .collect();

        let mut by_type = BTreeMap::new();
        for group_type in GroupType::ALL {
            let count = valid
                .iter()
                .filter(|(r, _)| r.group_type == group_type)
                .count();
            by_type.insert(group_type.as_str().to_string(), count);
        }

        let by_bucket = SizeBucket::NUMERIC
            .iter()
            .map(|bucket| {
                let count = valid.iter().filter(|(r, _)| r.size_bucket == *bucket).count();
                (*bucket, count)
            })
            .collect();

        let mut ranked = valid.clone();
        // sort_by is stable: equal counts keep input order
        ranked.sort_by(|(_, a), (_, b)| b.cmp(a));
        let largest = ranked
            .into_iter()
            .take(top_n)
            .map(|(row, member_count)| LargestGroup {
                group_type: row.group_type,
                primary_smtp_address: row.primary_smtp_address.clone(),
                display_name: row.display_name.clone(),
                member_count,
            })
            .collect();

        let summary = Self {
            total_rows: rows.len(),
            valid_rows: valid.len(),
            error_count: rows.len() - valid.len(),
            by_type,
            by_bucket,
            largest,
        };
        debug!(?summary, "Summary computed");
        summary
    }

    /// Valid row count of one band.
    #[must_use]
    pub fn bucket_count(&self, bucket: SizeBucket) -> usize {
        self.by_bucket
            .iter()
            .find(|(b, _)| *b == bucket)
            .map_or(0, |(_, n)| *n)
    }

    /// Valid row count of one group type.
    #[must_use]
    pub fn type_count(&self, group_type: GroupType) -> usize {
        self.by_type.get(group_type.as_str()).copied().unwrap_or(0)
    }
}

/// Renders the console summary as plain lines.
///
/// Per-type counts appear only when both types were reported.
#[must_use]
pub fn render_summary(summary: &Summary, mode: ReportMode) -> Vec<String> {
    let mut lines = vec![
        format!("Groups processed: {}", summary.total_rows),
        format!("Valid: {}", summary.valid_rows),
        format!("Errors: {}", summary.error_count),
    ];

    if mode == ReportMode::All {
        lines.push(String::new());
        lines.push("By type:".to_string());
        for group_type in GroupType::ALL {
            lines.push(format!(
                "  {}: {}",
                group_type.as_str(),
                summary.type_count(group_type)
            ));
        }
    }

    lines.push(String::new());
    lines.push("By size:".to_string());
    for (bucket, count) in &summary.by_bucket {
        lines.push(format!("  {}: {}", bucket.label(), count));
    }

    if !summary.largest.is_empty() {
        lines.push(String::new());
        lines.push(format!("Largest {} groups:", summary.largest.len()));
        for (rank, group) in summary.largest.iter().enumerate() {
            let address = if group.primary_smtp_address.is_empty() {
                group.display_name.as_str()
            } else {
                group.primary_smtp_address.as_str()
            };
            lines.push(format!(
                "  {}. [{}] {} ({})",
                rank + 1,
                group.group_type.tag(),
                address,
                group.member_count
            ));
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::{GroupRecord, RawGroup};
    use crate::LookupError;

    fn row(address: &str, group_type: GroupType, count: Option<u64>) -> ReportRow {
        let member_count = match count {
            Some(n) => MemberCount::Known(n),
            None => MemberCount::Error(LookupError::LookupFailure("boom".into())),
        };
        ReportRow {
            primary_smtp_address: address.to_string(),
            display_name: address.split('@').next().unwrap_or_default().to_string(),
            group_type,
            size_bucket: SizeBucket::for_count(&member_count),
            member_count,
        }
    }

    fn csv_string(rows: &[ReportRow]) -> String {
        let mut buf = Vec::new();
        write_csv(rows, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_rows_from_counted_groups() {
        let counted = vec![
            CountedGroup {
                group: GroupRecord::from(RawGroup {
                    id: Some("m-1".to_string()),
                    display_name: Some("Project".to_string()),
                    mail: Some("project@contoso.com".to_string()),
                    group_types: vec!["Unified".to_string()],
                    ..Default::default()
                }),
                member_count: MemberCount::Known(42),
            },
            CountedGroup {
                group: GroupRecord::from(RawGroup {
                    id: Some("dl-1".to_string()),
                    display_name: Some("Sales".to_string()),
                    ..Default::default()
                }),
                member_count: MemberCount::Error(LookupError::MissingIdentifier),
            },
        ];

        let rows = build_rows(counted);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].primary_smtp_address, "project@contoso.com");
        assert_eq!(rows[0].display_name, "Project");
        assert_eq!(rows[0].group_type, GroupType::M365Group);
        assert_eq!(rows[0].size_bucket, SizeBucket::UpTo100);
        assert!(rows[0].is_valid());
        assert_eq!(rows[1].group_type, GroupType::DistributionList);
        assert_eq!(rows[1].size_bucket, SizeBucket::Error);
        assert!(!rows[1].is_valid());
    }

    #[test]
    fn test_csv_header_and_valid_row() {
        let out = csv_string(&[row("sales@contoso.com", GroupType::DistributionList, Some(150))]);
        let mut lines = out.lines();
        assert_eq!(
            lines.next().unwrap(),
            "PrimarySmtpAddress,DisplayName,GroupType,Members,Empty,1-10,11-100,101-200,201-500,501-1000,1001-5000,5000+"
        );
        assert_eq!(
            lines.next().unwrap(),
            "sales@contoso.com,sales,DistributionList,150,no,no,no,yes,no,no,no,no"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_csv_error_row() {
        let out = csv_string(&[row("broken@contoso.com", GroupType::M365Group, None)]);
        assert_eq!(
            out.lines().nth(1).unwrap(),
            "broken@contoso.com,broken,M365Group,ERROR,error,error,error,error,error,error,error,error"
        );
    }

    #[test]
    fn test_csv_empty_rows_still_has_header() {
        let out = csv_string(&[]);
        assert_eq!(out.lines().count(), 1);
        assert!(out.starts_with("PrimarySmtpAddress,"));
    }

    #[test]
    fn test_csv_quotes_display_names() {
        let mut r = row("team@contoso.com", GroupType::M365Group, Some(0));
        r.display_name = "Team, Europe".to_string();
        let out = csv_string(&[r]);
        assert!(out.contains("\"Team, Europe\""));
        assert!(out.contains(",0,yes,no,"));
    }

    #[test]
    fn test_artifact_file_name() {
        let at = Local::now();
        let name = artifact_file_name(ReportMode::M365Groups, at);
        assert!(name.starts_with("GroupMemberReport_M365_"));
        assert!(name.ends_with(".csv"));
        assert!(name.contains(&at.format("%Y%m%d_%H%M%S").to_string()));
        assert!(artifact_file_name(ReportMode::All, at).contains("_All_"));
        assert!(artifact_file_name(ReportMode::DistributionLists, at).contains("_DL_"));
    }

    #[test]
    fn test_summary_counts() {
        let rows = vec![
            row("a@x", GroupType::DistributionList, Some(0)),
            row("b@x", GroupType::M365Group, Some(150)),
            row("c@x", GroupType::DistributionList, None),
            row("d@x", GroupType::DistributionList, Some(7)),
        ];
        let summary = Summary::from_rows(&rows, DEFAULT_TOP_N);

        assert_eq!(summary.total_rows, 4);
        assert_eq!(summary.valid_rows, 3);
        assert_eq!(summary.error_count, 1);
        assert_eq!(summary.type_count(GroupType::DistributionList), 2);
        assert_eq!(summary.type_count(GroupType::M365Group), 1);
        assert_eq!(summary.bucket_count(SizeBucket::Empty), 1);
        assert_eq!(summary.bucket_count(SizeBucket::UpTo10), 1);
        assert_eq!(summary.bucket_count(SizeBucket::UpTo200), 1);
        assert_eq!(summary.bucket_count(SizeBucket::Error), 0);

        let bucket_total: usize = summary.by_bucket.iter().map(|(_, n)| n).sum();
        assert_eq!(bucket_total, summary.valid_rows);
    }

    #[test]
    fn test_top_n_is_stable_descending() {
        let rows = vec![
            row("five@x", GroupType::DistributionList, Some(5)),
            row("big-first@x", GroupType::DistributionList, Some(5000)),
            row("zero@x", GroupType::DistributionList, Some(0)),
            row("twelve@x", GroupType::M365Group, Some(12)),
            row("big-second@x", GroupType::M365Group, Some(5000)),
        ];
        let summary = Summary::from_rows(&rows, 5);

        let counts: Vec<_> = summary.largest.iter().map(|g| g.member_count).collect();
        assert_eq!(counts, vec![5000, 5000, 12, 5, 0]);
        assert_eq!(summary.largest[0].primary_smtp_address, "big-first@x");
        assert_eq!(summary.largest[1].primary_smtp_address, "big-second@x");
    }

    #[test]
    fn test_top_n_excludes_errors_and_truncates() {
        let rows = vec![
            row("a@x", GroupType::DistributionList, None),
            row("b@x", GroupType::DistributionList, Some(3)),
            row("c@x", GroupType::DistributionList, Some(9)),
        ];
        let summary = Summary::from_rows(&rows, 1);
        assert_eq!(summary.largest.len(), 1);
        assert_eq!(summary.largest[0].member_count, 9);
    }

    #[test]
    fn test_render_summary_all_mode() {
        let rows = vec![
            row("dl@x", GroupType::DistributionList, Some(0)),
            row("m365@x", GroupType::M365Group, Some(150)),
            row("", GroupType::DistributionList, None),
        ];
        let lines = render_summary(&Summary::from_rows(&rows, 5), ReportMode::All);

        assert!(lines.contains(&"Errors: 1".to_string()));
        assert!(lines.contains(&"  Empty: 1".to_string()));
        assert!(lines.contains(&"  101-200: 1".to_string()));
        assert!(lines.contains(&"  M365Group: 1".to_string()));
        assert!(lines.contains(&"  1. [M365] m365@x (150)".to_string()));
        assert!(lines.contains(&"  2. [DL] dl@x (0)".to_string()));
    }

    #[test]
    fn test_render_summary_single_mode_omits_types() {
        let rows = vec![row("dl@x", GroupType::DistributionList, Some(3))];
        let lines = render_summary(&Summary::from_rows(&rows, 5), ReportMode::DistributionLists);
        assert!(!lines.iter().any(|l| l.starts_with("By type")));
        assert!(lines.contains(&"  1-10: 1".to_string()));
    }

    #[test]
    fn test_write_artifact_leaves_only_final_file() {
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![row("a@x", GroupType::DistributionList, Some(1))];

        let path = write_artifact(&rows, dir.path(), "report.csv").unwrap();

        assert_eq!(path, dir.path().join("report.csv"));
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("a@x,a,DistributionList,1,no,yes"));
    }

    #[test]
    fn test_write_artifact_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = write_artifact(&[], &missing, "report.csv").unwrap_err();
        assert!(matches!(err, crate::CensusError::Output(_)));
    }
}
