//! Mode filtering and processing cap.

use thiserror::Error;

use crate::group::{GroupRecord, GroupType, RawGroup};
use crate::mode::{ProcessingCap, ReportMode};

/// No group matched the requested mode and cap.
///
/// Not fatal: the run ends cleanly without writing an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("No groups matched the requested mode")]
pub struct EmptySelection;

/// Classifies every fetched entry, preserving fetch order.
#[must_use]
pub fn classify_all(raw: Vec<RawGroup>) -> Vec<GroupRecord> {
    raw.into_iter().map(GroupRecord::from).collect()
}

/// Number of records per group type.
#[must_use]
pub fn count_by_type(groups: &[GroupRecord]) -> (usize, usize) {
    let m365 = groups
        .iter()
        .filter(|g| g.group_type() == GroupType::M365Group)
        .count();
    (groups.len() - m365, m365)
}

/// Keeps the groups admitted by `mode`, then the first `cap` of them.
///
/// # Errors
///
/// Returns `EmptySelection` if nothing remains.
pub fn select(
    groups: Vec<GroupRecord>,
    mode: ReportMode,
    cap: ProcessingCap,
) -> Result<Vec<GroupRecord>, EmptySelection> {
    let admitted = groups.into_iter().filter(|g| mode.admits(g.group_type()));
    let selected: Vec<_> = match cap.limit() {
        Some(n) => admitted.take(n).collect(),
        None => admitted.collect(),
    };

    if selected.is_empty() {
        Err(EmptySelection)
    } else {
        Ok(selected)
    }
}
