//! Transitive member-count aggregation.
//!
//! Each group is looked up once. A failed lookup becomes a
//! [`MemberCount::Error`] value and never stops the batch.

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::bucket::MemberCount;
use crate::group::GroupRecord;
use crate::source::DirectoryReader;
use crate::LookupError;

/// Upper bound for concurrent lookups.
pub const MAX_CONCURRENCY: usize = 10;

/// A group together with its lookup outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountedGroup {
    /// The classified group.
    pub group: GroupRecord,
    /// Lookup outcome for the group.
    pub member_count: MemberCount,
}

/// Looks up the transitive member count of one group.
///
/// A missing or blank identifier fails locally without a directory call.
pub async fn count_group<R>(reader: &R, group: &GroupRecord) -> MemberCount
where
    R: DirectoryReader + ?Sized,
{
    match group.lookup_id() {
        Some(id) => reader.transitive_member_count(id).await.into(),
        None => MemberCount::Error(LookupError::MissingIdentifier),
    }
}

/// Counts members for every group, in input order.
///
/// `concurrency` is clamped to `1..=MAX_CONCURRENCY`; `1` is strictly
/// sequential. Output order never depends on completion order.
pub async fn count_members<R>(
    reader: &R,
    groups: Vec<GroupRecord>,
    concurrency: usize,
) -> Vec<CountedGroup>
where
    R: DirectoryReader + ?Sized,
{
    let total = groups.len();
    let concurrency = concurrency.clamp(1, MAX_CONCURRENCY);

    stream::iter(groups.into_iter().enumerate())
        .map(move |(index, group)| async move {
            let member_count = count_group(reader, &group).await;
            match &member_count {
                MemberCount::Known(n) => debug!(
                    index = index + 1,
                    total,
                    group = group.label(),
                    members = n,
                    "Counted members"
                ),
                MemberCount::Error(e) => warn!(
                    index = index + 1,
                    total,
                    group = group.label(),
                    error = %e,
                    "Failed to count members"
                ),
            }
            CountedGroup {
                group,
                member_count,
            }
        })
        .buffered(concurrency)
        .collect()
        .await
}
