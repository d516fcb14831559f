//! Directory read seam and fetch planning.
//!
//! Type filtering happens client-side after retrieval, so a capped run in a
//! single-type mode over-fetches by a multiplier. The multiplier is a
//! performance hint only: a tenant where the requested type is rarer than
//! one in `multiplier` records can still under-fill the cap. When the
//! directory supports it, pushing the type filter to the server removes the
//! need for over-fetching.

use async_trait::async_trait;

use crate::group::{GroupType, RawGroup};
use crate::mode::{ProcessingCap, ReportMode};
use crate::{CensusResult, LookupError};

/// Default over-fetch multiplier for capped single-type runs.
pub const DEFAULT_OVER_FETCH_MULTIPLIER: usize = 3;

/// Parameters of a group listing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GroupQuery {
    /// Maximum number of records to return, `None` for exhaustive.
    pub limit: Option<usize>,
    /// Server-side type filter, if the reader should apply one.
    pub type_filter: Option<GroupType>,
}

/// Read access to the directory.
#[async_trait]
pub trait DirectoryReader: Send + Sync {
    /// Checks that a directory session can be established.
    async fn verify_connection(&self) -> CensusResult<()>;

    /// Lists mail-enabled groups.
    ///
    /// Only mail-enabled entries are returned. No ordering is guaranteed.
    async fn list_mail_enabled_groups(&self, query: &GroupQuery) -> CensusResult<Vec<RawGroup>>;

    /// Returns the transitive member count of one group.
    async fn transitive_member_count(&self, group_id: &str) -> Result<u64, LookupError>;
}

/// How the type filter is applied for single-type modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStrategy {
    /// Filter after retrieval, over-fetching by the given multiplier.
    ClientSide { multiplier: usize },
    /// Ask the directory to filter by type.
    ServerSide,
}

impl Default for FetchStrategy {
    fn default() -> Self {
        Self::ClientSide {
            multiplier: DEFAULT_OVER_FETCH_MULTIPLIER,
        }
    }
}

/// Resolved listing request for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPlan {
    query: GroupQuery,
    cap: ProcessingCap,
}

impl FetchPlan {
    /// Plans the listing call for a mode and cap.
    #[must_use]
    pub fn new(mode: ReportMode, cap: ProcessingCap, strategy: FetchStrategy) -> Self {
        let query = match (cap.limit(), mode.group_type(), strategy) {
            (None, type_filter, FetchStrategy::ServerSide) => GroupQuery {
                limit: None,
                type_filter,
            },
            (None, _, FetchStrategy::ClientSide { .. }) => GroupQuery::default(),
            (Some(n), None, _) => GroupQuery {
                limit: Some(n),
                type_filter: None,
            },
            (Some(n), Some(_), FetchStrategy::ClientSide { multiplier }) => GroupQuery {
                limit: Some(n.saturating_mul(multiplier.max(1))),
                type_filter: None,
            },
            (Some(n), type_filter @ Some(_), FetchStrategy::ServerSide) => GroupQuery {
                limit: Some(n),
                type_filter,
            },
        };
        Self { query, cap }
    }

    /// The listing request.
    #[must_use]
    pub fn query(&self) -> &GroupQuery {
        &self.query
    }

    /// Returns true if a short selection may be explained by the fetch bound.
    ///
    /// That is the case when the listing came back full and the selection
    /// still holds fewer records than the cap.
    #[must_use]
    pub fn may_have_under_fetched(&self, fetched: usize, selected: usize) -> bool {
        match (self.query.limit, self.cap.limit()) {
            (Some(limit), Some(cap)) => fetched >= limit && selected < cap,
            _ => false,
        }
    }
}
