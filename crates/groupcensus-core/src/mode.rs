//! Report mode and processing cap.

use std::fmt;

use crate::group::GroupType;
use crate::{CensusError, CensusResult};

/// Which group types a run reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportMode {
    /// Distribution Lists only.
    #[default]
    DistributionLists,
    /// Microsoft 365 groups only.
    M365Groups,
    /// Both group types.
    All,
}

impl ReportMode {
    /// Resolves the mode from the three mutually exclusive selection flags.
    ///
    /// No flag selects Distribution Lists.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArguments` if more than one flag is set.
    pub fn from_flags(dl: bool, m365: bool, all: bool) -> CensusResult<Self> {
        match (dl, m365, all) {
            (false, false, false) | (true, false, false) => Ok(Self::DistributionLists),
            (false, true, false) => Ok(Self::M365Groups),
            (false, false, true) => Ok(Self::All),
            _ => Err(CensusError::InvalidArguments(
                "only one of --dl, --m365 or --all may be given".to_string(),
            )),
        }
    }

    /// Returns the single group type this mode admits, or `None` for `All`.
    #[must_use]
    pub fn group_type(self) -> Option<GroupType> {
        match self {
            Self::DistributionLists => Some(GroupType::DistributionList),
            Self::M365Groups => Some(GroupType::M365Group),
            Self::All => None,
        }
    }

    /// Returns true if a group of the given type is selected by this mode.
    #[must_use]
    pub fn admits(self, group_type: GroupType) -> bool {
        self.group_type().is_none_or(|t| t == group_type)
    }

    /// Short tag embedded in the artifact file name.
    #[must_use]
    pub fn file_tag(self) -> &'static str {
        match self {
            Self::DistributionLists => "DL",
            Self::M365Groups => "M365",
            Self::All => "All",
        }
    }
}

impl fmt::Display for ReportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DistributionLists => write!(f, "Distribution Lists"),
            Self::M365Groups => write!(f, "Microsoft 365 Groups"),
            Self::All => write!(f, "All mail-enabled groups"),
        }
    }
}

/// Upper bound on the number of groups processed in one run.
///
/// Zero means no limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProcessingCap(Option<usize>);

impl ProcessingCap {
    /// No limit.
    pub const UNLIMITED: Self = Self(None);

    /// Creates a cap, treating zero as unlimited.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        if limit == 0 {
            Self(None)
        } else {
            Self(Some(limit))
        }
    }

    /// Returns the limit, or `None` if unlimited.
    #[must_use]
    pub fn limit(self) -> Option<usize> {
        self.0
    }
}

impl From<usize> for ProcessingCap {
    fn from(limit: usize) -> Self {
        Self::new(limit)
    }
}
