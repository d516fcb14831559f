//! Size bands for member counts.

use std::fmt;

use crate::LookupError;

/// Outcome of a transitive member-count lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberCount {
    /// Lookup succeeded.
    Known(u64),
    /// Lookup failed; the row is reported as an error.
    Error(LookupError),
}

impl MemberCount {
    /// Returns the count if the lookup succeeded.
    #[must_use]
    pub fn value(&self) -> Option<u64> {
        match self {
            Self::Known(n) => Some(*n),
            Self::Error(_) => None,
        }
    }

    /// Returns true if the lookup failed.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl From<Result<u64, LookupError>> for MemberCount {
    fn from(result: Result<u64, LookupError>) -> Self {
        match result {
            Ok(n) => Self::Known(n),
            Err(e) => Self::Error(e),
        }
    }
}

/// Mutually exclusive size band of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SizeBucket {
    /// No members.
    Empty,
    /// 1 to 10 members.
    UpTo10,
    /// 11 to 100 members.
    UpTo100,
    /// 101 to 200 members.
    UpTo200,
    /// 201 to 500 members.
    UpTo500,
    /// 501 to 1000 members.
    UpTo1000,
    /// 1001 to 5000 members.
    UpTo5000,
    /// More than 5000 members.
    Over5000,
    /// The member count lookup failed.
    Error,
}

impl SizeBucket {
    /// Numeric bands in ascending order, `Error` excluded.
    pub const NUMERIC: [SizeBucket; 8] = [
        SizeBucket::Empty,
        SizeBucket::UpTo10,
        SizeBucket::UpTo100,
        SizeBucket::UpTo200,
        SizeBucket::UpTo500,
        SizeBucket::UpTo1000,
        SizeBucket::UpTo5000,
        SizeBucket::Over5000,
    ];

    /// Maps a member count to its band.
    #[must_use]
    pub fn for_count(count: &MemberCount) -> Self {
        match count {
            MemberCount::Error(_) => Self::Error,
            MemberCount::Known(n) => Self::for_value(*n),
        }
    }

    /// Maps a known member count to its band.
    #[must_use]
    pub fn for_value(n: u64) -> Self {
        match n {
            0 => Self::Empty,
            1..=10 => Self::UpTo10,
            11..=100 => Self::UpTo100,
            101..=200 => Self::UpTo200,
            201..=500 => Self::UpTo500,
            501..=1000 => Self::UpTo1000,
            1001..=5000 => Self::UpTo5000,
            _ => Self::Over5000,
        }
    }

    /// Column header and summary label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::UpTo10 => "1-10",
            Self::UpTo100 => "11-100",
            Self::UpTo200 => "101-200",
            Self::UpTo500 => "201-500",
            Self::UpTo1000 => "501-1000",
            Self::UpTo5000 => "1001-5000",
            Self::Over5000 => "5000+",
            Self::Error => "Error",
        }
    }
}

impl fmt::Display for SizeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Pure band assignment.
#[must_use]
pub fn bucket_for(count: &MemberCount) -> SizeBucket {
    SizeBucket::for_count(count)
}
