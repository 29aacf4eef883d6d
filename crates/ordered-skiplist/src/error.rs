use std::result::Result as StdResult;

use thiserror::Error;


pub type Result<T> = StdResult<T, SkiplistError>;


/// Errors reported by [`Skiplist`] operations.
///
/// Every operation which returns an error leaves the skiplist exactly as it was before the call.
///
/// [`Skiplist`]: crate::Skiplist
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum SkiplistError {
    /// Indexed access with an index which is not less than the length of the skiplist.
    #[error("index {index} is out of range for a skiplist of length {len}")]
    OutOfRange {
        index: usize,
        len:   usize,
    },
    /// A position or iterator was advanced past the end of the skiplist.
    #[error("cannot advance a skiplist position past the end")]
    AdvancePastEnd,
    /// The end position was given as the position to erase.
    #[error("cannot erase the end position of a skiplist")]
    EraseEnd,
    /// The position refers to an entry which has since been erased.
    #[error("the skiplist position refers to an entry which was already erased")]
    StalePosition,
    /// The end of an erase range is not at or after its start.
    #[error("the end of the erase range does not follow its start")]
    InvalidRange,
    /// A level probability outside the open interval `(0, 1)`.
    #[error("the level probability must be strictly between 0 and 1, but was {0}")]
    InvalidProbability(f32),
    /// A maximum level which does not fit in the fixed-size search path.
    #[error("the max level must be less than {cap}, but was {max_level}")]
    InvalidMaxLevel {
        max_level: usize,
        cap:       usize,
    },
}

impl SkiplistError {
    /// Whether this error reports an index, advance, or erase which fell outside the entries of
    /// the skiplist.
    #[must_use]
    pub const fn is_out_of_range(&self) -> bool {
        matches!(self, Self::OutOfRange { .. } | Self::AdvancePastEnd | Self::EraseEnd)
    }

    /// Whether this error reports an invalid skiplist configuration.
    #[must_use]
    pub const fn is_invalid_configuration(&self) -> bool {
        matches!(self, Self::InvalidProbability(_) | Self::InvalidMaxLevel { .. })
    }
}
