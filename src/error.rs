//! # Errors
//!
//! Admission failures reported by `Scheduler::submit`. Every other
//! operation is infallible.

use core::fmt;

/// Result alias for scheduler operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Reasons a submission was not admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// The submission carried no handler.
    InvalidArgument,
    /// Every slot is occupied. Retry after a poll or raise the capacity.
    TableFull,
    /// `RejectIfPending` found a matching task already pending.
    /// The pending task is left untouched.
    AlreadyScheduled,
}

impl Error {
    /// Short static description, usable without a formatter.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidArgument => "no handler supplied",
            Self::TableFull => "task table is full",
            Self::AlreadyScheduled => "matching task already pending",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_descriptions_are_distinct() {
        assert_ne!(Error::TableFull.as_str(), Error::AlreadyScheduled.as_str());
        assert_ne!(Error::InvalidArgument.as_str(), Error::TableFull.as_str());
    }
}
