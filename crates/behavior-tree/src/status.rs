//! Status returned by behavior nodes.

use strum::Display;

/// The result of evaluating a behavior node.
///
/// A node starts out [`Status::Invalid`] and only ever reports one of the
/// other three variants once it has been ticked.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    /// The node has never been evaluated.
    #[default]
    Invalid,

    /// The behavior completed successfully.
    Success,

    /// The behavior failed.
    Failure,

    /// The behavior has not finished yet.
    ///
    /// A running node is resumed on the next tick without being
    /// re-initialized.
    Running,
}

impl Status {
    /// Returns `true` if this status is `Success`.
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }

    /// Returns `true` if this status is `Failure`.
    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, Status::Failure)
    }

    /// Returns `true` if this status is `Running`.
    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, Status::Running)
    }

    /// Returns `true` for `Success` and `Failure`.
    #[inline]
    pub fn is_complete(self) -> bool {
        matches!(self, Status::Success | Status::Failure)
    }

    /// Swaps `Success` and `Failure`; `Running` and `Invalid` are unchanged.
    #[inline]
    pub fn invert(self) -> Self {
        match self {
            Status::Success => Status::Failure,
            Status::Failure => Status::Success,
            other => other,
        }
    }
}
