//! Decorator behaviors.
//!
//! A decorator wraps exactly one child and rewrites the status it reports.
//! `Running` always passes through untouched so the child can be resumed.

use strum::Display;

use crate::Status;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DecoratorKind {
    /// Reports the child's status unchanged.
    #[default]
    Passthrough,

    /// Swaps `Success` and `Failure` (logical NOT).
    Inverter,

    /// Turns `Failure` into `Success`.
    ///
    /// Useful for optional steps that must not fail an enclosing sequence.
    Succeeder,
}

impl DecoratorKind {
    /// Maps the child's status to the status the decorator reports.
    #[inline]
    pub fn apply(self, child: Status) -> Status {
        match self {
            DecoratorKind::Passthrough => child,
            DecoratorKind::Inverter => child.invert(),
            DecoratorKind::Succeeder => match child {
                Status::Failure => Status::Success,
                other => other,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passthrough_is_identity() {
        for status in [Status::Success, Status::Failure, Status::Running] {
            assert_eq!(DecoratorKind::Passthrough.apply(status), status);
        }
    }

    #[test]
    fn inverter_swaps_outcomes() {
        assert_eq!(DecoratorKind::Inverter.apply(Status::Success), Status::Failure);
        assert_eq!(DecoratorKind::Inverter.apply(Status::Failure), Status::Success);
        assert_eq!(DecoratorKind::Inverter.apply(Status::Running), Status::Running);
    }

    #[test]
    fn succeeder_hides_failure() {
        assert_eq!(DecoratorKind::Succeeder.apply(Status::Failure), Status::Success);
        assert_eq!(DecoratorKind::Succeeder.apply(Status::Success), Status::Success);
        assert_eq!(DecoratorKind::Succeeder.apply(Status::Running), Status::Running);
    }
}
