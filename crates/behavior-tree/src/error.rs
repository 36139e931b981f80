//! Error types raised while assembling or driving a tree.
//!
//! The engine treats all of these as programming or configuration defects.
//! The `try_*` entry points hand them back as values; the plain entry points
//! log and panic with the same message.

use thiserror::Error;

use crate::arena::ArenaError;
use crate::node::{NodeIndex, NodeKind};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("node storage allocation failed: {0}")]
    Arena(#[from] ArenaError),

    #[error("child {child} does not exist (tree holds {len} nodes)")]
    UnknownChild { child: NodeIndex, len: usize },

    #[error("{kind} node must have at least one child")]
    EmptyComposite { kind: NodeKind },

    #[error("decorator node must wrap exactly one child, got {count}")]
    DecoratorArity { count: usize },

    #[error("action node cannot have children, got {count}")]
    UnexpectedChildren { count: usize },

    #[error("action nodes must be created with an action value")]
    MissingAction,

    #[error("node {0} does not exist")]
    UnknownNode(NodeIndex),

    #[error("tree has no nodes to tick")]
    EmptyTree,

    #[error("node {0} terminated twice without an update in between")]
    DoubleTerminate(NodeIndex),

    #[error("action node {0} reported Invalid from update")]
    InvalidActionStatus(NodeIndex),

    #[error("{what} {value} does not fit in a 32-bit index")]
    IndexOverflow { what: &'static str, value: usize },
}

pub type Result<T> = std::result::Result<T, TreeError>;

/// Narrows a table position to the 32-bit form stored in node records.
pub(crate) fn narrow(value: usize, what: &'static str) -> Result<u32> {
    u32::try_from(value).map_err(|_| TreeError::IndexOverflow { what, value })
}

/// Logs `err` and aborts the current operation.
pub(crate) fn fatal(err: TreeError) -> ! {
    tracing::error!(%err, "behavior tree precondition violated");
    panic!("{err}");
}
