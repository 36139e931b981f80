//! Node identities, kinds and the per-node record kept in the arena.

use std::fmt;

use strum::Display;

use crate::Status;
use crate::arena::ArenaSlice;
use crate::decorator::DecoratorKind;

/// Stable handle to a node inside one [`BehaviorTree`](crate::BehaviorTree).
///
/// Indices are assigned densely in creation order, starting at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub(crate) u32);

impl NodeIndex {
    /// Position of the node in creation order.
    #[inline]
    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Composition rule of a node.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Runs children in order until one fails (logical AND).
    Sequence,
    /// Runs children in order until one succeeds (logical OR).
    Selector,
    /// Wraps a single child and rewrites its status.
    Decorator(DecoratorKind),
    /// Leaf node backed by a user-supplied [`Action`](crate::Action).
    Action,
}

impl NodeKind {
    /// Returns `true` for [`NodeKind::Sequence`] and [`NodeKind::Selector`].
    #[inline]
    pub fn is_composite(self) -> bool {
        matches!(self, NodeKind::Sequence | NodeKind::Selector)
    }
}

/// Everything the executor tracks for one node.
///
/// The record is `Copy` so it can live in the arena without a destructor;
/// actions are stored separately and referenced by slot.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NodeRecord {
    pub kind: NodeKind,
    pub status: Status,
    /// Composite progress marker. Unused by other kinds.
    pub cursor: u32,
    pub children: ArenaSlice<NodeIndex>,
    /// Slot in the tree's action table, set for `NodeKind::Action` only.
    pub action: Option<u32>,
    /// Set once `update` returned a finished status and cleared by `terminate`.
    pub awaiting_terminate: bool,
}

impl NodeRecord {
    pub fn new(kind: NodeKind, children: ArenaSlice<NodeIndex>, action: Option<u32>) -> Self {
        Self {
            kind,
            status: Status::Invalid,
            cursor: 0,
            children,
            action,
            awaiting_terminate: false,
        }
    }
}
