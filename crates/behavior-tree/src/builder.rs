//! Builder utilities for ergonomic behavior tree construction.
//!
//! Trees are assembled bottom-up: create the leaves first, then wrap them in
//! composites. Each helper forwards to [`BehaviorTree::create_node`] (or its
//! action counterpart) and returns the new node's index.

use crate::behavior::{Action, FnAction};
use crate::decorator::DecoratorKind;
use crate::error::{Result, fatal};
use crate::node::{NodeIndex, NodeKind};
use crate::{BehaviorTree, Status};

/// Wraps a closure as an [`Action`].
///
/// Shorthand for `FnAction(f)`.
#[inline]
pub fn action_fn<C, F>(f: F) -> FnAction<F>
where
    F: FnMut(&mut C) -> Status,
{
    FnAction(f)
}

impl<C> BehaviorTree<C> {
    /// Creates a sequence node.
    ///
    /// Shorthand for `create_node(NodeKind::Sequence, children)`.
    #[inline]
    pub fn sequence(&mut self, children: &[NodeIndex]) -> NodeIndex {
        self.create_node(NodeKind::Sequence, children)
    }

    /// Creates a selector node.
    ///
    /// Shorthand for `create_node(NodeKind::Selector, children)`.
    #[inline]
    pub fn selector(&mut self, children: &[NodeIndex]) -> NodeIndex {
        self.create_node(NodeKind::Selector, children)
    }

    /// Creates a decorator node around `child`.
    #[inline]
    pub fn decorate(&mut self, decorator: DecoratorKind, child: NodeIndex) -> NodeIndex {
        self.create_node(NodeKind::Decorator(decorator), &[child])
    }

    #[inline]
    pub fn inverter(&mut self, child: NodeIndex) -> NodeIndex {
        self.decorate(DecoratorKind::Inverter, child)
    }

    #[inline]
    pub fn succeeder(&mut self, child: NodeIndex) -> NodeIndex {
        self.decorate(DecoratorKind::Succeeder, child)
    }

    /// Creates an action leaf owning `action`.
    pub fn action<A>(&mut self, action: A) -> NodeIndex
    where
        A: Action<C> + 'static,
    {
        match self.try_action(action) {
            Ok(index) => index,
            Err(err) => fatal(err),
        }
    }

    pub fn try_action<A>(&mut self, action: A) -> Result<NodeIndex>
    where
        A: Action<C> + 'static,
    {
        self.insert(NodeKind::Action, &[], Some(Box::new(action)))
    }
}
