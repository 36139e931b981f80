//! Flat, append-only node storage.
//!
//! Node records and child lists are bump-allocated from the tree's
//! [`LinearArena`]; the store itself only keeps one handle per node, so
//! building a tree performs no per-node heap allocation once the handle
//! table has reached its reserved capacity.

use crate::arena::{ArenaRef, LinearArena};
use crate::error::{Result, TreeError, fatal, narrow};
use crate::node::{NodeIndex, NodeKind, NodeRecord};

pub(crate) struct NodeStore {
    arena: LinearArena,
    slots: Vec<ArenaRef<NodeRecord>>,
}

impl NodeStore {
    pub fn new(arena_capacity: usize, node_capacity: usize) -> Self {
        Self {
            arena: LinearArena::new(arena_capacity),
            slots: Vec::with_capacity(node_capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn contains(&self, index: NodeIndex) -> bool {
        index.get() < self.slots.len()
    }

    #[inline]
    pub fn arena(&self) -> &LinearArena {
        &self.arena
    }

    /// Appends a node after checking its shape against `kind`.
    ///
    /// Nothing is allocated unless every check passes, so a rejected node
    /// leaves the store unchanged.
    pub fn push(
        &mut self,
        kind: NodeKind,
        children: &[NodeIndex],
        action: Option<u32>,
    ) -> Result<NodeIndex> {
        self.validate(kind, children, action.is_some())?;
        let index = NodeIndex(narrow(self.slots.len(), "node index")?);

        let children = self.arena.try_alloc_slice(children)?;
        let record = self.arena.try_alloc(NodeRecord::new(kind, children, action))?;

        self.slots.push(record);
        Ok(index)
    }

    pub fn record(&self, index: NodeIndex) -> &NodeRecord {
        self.arena.get(self.slot(index))
    }

    pub fn record_mut(&mut self, index: NodeIndex) -> &mut NodeRecord {
        let slot = self.slot(index);
        self.arena.get_mut(slot)
    }

    pub fn children(&self, index: NodeIndex) -> &[NodeIndex] {
        self.arena.slice(self.record(index).children)
    }

    #[inline]
    pub fn child_at(&self, index: NodeIndex, position: usize) -> NodeIndex {
        self.children(index)[position]
    }

    /// Drops every node and rewinds the arena.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.arena.clear();
    }

    fn slot(&self, index: NodeIndex) -> ArenaRef<NodeRecord> {
        match self.slots.get(index.get()) {
            Some(slot) => *slot,
            None => fatal(TreeError::UnknownNode(index)),
        }
    }

    fn validate(&self, kind: NodeKind, children: &[NodeIndex], has_action: bool) -> Result<()> {
        if let Some(&child) = children.iter().find(|child| !self.contains(**child)) {
            return Err(TreeError::UnknownChild {
                child,
                len: self.len(),
            });
        }

        match kind {
            NodeKind::Sequence | NodeKind::Selector if children.is_empty() => {
                Err(TreeError::EmptyComposite { kind })
            }
            NodeKind::Decorator(_) if children.len() != 1 => Err(TreeError::DecoratorArity {
                count: children.len(),
            }),
            NodeKind::Action if !children.is_empty() => Err(TreeError::UnexpectedChildren {
                count: children.len(),
            }),
            NodeKind::Action if !has_action => Err(TreeError::MissingAction),
            _ => Ok(()),
        }
    }
}
