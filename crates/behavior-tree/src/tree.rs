//! The behavior tree executor.
//!
//! [`BehaviorTree`] owns every node of one tree: node records and child
//! lists live in its arena, leaf actions in a side table. Nodes reference
//! each other by [`NodeIndex`] only, and since a node can only list children
//! that already exist, a tree is acyclic by construction.
//!
//! # Evaluation protocol
//!
//! Every time a node is visited during a tick:
//!
//! 1. unless its last status is `Running`, it is initialized
//!    (composites rewind their cursor, actions get `initialize`);
//! 2. it is updated and produces a status;
//! 3. unless that status is `Running`, it is terminated;
//! 4. the status is recorded on the node and returned to the parent.
//!
//! A `Running` status therefore suspends the tree exactly where it stands:
//! the next tick walks back down the same path without re-initializing it.

use crate::behavior::Action;
use crate::config::TreeConfig;
use crate::error::{Result, TreeError, fatal, narrow};
use crate::node::{NodeIndex, NodeKind};
use crate::store::NodeStore;
use crate::{LinearArena, Status};

pub struct BehaviorTree<C> {
    pub(crate) store: NodeStore,
    actions: Vec<Box<dyn Action<C>>>,
    root: Option<NodeIndex>,
    ticks: u64,
}

impl<C> BehaviorTree<C> {
    pub fn new(config: TreeConfig) -> Self {
        tracing::debug!(
            arena_capacity = config.arena_capacity,
            node_capacity = config.node_capacity,
            "creating behavior tree"
        );
        Self {
            store: NodeStore::new(config.arena_capacity, config.node_capacity),
            actions: Vec::new(),
            root: None,
            ticks: 0,
        }
    }

    /// Creates a tree with an arena of `arena_capacity` bytes.
    pub fn with_capacity(arena_capacity: usize) -> Self {
        Self::new(TreeConfig {
            arena_capacity,
            ..TreeConfig::default()
        })
    }

    /// Appends a composite or decorator node and returns its index.
    ///
    /// Children must already exist. Action leaves carry a value and are
    /// created with [`action`](Self::action) instead.
    ///
    /// # Panics
    ///
    /// Panics on any [`TreeError`], including arena exhaustion.
    pub fn create_node(&mut self, kind: NodeKind, children: &[NodeIndex]) -> NodeIndex {
        match self.try_create_node(kind, children) {
            Ok(index) => index,
            Err(err) => fatal(err),
        }
    }

    pub fn try_create_node(&mut self, kind: NodeKind, children: &[NodeIndex]) -> Result<NodeIndex> {
        self.insert(kind, children, None)
    }

    pub(crate) fn insert(
        &mut self,
        kind: NodeKind,
        children: &[NodeIndex],
        action: Option<Box<dyn Action<C>>>,
    ) -> Result<NodeIndex> {
        let slot = if action.is_some() {
            Some(narrow(self.actions.len(), "action slot")?)
        } else {
            None
        };
        let index = self.store.push(kind, children, slot)?;
        if let Some(action) = action {
            self.actions.push(action);
        }

        tracing::debug!(
            node = %index,
            %kind,
            children = children.len(),
            arena_used = self.store.arena().used(),
            "created node"
        );
        Ok(index)
    }

    /// Selects the node evaluated by [`tick`](Self::tick).
    ///
    /// Without an explicit root, the most recently created node is used,
    /// which is the top of a tree assembled bottom-up.
    pub fn set_root(&mut self, root: NodeIndex) {
        if let Err(err) = self.try_set_root(root) {
            fatal(err);
        }
    }

    pub fn try_set_root(&mut self, root: NodeIndex) -> Result<()> {
        if !self.store.contains(root) {
            return Err(TreeError::UnknownNode(root));
        }
        self.root = Some(root);
        Ok(())
    }

    pub fn root(&self) -> Option<NodeIndex> {
        self.root.or_else(|| {
            self.store
                .len()
                .checked_sub(1)
                .map(|last| NodeIndex(last as u32))
        })
    }

    /// Runs one evaluation pass from the root and returns its status.
    ///
    /// # Panics
    ///
    /// Panics if the tree is empty or an action breaks the protocol.
    pub fn tick(&mut self, ctx: &mut C) -> Status {
        match self.try_tick(ctx) {
            Ok(status) => status,
            Err(err) => fatal(err),
        }
    }

    /// Like [`tick`](Self::tick), but reports an empty tree as an error.
    ///
    /// Protocol violations raised by nodes during the pass still panic.
    pub fn try_tick(&mut self, ctx: &mut C) -> Result<Status> {
        let root = self.root().ok_or(TreeError::EmptyTree)?;
        let status = self.evaluate(root, ctx);
        self.ticks += 1;

        tracing::debug!(tick = self.ticks, root = %root, %status, "tick complete");
        Ok(status)
    }

    /// Status reported by the root on the last tick.
    pub fn status(&self) -> Status {
        self.root()
            .map_or(Status::Invalid, |root| self.status_of(root))
    }

    pub fn status_of(&self, index: NodeIndex) -> Status {
        self.store.record(index).status
    }

    /// Composite progress marker of `index`; always zero for other kinds.
    pub fn cursor_of(&self, index: NodeIndex) -> usize {
        self.store.record(index).cursor as usize
    }

    pub fn kind_of(&self, index: NodeIndex) -> NodeKind {
        self.store.record(index).kind
    }

    pub fn children_of(&self, index: NodeIndex) -> &[NodeIndex] {
        self.store.children(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.len() == 0
    }

    /// Number of completed ticks since creation or the last clear.
    #[inline]
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// The arena holding node storage, for usage statistics.
    #[inline]
    pub fn arena(&self) -> &LinearArena {
        self.store.arena()
    }

    /// Removes every node and action and rewinds the arena.
    ///
    /// Indices handed out before the clear no longer name the same nodes and
    /// must be discarded.
    pub fn clear(&mut self) {
        tracing::debug!(nodes = self.store.len(), "clearing behavior tree");
        self.store.clear();
        self.actions.clear();
        self.root = None;
        self.ticks = 0;
    }

    /// Evaluates one node following the initialize/update/terminate protocol.
    pub(crate) fn evaluate(&mut self, index: NodeIndex, ctx: &mut C) -> Status {
        if !self.store.record(index).status.is_running() {
            self.initialize(index, ctx);
        }

        let status = self.update(index, ctx);

        if !status.is_running() {
            self.terminate(index, ctx, status);
        }

        self.store.record_mut(index).status = status;
        tracing::trace!(node = %index, %status, "evaluated");
        status
    }

    fn initialize(&mut self, index: NodeIndex, ctx: &mut C) {
        let record = self.store.record_mut(index);
        record.cursor = 0;
        if let Some(slot) = record.action {
            self.actions[slot as usize].initialize(ctx);
        }
    }

    /// Produces the node's status; a completed status arms `terminate`.
    fn update(&mut self, index: NodeIndex, ctx: &mut C) -> Status {
        let record = *self.store.record(index);
        let status = match record.kind {
            NodeKind::Sequence => self.update_sequence(index, ctx),
            NodeKind::Selector => self.update_selector(index, ctx),
            NodeKind::Decorator(decorator) => {
                let child = self.store.child_at(index, 0);
                decorator.apply(self.evaluate(child, ctx))
            }
            NodeKind::Action => {
                let Some(slot) = record.action else {
                    fatal(TreeError::MissingAction)
                };
                match self.actions[slot as usize].update(ctx) {
                    Status::Invalid => fatal(TreeError::InvalidActionStatus(index)),
                    status => status,
                }
            }
        };

        if !status.is_running() {
            self.store.record_mut(index).awaiting_terminate = true;
        }
        status
    }

    /// Runs the completion hook. Only valid once per completing update.
    fn terminate(&mut self, index: NodeIndex, ctx: &mut C, status: Status) {
        let record = self.store.record_mut(index);
        if !record.awaiting_terminate {
            fatal(TreeError::DoubleTerminate(index));
        }
        record.awaiting_terminate = false;

        if let Some(slot) = record.action {
            self.actions[slot as usize].terminate(ctx, status);
        }
    }
}

impl<C> Default for BehaviorTree<C> {
    fn default() -> Self {
        Self::new(TreeConfig::default())
    }
}

impl<C> std::fmt::Debug for BehaviorTree<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BehaviorTree")
            .field("nodes", &self.store.len())
            .field("root", &self.root())
            .field("ticks", &self.ticks)
            .field("arena", self.store.arena())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::action_fn;

    #[derive(Default)]
    struct Trace {
        events: Vec<(&'static str, &'static str)>,
    }

    /// Records every hook call and replays a scripted list of statuses.
    struct Scripted {
        name: &'static str,
        script: Vec<Status>,
        step: usize,
    }

    impl Scripted {
        fn new(name: &'static str, script: &[Status]) -> Self {
            Self {
                name,
                script: script.to_vec(),
                step: 0,
            }
        }
    }

    impl Action<Trace> for Scripted {
        fn initialize(&mut self, ctx: &mut Trace) {
            ctx.events.push((self.name, "init"));
        }

        fn update(&mut self, ctx: &mut Trace) -> Status {
            ctx.events.push((self.name, "update"));
            let status = self.script[self.step.min(self.script.len() - 1)];
            self.step += 1;
            status
        }

        fn terminate(&mut self, ctx: &mut Trace, _status: Status) {
            ctx.events.push((self.name, "terminate"));
        }
    }

    #[test]
    fn action_protocol_order() {
        let mut tree = BehaviorTree::with_capacity(1024);
        tree.action(Scripted::new("a", &[Status::Running, Status::Success]));
        let mut trace = Trace::default();

        assert_eq!(tree.tick(&mut trace), Status::Running);
        assert_eq!(tree.tick(&mut trace), Status::Success);
        assert_eq!(
            trace.events,
            vec![
                ("a", "init"),
                ("a", "update"),
                ("a", "update"),
                ("a", "terminate"),
            ]
        );
    }

    #[test]
    #[should_panic(expected = "terminated twice")]
    fn terminate_without_a_fresh_update_is_fatal() {
        let mut tree = BehaviorTree::with_capacity(1024);
        let a = tree.action(Scripted::new("a", &[Status::Success]));
        let mut trace = Trace::default();

        assert_eq!(tree.tick(&mut trace), Status::Success);
        tree.terminate(a, &mut trace, Status::Success);
    }

    #[test]
    fn each_completing_update_allows_one_terminate() {
        let mut tree = BehaviorTree::with_capacity(1024);
        let a = tree.action(Scripted::new("a", &[Status::Running, Status::Failure]));
        let mut trace = Trace::default();

        tree.tick(&mut trace);
        assert!(!tree.store.record(a).awaiting_terminate);

        let status = tree.update(a, &mut trace);
        assert_eq!(status, Status::Failure);
        assert!(tree.store.record(a).awaiting_terminate);

        tree.terminate(a, &mut trace, status);
        assert!(!tree.store.record(a).awaiting_terminate);
        assert_eq!(trace.events.last(), Some(&("a", "terminate")));
    }

    #[test]
    fn completed_nodes_reinitialize_on_next_tick() {
        let mut tree = BehaviorTree::with_capacity(1024);
        tree.action(Scripted::new("a", &[Status::Success]));
        let mut trace = Trace::default();

        tree.tick(&mut trace);
        tree.tick(&mut trace);

        let inits = trace.events.iter().filter(|e| e.1 == "init").count();
        let terms = trace.events.iter().filter(|e| e.1 == "terminate").count();
        assert_eq!((inits, terms), (2, 2));
    }

    #[test]
    fn default_root_is_last_created_node() {
        let mut tree = BehaviorTree::<()>::with_capacity(1024);
        let a = tree.action(action_fn(|_: &mut ()| Status::Success));
        assert_eq!(tree.root(), Some(a));

        let inv = tree.inverter(a);
        assert_eq!(tree.root(), Some(inv));
        assert_eq!(tree.tick(&mut ()), Status::Failure);

        tree.set_root(a);
        assert_eq!(tree.tick(&mut ()), Status::Success);
        assert_eq!(tree.status(), Status::Success);
    }

    #[test]
    fn empty_tree_cannot_tick() {
        let mut tree = BehaviorTree::<()>::default();
        assert_eq!(tree.try_tick(&mut ()), Err(TreeError::EmptyTree));
        assert_eq!(tree.status(), Status::Invalid);
    }

    #[test]
    #[should_panic(expected = "reported Invalid")]
    fn invalid_action_status_is_fatal() {
        let mut tree = BehaviorTree::<()>::with_capacity(1024);
        tree.action(action_fn(|_: &mut ()| Status::Invalid));
        tree.tick(&mut ());
    }

    #[test]
    fn unknown_root_is_rejected() {
        let mut tree = BehaviorTree::<()>::with_capacity(1024);
        assert_eq!(
            tree.try_set_root(NodeIndex(0)),
            Err(TreeError::UnknownNode(NodeIndex(0)))
        );
    }

    #[test]
    fn clear_resets_storage() {
        let mut tree = BehaviorTree::<()>::with_capacity(1024);
        let a = tree.action(action_fn(|_: &mut ()| Status::Success));
        tree.sequence(&[a]);
        tree.tick(&mut ());

        tree.clear();

        assert!(tree.is_empty());
        assert_eq!(tree.arena().used(), 0);
        assert_eq!(tree.tick_count(), 0);
        assert_eq!(tree.root(), None);
    }
}
