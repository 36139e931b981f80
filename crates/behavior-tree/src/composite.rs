//! Composite behavior nodes.
//!
//! Composite nodes control the execution flow of multiple child behaviors:
//! [`NodeKind::Sequence`] (AND logic) and [`NodeKind::Selector`] (OR logic).
//! Both walk their children in construction order starting from a saved
//! cursor, so a composite suspended on a `Running` child picks up at that
//! child on the next tick.
//!
//! [`NodeKind::Sequence`]: crate::NodeKind::Sequence
//! [`NodeKind::Selector`]: crate::NodeKind::Selector

use crate::error::{fatal, narrow};
use crate::node::NodeIndex;
use crate::{BehaviorTree, Status};

impl<C> BehaviorTree<C> {
    /// Executes children in sequence until one fails.
    ///
    /// - `Failure` stops the sequence; the cursor stays on the failing child
    /// - `Running` suspends the sequence on the current child
    /// - `Success` advances to the next child; past the last one the
    ///   sequence succeeds
    pub(crate) fn update_sequence(&mut self, index: NodeIndex, ctx: &mut C) -> Status {
        self.run_children(index, ctx, Status::Success)
    }

    /// Executes children in order until one succeeds.
    ///
    /// - `Success` stops the selector; the cursor stays on that child
    /// - `Running` suspends the selector on the current child
    /// - `Failure` falls through to the next child; if every child fails the
    ///   selector fails
    pub(crate) fn update_selector(&mut self, index: NodeIndex, ctx: &mut C) -> Status {
        self.run_children(index, ctx, Status::Failure)
    }

    /// Shared loop of both composites: keep going while children report
    /// `advance_on`, stop on anything else.
    fn run_children(&mut self, index: NodeIndex, ctx: &mut C, advance_on: Status) -> Status {
        let len = self.store.children(index).len();
        let mut cursor = self.store.record(index).cursor as usize;

        while cursor < len {
            let child = self.store.child_at(index, cursor);
            let status = self.evaluate(child, ctx);
            if status != advance_on {
                return status;
            }

            cursor += 1;
            let stored = match narrow(cursor, "composite cursor") {
                Ok(stored) => stored,
                Err(err) => fatal(err),
            };
            self.store.record_mut(index).cursor = stored;
        }

        advance_on
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::action_fn;
    use crate::Status::{Failure as F, Success as S};
    use crate::{BehaviorTree, NodeIndex, Status};

    struct TestContext {
        value: i32,
    }

    fn leaf(tree: &mut BehaviorTree<TestContext>, status: Status) -> NodeIndex {
        tree.action(action_fn(move |ctx: &mut TestContext| {
            ctx.value += 1;
            status
        }))
    }

    fn leaves(tree: &mut BehaviorTree<TestContext>, statuses: &[Status]) -> Vec<NodeIndex> {
        statuses.iter().map(|&status| leaf(tree, status)).collect()
    }

    #[test]
    fn sequence_all_success() {
        let mut tree = BehaviorTree::with_capacity(4096);
        let children = leaves(&mut tree, &[S, S, S]);
        let seq = tree.sequence(&children);

        let mut ctx = TestContext { value: 0 };
        assert_eq!(tree.tick(&mut ctx), Status::Success);
        assert_eq!(tree.cursor_of(seq), 3);
        assert_eq!(ctx.value, 3);
    }

    #[test]
    fn sequence_all_failure() {
        let mut tree = BehaviorTree::with_capacity(4096);
        let children = leaves(&mut tree, &[F, F, F]);
        let seq = tree.sequence(&children);

        let mut ctx = TestContext { value: 0 };
        assert_eq!(tree.tick(&mut ctx), Status::Failure);
        assert_eq!(tree.cursor_of(seq), 0);
        assert_eq!(ctx.value, 1);
    }

    #[test]
    fn sequence_fails_on_first_failure() {
        let mut tree = BehaviorTree::with_capacity(4096);
        let children = leaves(&mut tree, &[S, F, S]);
        let seq = tree.sequence(&children);

        let mut ctx = TestContext { value: 0 };
        assert_eq!(tree.tick(&mut ctx), Status::Failure);
        assert_eq!(tree.cursor_of(seq), 1);
        assert_eq!(ctx.value, 2); // third child never ran
        assert_eq!(tree.status_of(children[2]), Status::Invalid);
    }

    #[test]
    fn selector_all_failure() {
        let mut tree = BehaviorTree::with_capacity(4096);
        let children = leaves(&mut tree, &[F, F, F]);
        let sel = tree.selector(&children);

        let mut ctx = TestContext { value: 0 };
        assert_eq!(tree.tick(&mut ctx), Status::Failure);
        assert_eq!(tree.cursor_of(sel), 3);
        assert_eq!(ctx.value, 3);
    }

    #[test]
    fn selector_one_success() {
        let mut tree = BehaviorTree::with_capacity(4096);
        let children = leaves(&mut tree, &[F, S, F]);
        let sel = tree.selector(&children);

        let mut ctx = TestContext { value: 0 };
        assert_eq!(tree.tick(&mut ctx), Status::Success);
        assert_eq!(tree.cursor_of(sel), 1);
        assert_eq!(ctx.value, 2);
    }

    #[test]
    fn selector_stops_at_first_of_two_successes() {
        let mut tree = BehaviorTree::with_capacity(4096);
        let children = leaves(&mut tree, &[F, S, S]);
        let sel = tree.selector(&children);

        let mut ctx = TestContext { value: 0 };
        assert_eq!(tree.tick(&mut ctx), Status::Success);
        assert_eq!(tree.cursor_of(sel), 1);
        assert_eq!(tree.status_of(children[2]), Status::Invalid);
    }
}
