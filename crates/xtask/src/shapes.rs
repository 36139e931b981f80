//! Synthetic tree shapes used by the development commands.
//!
//! Every leaf is a [`Work`] action whose behavior is derived from its
//! position, so a given shape and parameter set always produces the same
//! tree and the same tick outcomes.

use behavior_tree::{Action, BehaviorTree, NodeIndex, NodeKind, Status, TreeConfig, TreeError};
use clap::ValueEnum;

/// Counters threaded through every tick.
#[derive(Debug, Default)]
pub struct Frame {
    pub updates: u64,
    pub running: u64,
    pub completed: u64,
}

/// Leaf that stays `Running` for `duration` updates before finishing.
pub struct Work {
    duration: u32,
    remaining: u32,
    outcome: Status,
}

impl Work {
    pub fn new(duration: u32, outcome: Status) -> Self {
        Self {
            duration,
            remaining: duration,
            outcome,
        }
    }
}

impl Action<Frame> for Work {
    fn initialize(&mut self, _ctx: &mut Frame) {
        self.remaining = self.duration;
    }

    fn update(&mut self, ctx: &mut Frame) -> Status {
        ctx.updates += 1;
        if self.remaining > 0 {
            self.remaining -= 1;
            ctx.running += 1;
            Status::Running
        } else {
            self.outcome
        }
    }

    fn terminate(&mut self, ctx: &mut Frame, _status: Status) {
        ctx.completed += 1;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shape {
    /// A selector over `width - 1` sequences of `width` leaves
    Horizontal,
    /// Alternating sequence/selector levels, one leaf plus one subtree each
    Deep,
}

/// Parameters for leaf generation.
#[derive(Clone, Copy, Debug)]
pub struct LeafPlan {
    /// Every n-th leaf fails (0 disables failures)
    pub fail_every: usize,
    /// Every n-th leaf runs for `run_ticks` ticks first (0 disables)
    pub slow_every: usize,
    pub run_ticks: u32,
}

impl LeafPlan {
    fn leaf(&self, n: usize) -> Work {
        let outcome = if self.fail_every != 0 && n % self.fail_every == self.fail_every - 1 {
            Status::Failure
        } else {
            Status::Success
        };
        let duration = if self.slow_every != 0 && n % self.slow_every == self.slow_every - 1 {
            self.run_ticks
        } else {
            0
        };
        Work::new(duration, outcome)
    }
}

impl Shape {
    /// Node and edge counts of the shape for `size`.
    pub fn counts(self, size: usize) -> (usize, usize) {
        match self {
            Shape::Horizontal => {
                let sequences = size.saturating_sub(1);
                (sequences * (size + 1) + 1, sequences * size + sequences)
            }
            // One leaf per level plus a final leaf, one composite per level.
            Shape::Deep => (2 * size + 1, 2 * size),
        }
    }

    /// Arena budget that exactly covers the shape.
    pub fn config(self, size: usize) -> TreeConfig {
        let (nodes, edges) = self.counts(size);
        TreeConfig::for_shape(nodes, edges)
    }

    /// Builds the shape into `tree` and returns its root.
    pub fn build(
        self,
        tree: &mut BehaviorTree<Frame>,
        size: usize,
        plan: LeafPlan,
    ) -> Result<NodeIndex, TreeError> {
        let mut leaf_count = 0usize;
        let mut next_leaf = |tree: &mut BehaviorTree<Frame>| {
            let leaf = plan.leaf(leaf_count);
            leaf_count += 1;
            tree.try_action(leaf)
        };

        let root = match self {
            Shape::Horizontal => {
                let mut sequences = Vec::with_capacity(size.saturating_sub(1));
                for _ in 1..size {
                    let leaves = (0..size)
                        .map(|_| next_leaf(tree))
                        .collect::<Result<Vec<_>, _>>()?;
                    sequences.push(tree.try_create_node(NodeKind::Sequence, &leaves)?);
                }
                tree.try_create_node(NodeKind::Selector, &sequences)?
            }
            Shape::Deep => {
                let mut subtree = next_leaf(tree)?;
                for level in 0..size {
                    let leaf = next_leaf(tree)?;
                    let kind = if level % 2 == 0 {
                        NodeKind::Sequence
                    } else {
                        NodeKind::Selector
                    };
                    subtree = tree.try_create_node(kind, &[leaf, subtree])?;
                }
                subtree
            }
        };

        tree.try_set_root(root)?;
        Ok(root)
    }
}
