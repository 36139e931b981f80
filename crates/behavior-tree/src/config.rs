//! Construction-time sizing for a behavior tree.
use std::env;
use std::mem;

use crate::node::{NodeIndex, NodeRecord};

/// Default arena size in bytes.
pub const DEFAULT_ARENA_CAPACITY: usize = 256_000;

/// Default number of node slots reserved up front.
pub const DEFAULT_NODE_CAPACITY: usize = 1_024;

/// Memory budget of a [`BehaviorTree`](crate::BehaviorTree).
///
/// The arena never grows: a tree that needs more than `arena_capacity` bytes
/// fails at node-creation time. `node_capacity` only pre-sizes the handle
/// table and may be exceeded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeConfig {
    pub arena_capacity: usize,
    pub node_capacity: usize,
}

impl TreeConfig {
    pub const fn new(arena_capacity: usize, node_capacity: usize) -> Self {
        Self {
            arena_capacity,
            node_capacity,
        }
    }

    /// Budget large enough for `nodes` nodes holding `edges` child links in
    /// total, whatever the order of creation.
    pub fn for_shape(nodes: usize, edges: usize) -> Self {
        let record = mem::size_of::<NodeRecord>() + mem::align_of::<NodeRecord>();
        let links = edges * mem::size_of::<NodeIndex>() + nodes * mem::align_of::<NodeIndex>();
        Self {
            arena_capacity: (nodes * record + links).max(1),
            node_capacity: nodes,
        }
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BT_ARENA_CAPACITY` - Arena size in bytes (default: 256000)
    /// - `BT_NODE_CAPACITY` - Reserved node slots (default: 1024)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(bytes) = read_env::<usize>("BT_ARENA_CAPACITY") {
            config.arena_capacity = bytes.max(1);
        }

        if let Some(nodes) = read_env::<usize>("BT_NODE_CAPACITY") {
            config.node_capacity = nodes;
        }

        config
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ARENA_CAPACITY, DEFAULT_NODE_CAPACITY)
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
