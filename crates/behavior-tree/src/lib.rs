//! Arena-backed behavior tree engine.
//!
//! A tree is assembled bottom-up into a single [`BehaviorTree`] value and
//! then ticked once per frame. Nodes report [`Status::Running`] to suspend
//! work across ticks; the next tick resumes exactly at the running node
//! without re-initializing anything that already completed.
//!
//! - **Single owner**: the tree owns all node storage, nodes refer to
//!   children by [`NodeIndex`] and never by pointer
//! - **Bulk allocation**: node records and child lists are carved out of one
//!   preallocated [`LinearArena`]; there is no per-node free
//! - **Deterministic**: children are visited strictly in construction order,
//!   single-threaded, with no hidden scheduling
//!
//! # Architecture
//!
//! - [`LinearArena`]: bump allocator with checked typed handles
//! - [`BehaviorTree`]: node store plus the tick state machine
//! - [`Action`]: user-supplied leaf behavior
//! - [`Status`]: `Invalid`, `Success`, `Failure` or `Running`
//! - Composite nodes: [`NodeKind::Sequence`], [`NodeKind::Selector`]
//! - Decorator nodes: [`DecoratorKind`]
//!
//! # Example
//!
//! ```
//! use behavior_tree::{BehaviorTree, Status, action_fn};
//!
//! let mut tree = BehaviorTree::<u32>::with_capacity(4096);
//! let step = tree.action(action_fn(|n: &mut u32| {
//!     *n += 1;
//!     if *n < 3 { Status::Running } else { Status::Success }
//! }));
//! let done = tree.action(action_fn(|_: &mut u32| Status::Success));
//! tree.sequence(&[step, done]);
//!
//! let mut n = 0;
//! assert_eq!(tree.tick(&mut n), Status::Running);
//! assert_eq!(tree.tick(&mut n), Status::Running);
//! assert_eq!(tree.tick(&mut n), Status::Success);
//! ```

pub mod arena;
pub mod behavior;
pub mod builder;
mod composite;
pub mod config;
pub mod decorator;
pub mod error;
pub mod node;
pub mod status;
mod store;
pub mod tree;

// Re-export core types for ergonomic API
pub use arena::{ArenaError, ArenaRef, ArenaSlice, LinearArena};
pub use behavior::{Action, FnAction};
pub use builder::action_fn;
pub use config::TreeConfig;
pub use decorator::DecoratorKind;
pub use error::TreeError;
pub use node::{NodeIndex, NodeKind};
pub use status::Status;
pub use tree::BehaviorTree;
