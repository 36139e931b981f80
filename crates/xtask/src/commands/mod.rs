//! Command implementations for xtask
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod layout;
mod tick;

pub use layout::Layout;
pub use tick::Tick;
