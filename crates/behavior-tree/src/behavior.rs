//! Leaf behavior trait.
//!
//! [`Action`] is the extension point of the engine: composites and decorators
//! are built in, while every leaf is a user-supplied value implementing this
//! trait. The trait is generic over a context type `C` so actions can read
//! and modify whatever state the caller threads through [`tick`].
//!
//! [`tick`]: crate::BehaviorTree::tick

use crate::Status;

/// Life-cycle hooks of a leaf node.
///
/// For every evaluation the executor calls [`initialize`](Action::initialize)
/// unless the node is resuming from `Running`, then [`update`](Action::update),
/// then [`terminate`](Action::terminate) if the update finished.
pub trait Action<C> {
    /// Prepares the action for a fresh run.
    fn initialize(&mut self, _ctx: &mut C) {}

    /// Advances the action.
    ///
    /// Must return `Success`, `Failure` or `Running`; `Invalid` is a
    /// protocol violation and aborts the tick.
    fn update(&mut self, ctx: &mut C) -> Status;

    /// Called exactly once after `update` returns `Success` or `Failure`.
    fn terminate(&mut self, _ctx: &mut C, _status: Status) {}
}

/// Blanket implementation for boxed actions.
impl<C> Action<C> for Box<dyn Action<C>> {
    #[inline]
    fn initialize(&mut self, ctx: &mut C) {
        (**self).initialize(ctx)
    }

    #[inline]
    fn update(&mut self, ctx: &mut C) -> Status {
        (**self).update(ctx)
    }

    #[inline]
    fn terminate(&mut self, ctx: &mut C, status: Status) {
        (**self).terminate(ctx, status)
    }
}

/// Adapts a closure into an [`Action`] that only implements `update`.
///
/// Usually created through [`action_fn`](crate::builder::action_fn).
pub struct FnAction<F>(pub F);

impl<C, F> Action<C> for FnAction<F>
where
    F: FnMut(&mut C) -> Status,
{
    #[inline]
    fn update(&mut self, ctx: &mut C) -> Status {
        (self.0)(ctx)
    }
}
