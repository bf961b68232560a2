//! Ordered extension hooks.
//!
//! Every builder stage exposes a [`HookChain`] so callers can override or augment a
//! computed partial result before it is merged. Hooks run in registration order, each
//! receiving the previous hook's output.

use std::fmt;

/// A single hook: receives read-only context and a value, returns the replacement value.
pub type Hook<C, T> = Box<dyn Fn(&C, T) -> T + Send + Sync>;

/// An ordered list of hooks over values of type `T` with context `C`.
pub struct HookChain<C: ?Sized, T> {
    /// Hooks in registration order.
    hooks: Vec<Hook<C, T>>,
}

impl<C: ?Sized, T> HookChain<C, T> {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Appends a hook to the end of the chain.
    pub fn push<F>(&mut self, hook: F)
    where
        F: Fn(&C, T) -> T + Send + Sync + 'static,
    {
        self.hooks.push(Box::new(hook));
    }

    /// Runs every hook in order.
    pub fn apply(&self, context: &C, value: T) -> T {
        self.hooks.iter().fold(value, |acc, hook| hook(context, acc))
    }

    /// Returns the number of registered hooks.
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Returns true if no hooks are registered.
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl<C: ?Sized, T> Default for HookChain<C, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ?Sized, T> fmt::Debug for HookChain<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookChain")
            .field("hooks", &self.hooks.len())
            .finish()
    }
}
