//! Listener registration guards.
//!
//! Every `subscribe`/`add_listener` call in this crate returns a
//! [`Subscription`]. Dropping it runs the cleanup that removes the listener,
//! so the lifetime of a registration is the lifetime of the guard.

use std::fmt;

/// Guard that deregisters a listener when dropped.
#[must_use = "dropping a Subscription removes the listener immediately"]
pub struct Subscription {
    cleanup: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Wrap a cleanup closure.
    pub fn new(cleanup: impl FnOnce() + 'static) -> Self {
        Self { cleanup: Some(Box::new(cleanup)) }
    }

    /// A guard with nothing to release.
    pub fn empty() -> Self {
        Self { cleanup: None }
    }

    /// Remove the listener now.
    pub fn cancel(mut self) {
        self.run_cleanup();
    }

    fn run_cleanup(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_cleanup();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("active", &self.cleanup.is_some()).finish()
    }
}
