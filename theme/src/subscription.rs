//! Cancellable handle for event listeners and timers.

use std::fmt;

/// Owns the teardown for one listener or scheduled task.
///
/// Dropping the handle runs the teardown, the same way dropping a
/// `gloo_timers::callback::Timeout` clears its timer.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self { cancel: Some(Box::new(cancel)) }
    }

    /// A handle with nothing to tear down.
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    /// Tear down now instead of at drop.
    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("active", &self.is_active()).finish()
    }
}

#[cfg(test)]
#[path = "subscription_test.rs"]
mod tests;
