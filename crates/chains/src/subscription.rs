//! Event subscriptions.

use std::fmt;

/// Handle to an installed event handler.
///
/// Dropping the handle keeps the handler installed; call
/// [`unsubscribe`](Self::unsubscribe) to remove it.
pub struct EventSubscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send>>,
}

impl EventSubscription {
    pub fn new<F>(unsubscribe: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// Remove the handler. No further events are delivered to it.
    pub fn unsubscribe(mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl fmt::Debug for EventSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSubscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}
