//! Cooperative cancellation for deferred control work
//!
//! A [`CancellationSource`] hands out [`CancellationToken`]s. Work that was
//! already handed to the terminal core is never interrupted; tokens are only
//! checked at continuation points on the UI queue.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable, thread-safe cancellation flag
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

/// The handle that triggers cancellation.
///
/// Dropping the source does not cancel its tokens.
#[derive(Debug, Default)]
pub struct CancellationSource {
    cancelled: Arc<AtomicBool>,
}

impl CancellationSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token observing this source
    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            cancelled: Arc::clone(&self.cancelled),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl CancellationToken {
    /// A token nothing can cancel
    pub fn none() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
