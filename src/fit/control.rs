//! Cooperative cancellation for long-running searches.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::FitError;

/// Shared flag polled between sweep iterations.
///
/// Clones share the same flag; cancelling any clone cancels all of them.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// `Err(FitError::Cancelled)` once cancellation has been requested.
    pub fn check(&self) -> Result<(), FitError> {
        if self.is_cancelled() {
            return Err(FitError::Cancelled);
        }
        Ok(())
    }
}
