//! Handles for in-flight work.
//!
//! There is no background process: callers kick off a fetch or a write,
//! keep the handle, and poll it on their next pass. A handle that is never
//! polled still runs to completion; the caller reconciles by re-fetching
//! rather than trusting a stale result.

use std::{
    future::Future,
    sync::{Arc, Mutex},
};

pub struct Task<T: Send + 'static>(Arc<Mutex<Option<T>>>);

impl<T: Send + 'static> Clone for Task<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: Send + 'static> Task<T> {
    pub fn new(future: impl Future<Output = T> + Send + 'static) -> Self {
        let slot = Arc::new(Mutex::new(None));
        {
            let slot = Arc::clone(&slot);
            tokio::spawn(async move {
                let result = future.await;
                *slot.lock().unwrap() = Some(result);
            });
        }
        Self(slot)
    }

    /// A handle that never resolves.
    pub fn pending() -> Self {
        Self::new(std::future::pending())
    }

    pub fn done(&self) -> bool {
        self.0.lock().unwrap().is_some()
    }

    pub fn take(&mut self) -> Option<T> {
        self.0.lock().unwrap().take()
    }
}
