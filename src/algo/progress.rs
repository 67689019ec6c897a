//! Progress reporting and cooperative cancellation for batch operations.
//!
//! A [`Progress`] wraps a callback that receives `(current, total, message)`
//! updates and, optionally, a shared cancel flag. Batch loops poll the flag
//! between meshes; work already done when the flag is raised is kept.
//!
//! # Example
//!
//! ```
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use std::sync::Arc;
//! use stitchwork::algo::Progress;
//!
//! let cancel = Arc::new(AtomicBool::new(false));
//! let progress = Progress::new(|current, total, message| {
//!     println!("[{}/{}] {}", current, total, message);
//! })
//! .with_cancel_flag(Arc::clone(&cancel));
//!
//! assert!(!progress.is_cancelled());
//! cancel.store(true, Ordering::Relaxed);
//! assert!(progress.is_cancelled());
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A progress callback that receives updates during batch operations.
///
/// The callback receives:
/// - `current`: Current step (0-based)
/// - `total`: Total number of steps
/// - `message`: Description of the current operation
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str) + Send + Sync>,
    cancel: Option<Arc<AtomicBool>>,
}

impl Progress {
    /// Create a new progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
            cancel: None,
        }
    }

    /// Create a no-op progress reporter that discards all updates.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }

    /// Attach a cancel flag. Raising it stops batch loops at the next mesh.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Report progress.
    #[inline]
    pub fn report(&self, current: usize, total: usize, message: &str) {
        (self.callback)(current, total, message);
    }

    /// True once the attached cancel flag has been raised.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Raise the attached cancel flag, if any.
    pub fn cancel(&self) {
        if let Some(flag) = &self.cancel {
            flag.store(true, Ordering::Relaxed);
        }
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress")
            .field("cancellable", &self.cancel.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_report_forwards_to_callback() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let progress = Progress::new(move |current, total, message| {
            sink.lock().unwrap().push((current, total, message.to_string()));
        });

        progress.report(1, 3, "refresh");
        assert_eq!(*seen.lock().unwrap(), vec![(1, 3, "refresh".to_string())]);
    }

    #[test]
    fn test_cancel_without_flag() {
        let progress = Progress::none();
        progress.cancel();
        assert!(!progress.is_cancelled());
    }

    #[test]
    fn test_cancel_flag_shared() {
        let flag = Arc::new(AtomicBool::new(false));
        let progress = Progress::default().with_cancel_flag(Arc::clone(&flag));
        progress.cancel();
        assert!(flag.load(Ordering::Relaxed));
        assert!(progress.is_cancelled());
    }
}
