//! Error types used by watcher pools and spy registries.
//!
//! This module defines:
//!
//! - [`WatchError`]: errors raised by pool and registry operations.
//! - [`PushError`]: the failure type a [`Watch`](crate::Watch) implementation returns.
//!
//! [`WatchError`] provides helper methods (`as_label`, `is_not_found`) for logging
//! and for grouping the error kinds callers usually branch on.

use thiserror::Error;

/// Failure returned by a watcher's `push`.
pub type PushError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// # Errors produced by pools and spy registries.
///
/// Validation and lookup errors are always returned to the caller; none of the
/// operations that fail with them leave partial state behind.
/// Watcher failures only surface as errors through the non-isolated notify paths
/// ([`WatcherPool::notify`](crate::WatcherPool::notify) and
/// [`Watchers::notify_strict`](crate::Watchers::notify_strict)).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum WatchError {
    /// An attach argument does not satisfy the watcher contract.
    ///
    /// Candidates are matched by type: a watcher must be passed as a
    /// [`WatcherRef`](crate::WatcherRef), so an `Rc<Cat>` has to be unsized to
    /// `Rc<dyn Watch<..>>` before it is boxed.
    #[error("expected <{expected}>, but got <{actual}>")]
    NotAWatcher {
        /// Short name of the expected handle type, e.g. `WatcherRef<Food, String>`.
        expected: String,
        /// Name of the type that was actually provided.
        actual: &'static str,
    },

    /// A merge argument is not a compatible pool.
    #[error("expected a pool <{expected}>, but got <{actual}>")]
    NotAPool {
        /// Short name of the expected pool type, e.g. `Watchers<Food, String>`.
        expected: String,
        /// Name of the type that was actually provided.
        actual: &'static str,
    },

    /// Detach referenced a watcher that is not attached.
    #[error("watcher {watcher} is not attached")]
    WatcherNotFound {
        /// Display name of the missing watcher.
        watcher: String,
    },

    /// Undo referenced a (sender, method) pair that is not being spied.
    #[error("<sender '{sender}'> <method '{method}'> is not being spied")]
    SpyNotFound {
        /// Description of the sender.
        sender: String,
        /// Method name.
        method: String,
    },

    /// Spy requested for a (sender, method) pair that is already spied.
    #[error("<sender '{sender}'> <method '{method}'> is already being spied")]
    AlreadySpied {
        /// Description of the sender.
        sender: String,
        /// Method name.
        method: String,
    },

    /// The sender exposes no spyable method under the requested name.
    #[error("<sender '{sender}'> has no spyable method '{method}'")]
    NoSuchMethod {
        /// Description of the sender.
        sender: String,
        /// Method name.
        method: String,
    },

    /// Indexed lookup past the end of the pool.
    #[error("index {index} out of range: watchers has <{len}> length")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Current watcher count.
        len: usize,
    },

    /// Trigger text outside the supported set.
    #[error("trigger '{value}' is not supported. Options are ('before', 'after')")]
    InvalidTrigger {
        /// The offending value.
        value: String,
    },

    /// A watcher failed while notifying in strict mode.
    #[error("watcher {watcher} failed to process an event: {reason}")]
    Notification {
        /// Display name of the failing watcher.
        watcher: String,
        /// Description of the underlying failure.
        reason: String,
    },

    /// A watcher failed while notifying through the unisolated base pool.
    #[error("watcher {watcher} failed: {source}")]
    Push {
        /// Display name of the failing watcher.
        watcher: String,
        /// The watcher's own failure.
        #[source]
        source: PushError,
    },
}

impl WatchError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use watchify::WatchError;
    ///
    /// let err = WatchError::InvalidTrigger { value: "during".into() };
    /// assert_eq!(err.as_label(), "invalid_trigger");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            WatchError::NotAWatcher { .. } => "not_a_watcher",
            WatchError::NotAPool { .. } => "not_a_pool",
            WatchError::WatcherNotFound { .. } => "watcher_not_found",
            WatchError::SpyNotFound { .. } => "spy_not_found",
            WatchError::AlreadySpied { .. } => "already_spied",
            WatchError::NoSuchMethod { .. } => "no_such_method",
            WatchError::IndexOutOfRange { .. } => "index_out_of_range",
            WatchError::InvalidTrigger { .. } => "invalid_trigger",
            WatchError::Notification { .. } => "notification_failed",
            WatchError::Push { .. } => "push_failed",
        }
    }

    /// Indicates whether the error reports a missing entry.
    ///
    /// Returns `true` for [`WatchError::WatcherNotFound`] and [`WatchError::SpyNotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            WatchError::WatcherNotFound { .. } | WatchError::SpyNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_message_includes_count() {
        let err = WatchError::IndexOutOfRange { index: 5, len: 2 };
        assert_eq!(
            err.to_string(),
            "index 5 out of range: watchers has <2> length"
        );
    }

    #[test]
    fn test_not_found_grouping() {
        let missing = WatchError::WatcherNotFound {
            watcher: "CatWatcher".into(),
        };
        let unspied = WatchError::SpyNotFound {
            sender: "<Food object>".into(),
            method: "cook".into(),
        };
        let bad_trigger = WatchError::InvalidTrigger {
            value: "later".into(),
        };

        assert!(missing.is_not_found());
        assert!(unspied.is_not_found());
        assert!(!bad_trigger.is_not_found());
    }

    #[test]
    fn test_push_keeps_source() {
        use std::error::Error as _;

        let err = WatchError::Push {
            watcher: "CatWatcher".into(),
            source: "no fish".into(),
        };
        assert_eq!(err.as_label(), "push_failed");
        assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("no fish"));
    }
}
