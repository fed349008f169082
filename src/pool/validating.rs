//! # Watchers: validating pool with failure isolation
//!
//! [`Watchers`] wraps a [`WatcherPool`] and adds the policy the base leaves out.
//!
//! ## What it adds
//! - Runtime validation of type-erased input ([`Candidate`]); typed input is checked by the compiler.
//! - Debug logging of every attach/detach and of each push.
//! - Failure isolation in [`notify`](Watchers::notify): a failing or panicking watcher is
//!   logged and skipped, the remaining watchers still run.
//!
//! ## Strict mode
//! [`notify_strict`](Watchers::notify_strict) stops at the **first** failing watcher and
//! returns [`WatchError::Notification`]. Watchers after it are not pushed.
//!
//! ## Diagram
//! ```text
//!    notify(sender, args)
//!        │
//!        ├──► debug "Notifying watcher: W1" ─► W1.push ─► Ok
//!        ├──► debug "Notifying watcher: W2" ─► W2.push ─► Err/panic ─► error log, continue
//!        └──► debug "Notifying watcher: W3" ─► W3.push ─► Ok
//! ```

use std::any::Any;
use std::fmt;
use std::ops::Add;
use std::panic::{self, AssertUnwindSafe};

use crate::error::WatchError;
use crate::logging::Logger;
use crate::pool::{
    generic_label, render_listing, Candidate, PoolBuilder, PoolConfig, WatcherPool,
    WatcherSource,
};
use crate::spy::SpyRegistry;
use crate::watchers::WatcherRef;

/// How a notification treats failing watchers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NotifyMode {
    /// Log the failure and continue with the next watcher.
    #[default]
    Isolated,
    /// Stop at the first failure and return [`WatchError::Notification`].
    Strict,
}

/// Validating, logging watcher pool.
pub struct Watchers<S, A = ()> {
    pool: WatcherPool<S, A>,
    logger: Logger,
    validate: bool,
}

impl<S: 'static, A: 'static> Watchers<S, A> {
    /// Creates an empty pool with [`PoolConfig::default`] and the `tracing` sink.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(PoolConfig::default())
    }

    /// Creates an empty pool with the given configuration and the `tracing` sink.
    #[must_use]
    pub fn with_config(cfg: PoolConfig) -> Self {
        Self::from_parts(cfg, Logger::default())
    }

    /// Starts a [`PoolBuilder`] for a custom configuration or log sink.
    #[must_use]
    pub fn builder() -> PoolBuilder {
        PoolBuilder::new()
    }

    pub(crate) fn from_parts(cfg: PoolConfig, mut logger: Logger) -> Self {
        logger.set_enabled(!cfg.disable_logs);
        Self {
            pool: WatcherPool::new(),
            logger,
            validate: cfg.validate,
        }
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> PoolConfig {
        PoolConfig {
            validate: self.validate,
            disable_logs: !self.logger.is_enabled(),
        }
    }

    /// Silences (or re-enables) the pool's logger.
    pub fn disable_logs(&mut self, disable: bool) -> &mut Self {
        self.logger.set_enabled(!disable);
        self
    }

    /// Appends a watcher and logs it.
    pub fn attach(&mut self, watcher: WatcherRef<S, A>) -> &mut Self {
        self.logger
            .debug(|| format!("Subscribed watcher: {}.", watcher.name()));
        self.pool.attach(watcher);
        self
    }

    /// Appends watchers in order and logs them.
    pub fn attach_many<I>(&mut self, watchers: I) -> &mut Self
    where
        I: IntoIterator<Item = WatcherRef<S, A>>,
    {
        let watchers: Vec<_> = watchers.into_iter().collect();
        self.logger
            .debug(|| format!("Subscribed watchers: [{}].", names(&watchers)));
        self.pool.attach_many(watchers);
        self
    }

    /// Attaches a type-erased candidate.
    ///
    /// With validation on, a candidate that is not a [`WatcherRef<S, A>`] fails with
    /// [`WatchError::NotAWatcher`] and the pool is unchanged. With validation off it
    /// is skipped and logged.
    pub fn attach_candidate(
        &mut self,
        candidate: Box<dyn Candidate>,
    ) -> Result<&mut Self, WatchError> {
        match Self::to_watcher(candidate) {
            Ok(watcher) => Ok(self.attach(watcher)),
            Err(err) if self.validate => Err(err),
            Err(err) => {
                self.logger.error(|| format!("Skipped candidate: {err}."));
                Ok(self)
            }
        }
    }

    /// Attaches type-erased candidates, all or nothing.
    ///
    /// With validation on, every candidate is checked before any is appended; the
    /// first non-conforming one is returned as [`WatchError::NotAWatcher`].
    pub fn attach_many_candidates(
        &mut self,
        candidates: Vec<Box<dyn Candidate>>,
    ) -> Result<&mut Self, WatchError> {
        let mut accepted = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            match Self::to_watcher(candidate) {
                Ok(watcher) => accepted.push(watcher),
                Err(err) if self.validate => return Err(err),
                Err(err) => self.logger.error(|| format!("Skipped candidate: {err}.")),
            }
        }
        Ok(self.attach_many(accepted))
    }

    /// Removes the first entry identical to `watcher`.
    pub fn detach(&mut self, watcher: &WatcherRef<S, A>) -> Result<&mut Self, WatchError> {
        self.pool.detach(watcher)?;
        self.logger
            .debug(|| format!("Unsubscribed watcher: {}.", watcher.name()));
        Ok(self)
    }

    /// Detaches each watcher in turn; earlier removals stay applied on failure.
    pub fn detach_many(&mut self, watchers: &[WatcherRef<S, A>]) -> Result<&mut Self, WatchError> {
        self.pool.detach_many(watchers)?;
        self.logger
            .debug(|| format!("Unsubscribed watchers: [{}].", names(watchers)));
        Ok(self)
    }

    /// Returns a new pool holding `self`'s watchers followed by `other`'s.
    ///
    /// `other` may be any pool: a [`WatcherPool`], another [`Watchers`] or a
    /// [`SpyRegistry`] (whose spies are not carried over). The result keeps `self`'s
    /// logger and configuration.
    #[must_use]
    pub fn merge(&self, other: &impl WatcherSource<S, A>) -> Watchers<S, A> {
        self.merged_with(other.watcher_handles())
    }

    /// Merges a type-erased pool.
    ///
    /// Accepts a [`Watchers<S, A>`], a [`WatcherPool<S, A>`] or a [`SpyRegistry<S, A>`]
    /// with the default unit return type; registries with another return type are
    /// recognised by [`SpyRegistry::merge_candidate`]. Anything else fails with
    /// [`WatchError::NotAPool`] when validation is on; with validation off it is logged
    /// and the result is a copy of `self`.
    pub fn merge_candidate(&self, other: &dyn Candidate) -> Result<Watchers<S, A>, WatchError> {
        match Self::handles_of(Candidate::as_any(other)) {
            Some(handles) => Ok(self.merged_with(handles)),
            None => self.reject_merge(Candidate::type_label(other)),
        }
    }

    /// Pushes to every watcher, isolating failures.
    ///
    /// Failures and panics are logged at error level; the call always completes.
    pub fn notify(&self, sender: &S, args: &A) -> &Self {
        for watcher in &self.pool {
            self.logger
                .debug(|| format!("Notifying watcher: {}.", watcher.name()));
            if let Err(reason) = push_guarded(watcher, sender, args) {
                self.logger.error(|| {
                    format!(
                        "Watcher: {} failed to process an event. Exception: {reason}.",
                        watcher.name()
                    )
                });
            }
        }
        self
    }

    /// Pushes to watchers until the first failure.
    ///
    /// The failure is returned as [`WatchError::Notification`]; later watchers are skipped.
    pub fn notify_strict(&self, sender: &S, args: &A) -> Result<&Self, WatchError> {
        for watcher in &self.pool {
            self.logger
                .debug(|| format!("Notifying watcher: {}.", watcher.name()));
            push_guarded(watcher, sender, args).map_err(|reason| WatchError::Notification {
                watcher: watcher.name().to_string(),
                reason,
            })?;
        }
        Ok(self)
    }

    /// Notifies with the given failure policy.
    pub fn notify_with(&self, sender: &S, args: &A, mode: NotifyMode) -> Result<&Self, WatchError> {
        match mode {
            NotifyMode::Isolated => Ok(self.notify(sender, args)),
            NotifyMode::Strict => self.notify_strict(sender, args),
        }
    }

    /// Removes all watchers.
    pub fn reset(&mut self) -> &mut Self {
        self.pool.reset();
        self
    }

    /// Number of attached watchers.
    #[must_use]
    pub fn count(&self) -> usize {
        self.pool.count()
    }

    /// True if no watcher is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// True if an identical handle is attached.
    #[must_use]
    pub fn contains(&self, watcher: &WatcherRef<S, A>) -> bool {
        self.pool.contains(watcher)
    }

    /// Returns the watcher at `index`.
    pub fn get(&self, index: usize) -> Result<&WatcherRef<S, A>, WatchError> {
        self.pool.get(index)
    }

    /// Iterates watchers in notify order.
    pub fn iter(&self) -> std::slice::Iter<'_, WatcherRef<S, A>> {
        self.pool.iter()
    }

    /// All watchers, in notify order.
    #[must_use]
    pub fn watchers(&self) -> &[WatcherRef<S, A>] {
        self.pool.watchers()
    }

    /// Collects the watchers into any container.
    pub fn watchers_as<C>(&self) -> C
    where
        C: FromIterator<WatcherRef<S, A>>,
    {
        self.pool.watchers_as()
    }

    /// The underlying base pool.
    #[must_use]
    pub fn as_pool(&self) -> &WatcherPool<S, A> {
        &self.pool
    }

    pub(crate) fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Watcher handles of a type-erased pool, if it is one this pool can merge.
    pub(crate) fn handles_of(any: &dyn Any) -> Option<Vec<WatcherRef<S, A>>> {
        if let Some(watchers) = any.downcast_ref::<Watchers<S, A>>() {
            return Some(watchers.watcher_handles());
        }
        if let Some(pool) = any.downcast_ref::<WatcherPool<S, A>>() {
            return Some(pool.watcher_handles());
        }
        any.downcast_ref::<SpyRegistry<S, A>>()
            .map(|registry| registry.watcher_handles())
    }

    pub(crate) fn reject_merge(&self, actual: &'static str) -> Result<Watchers<S, A>, WatchError> {
        let err = WatchError::NotAPool {
            expected: generic_label::<S, A>("Watchers"),
            actual,
        };
        if self.validate {
            return Err(err);
        }
        self.logger.error(|| format!("Skipped merge: {err}."));
        Ok(self.clone())
    }

    fn merged_with(&self, other: Vec<WatcherRef<S, A>>) -> Watchers<S, A> {
        self.logger
            .debug(|| format!("Merged watchers: [{}].", names(&other)));
        let mut pool = self.pool.clone();
        pool.attach_many(other);
        Watchers {
            pool,
            logger: self.logger.clone(),
            validate: self.validate,
        }
    }

    fn to_watcher(candidate: Box<dyn Candidate>) -> Result<WatcherRef<S, A>, WatchError> {
        let actual = Candidate::type_label(&*candidate);
        Candidate::into_any(candidate)
            .downcast::<WatcherRef<S, A>>()
            .map(|watcher| *watcher)
            .map_err(|_| WatchError::NotAWatcher {
                expected: generic_label::<S, A>("WatcherRef"),
                actual,
            })
    }
}

impl<S: 'static, A: 'static> WatcherSource<S, A> for Watchers<S, A> {
    fn watcher_handles(&self) -> Vec<WatcherRef<S, A>> {
        self.pool.watcher_handles()
    }
}

/// Runs one push, turning errors and panics into a message.
fn push_guarded<S: 'static, A: 'static>(
    watcher: &WatcherRef<S, A>,
    sender: &S,
    args: &A,
) -> Result<(), String> {
    match panic::catch_unwind(AssertUnwindSafe(|| watcher.push(sender, args))) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(err.to_string()),
        Err(panic_err) => Err(panic_message(&*panic_err)),
    }
}

fn panic_message(any: &(dyn Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        format!("panicked: {msg}")
    } else if let Some(msg) = any.downcast_ref::<String>() {
        format!("panicked: {msg}")
    } else {
        "unknown panic".to_string()
    }
}

fn names<S: 'static, A: 'static>(watchers: &[WatcherRef<S, A>]) -> String {
    watchers
        .iter()
        .map(|w| w.name())
        .collect::<Vec<_>>()
        .join(", ")
}

impl<S, A> Clone for Watchers<S, A> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            logger: self.logger.clone(),
            validate: self.validate,
        }
    }
}

impl<S: 'static, A: 'static> Default for Watchers<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: 'static, A: 'static> fmt::Display for Watchers<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_listing("Watchers", self.pool.iter()))
    }
}

impl<S: 'static, A: 'static> fmt::Debug for Watchers<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl<S: 'static, A: 'static> Add for &Watchers<S, A> {
    type Output = Watchers<S, A>;

    fn add(self, other: &Watchers<S, A>) -> Watchers<S, A> {
        self.merge(other)
    }
}

impl<'a, S: 'static, A: 'static> IntoIterator for &'a Watchers<S, A> {
    type Item = &'a WatcherRef<S, A>;
    type IntoIter = std::slice::Iter<'a, WatcherRef<S, A>>;

    fn into_iter(self) -> Self::IntoIter {
        self.pool.iter()
    }
}
