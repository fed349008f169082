//! # Watcher capability.
//!
//! Provides [`Watch`], the contract a listener satisfies to be attached to a pool.
//!
//! A watcher is called with the **sender** (the observed object) and the
//! **arguments** of the event. For spied methods the arguments are the ones the
//! intercepted method was called with.
//!
//! ## Rules
//! - Watchers are shared: pools store [`WatcherRef`] handles, never the watcher itself.
//! - Identity is the handle's allocation. Attaching the same handle twice yields two entries;
//!   detaching removes the first one.
//! - Failures are returned, not panicked. Validating pools catch panics anyway.
//!
//! ## Example
//! ```rust
//! use std::rc::Rc;
//! use watchify::{PushError, Watch, WatcherRef};
//!
//! struct Food { name: String }
//!
//! struct CatWatcher;
//!
//! impl Watch<Food> for CatWatcher {
//!     fn push(&self, food: &Food, _args: &()) -> Result<(), PushError> {
//!         if food.name == "fish" {
//!             Ok(())
//!         } else {
//!             Err(format!("Cat hates {}!", food.name).into())
//!         }
//!     }
//! }
//!
//! let w: WatcherRef<Food> = Rc::new(CatWatcher);
//! assert_eq!(w.name(), "CatWatcher");
//! ```

use std::rc::Rc;

use crate::error::PushError;

/// Shared handle to a watcher.
pub type WatcherRef<S, A = ()> = Rc<dyn Watch<S, A>>;

/// Listener notified by a pool.
///
/// `S` is the sender type, `A` the event arguments (`()` when there are none).
pub trait Watch<S, A = ()>: 'static {
    /// Handles one notification.
    ///
    /// Called synchronously, in attach order, on the notifying thread.
    fn push(&self, sender: &S, args: &A) -> Result<(), PushError>;

    /// Returns the name shown in pool listings and log lines.
    ///
    /// The default is the unqualified type name (e.g. `CatWatcher`).
    fn name(&self) -> &str {
        short_type_name::<Self>()
    }
}

/// `a::b::CatWatcher<x::Y>` → `CatWatcher`.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let path = full.split('<').next().unwrap_or(full);
    path.rsplit("::").next().unwrap_or(path)
}
