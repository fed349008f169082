//! # Function-backed watcher (`WatchFn`)
//!
//! [`WatchFn`] wraps a closure `F: Fn(&S, &A) -> Result<(), PushError>` under a fixed
//! name, for listeners that do not deserve their own type.
//!
//! ## Example
//! ```rust
//! use watchify::{WatchFn, WatcherRef};
//!
//! let w: WatcherRef<u32> = WatchFn::rc("printer", |n: &u32, _: &()| {
//!     println!("got {n}");
//!     Ok(())
//! });
//! assert_eq!(w.name(), "printer");
//! ```

use std::borrow::Cow;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::error::PushError;
use crate::watchers::watcher::Watch;

/// Closure-backed watcher implementation.
pub struct WatchFn<F, S, A = ()> {
    name: Cow<'static, str>,
    f: F,
    _marker: PhantomData<fn(&S, &A)>,
}

impl<F, S, A> WatchFn<F, S, A>
where
    F: Fn(&S, &A) -> Result<(), PushError> + 'static,
{
    /// Creates a new closure-backed watcher.
    ///
    /// Prefer [`WatchFn::rc`] when you immediately need a [`WatcherRef`](crate::WatcherRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
            _marker: PhantomData,
        }
    }

    /// Creates the watcher and returns it as a shared handle.
    pub fn rc(name: impl Into<Cow<'static, str>>, f: F) -> Rc<Self> {
        Rc::new(Self::new(name, f))
    }
}

impl<F, S, A> Watch<S, A> for WatchFn<F, S, A>
where
    F: Fn(&S, &A) -> Result<(), PushError> + 'static,
    S: 'static,
    A: 'static,
{
    fn push(&self, sender: &S, args: &A) -> Result<(), PushError> {
        (self.f)(sender, args)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
