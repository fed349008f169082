//! # Watcher abstractions.
//!
//! This module provides the watcher-side types:
//! - [`Watch`] - the single-operation capability every watcher implements
//! - [`WatcherRef`] - shared handle to a watcher (`Rc<dyn Watch<S, A>>`)
//! - [`WatchFn`] - closure-backed watcher implementation

mod watch_fn;
mod watcher;

pub use watch_fn::WatchFn;
pub use watcher::{Watch, WatcherRef};

pub(crate) use watcher::short_type_name;
