//! # Watcher pools.
//!
//! Two layers, the second wrapping the first:
//!
//! ```text
//! Watchers (validation, logging, failure isolation)
//!    └──► WatcherPool (ordered Vec<WatcherRef>, attach/detach/notify, no policy)
//! ```
//!
//! - [`WatcherPool`] is the minimal base: a failing watcher aborts `notify`.
//! - [`Watchers`] adds runtime validation of type-erased input ([`Candidate`]),
//!   debug logging of every mutation, and per-watcher failure isolation.
//! - [`PoolConfig`] / [`PoolBuilder`] configure a [`Watchers`].

mod base;
mod builder;
mod candidate;
mod config;
mod validating;

pub use base::{WatcherPool, WatcherSource};
pub use builder::PoolBuilder;
pub use candidate::Candidate;
pub use config::PoolConfig;
pub use validating::{NotifyMode, Watchers};

pub(crate) use base::{generic_label, render_listing};
