//! # watchify
//!
//! **Watchify** is a small, synchronous observer library for Rust.
//!
//! Senders broadcast state changes to a pool of watchers without knowing them at
//! compile time. A spy registry retrofits notification onto existing objects by
//! wrapping one of their methods, and can put the original back at any time.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   Watcher    │   │   Watcher    │   │   Watcher    │
//!     │ (impl Watch) │   │ (impl Watch) │   │  (WatchFn)   │
//!     └──────▲───────┘   └──────▲───────┘   └──────▲───────┘
//!            │ push(sender, args)                  │
//! ┌──────────┴──────────────────┴──────────────────┴──────────────────┐
//! │  SpyRegistry                                                      │
//! │  - spy table: (sender, method) ─► SpyRecord { original, trigger } │
//! │  ┌─────────────────────────────────────────────────────────────┐  │
//! │  │  Watchers (validation, logging, failure isolation)          │  │
//! │  │  ┌───────────────────────────────────────────────────────┐  │  │
//! │  │  │  WatcherPool (ordered handles, attach/detach/notify)  │  │  │
//! │  │  └───────────────────────────────────────────────────────┘  │  │
//! │  └─────────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────▲────────────────────────────────┘
//!                                    │ wrapper calls notify
//!                         ┌──────────┴──────────┐
//!                         │  Spyable object     │
//!                         │  Method slot ─► fn  │
//!                         └─────────────────────┘
//! ```
//!
//! ### Notification
//! ```text
//! Watchers::notify(sender, args)
//!   for watcher in attach order:
//!     ├─► debug "Notifying watcher: <name>."
//!     ├─► push(sender, args)
//!     │     ├─ Ok        ─► next
//!     │     └─ Err/panic ─► isolated: error log, next
//!     │                     strict:   WatchError::Notification, stop
//! ```
//!
//! ## Features
//! | Area            | Description                                                  | Key types / traits                       |
//! |-----------------|--------------------------------------------------------------|------------------------------------------|
//! | **Watchers**    | Listener contract and closure-backed listeners.              | [`Watch`], [`WatcherRef`], [`WatchFn`]   |
//! | **Pools**       | Ordered pools, validation, failure isolation.                | [`WatcherPool`], [`Watchers`]            |
//! | **Spying**      | Reversible method interception.                              | [`SpyRegistry`], [`Spyable`], [`Method`] |
//! | **Errors**      | Typed errors for validation, lookups and strict notify.      | [`WatchError`], [`PushError`]            |
//! | **Logging**     | Injected sink, `tracing` by default.                         | [`Log`], [`TracingLog`]                  |
//! | **Configuration** | Pool settings and builder.                                 | [`PoolConfig`], [`PoolBuilder`]          |
//!
//! ## Threading
//! Everything runs on the caller's thread. Pools, registries and method slots use
//! `Rc`/`RefCell` and are neither `Send` nor `Sync`.
//!
//! ## Example
//! ```rust
//! use std::rc::Rc;
//! use watchify::{PushError, Watch, WatcherRef, Watchers};
//!
//! struct Food {
//!     name: String,
//! }
//!
//! struct MonkeyWatcher;
//!
//! impl Watch<Food> for MonkeyWatcher {
//!     fn push(&self, food: &Food, _: &()) -> Result<(), PushError> {
//!         if food.name == "banana" {
//!             Ok(())
//!         } else {
//!             Err(format!("Monkey hates {}!", food.name).into())
//!         }
//!     }
//! }
//!
//! let monkey: WatcherRef<Food> = Rc::new(MonkeyWatcher);
//! let mut watchers = Watchers::new();
//! watchers.attach(monkey.clone());
//!
//! // Failures are logged, not returned.
//! watchers.notify(&Food { name: "fish".into() }, &());
//!
//! // Strict mode returns the first failure.
//! let err = watchers.notify_strict(&Food { name: "fish".into() }, &()).unwrap_err();
//! assert_eq!(err.as_label(), "notification_failed");
//!
//! watchers.detach(&monkey).unwrap();
//! assert!(watchers.is_empty());
//! ```
mod error;
mod logging;
mod pool;
mod spy;
mod watchers;

// ---- Public re-exports ----

pub use error::{PushError, WatchError};
pub use logging::{Log, Logger, TracingLog};
pub use pool::{
    Candidate, NotifyMode, PoolBuilder, PoolConfig, WatcherPool, WatcherSource, Watchers,
};
pub use spy::{Method, MethodFn, SpyRecord, SpyRegistry, Spyable, Trigger};
pub use watchers::{Watch, WatchFn, WatcherRef};
