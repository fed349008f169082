//! # Method spying.
//!
//! Retrofits notification onto an existing object: a [`SpyRegistry`] swaps one
//! of the object's [`Method`] slots for a wrapper that also notifies the
//! registry's watchers, and puts the original back on undo.
//!
//! ## Architecture
//! ```text
//! Food { cook: Method } ──► slot: Rc<RefCell<MethodFn>>
//!                                    │
//!        spy(&food, "cook", After)   │  install wrapper, keep original in SpyRecord
//!                                    ▼
//!                          wrapper(this, args)
//!                            ├─► original(this, args)
//!                            └─► Watchers::notify(this, args)   (isolated)
//!
//!        undo_spy(&food, "cook")  ──► slot = original (pointer-identical)
//! ```
//!
//! ## Rules
//! - Only methods exposed through [`Spyable::method`] can be spied.
//! - A (sender, method) pair is spied at most once per registry; re-spying fails with
//!   [`WatchError::AlreadySpied`](crate::WatchError::AlreadySpied).
//! - Spy-triggered notifications are isolated: a failing watcher never aborts the wrapped call.
//! - Wrappers hold a weak link to the registry's pool; once the registry is dropped they
//!   only run the original.

mod method;
mod record;
mod registry;

pub use method::{Method, MethodFn, Spyable};
pub use record::{SpyRecord, Trigger};
pub use registry::SpyRegistry;
