//! # Logging collaborator for pools and registries.
//!
//! Pools do not log through a process-wide logger directly. They hold a [`Logger`]
//! built around an injected [`Log`] sink:
//!
//! ```text
//! Watchers ── Logger { enabled } ──► Rc<dyn Log>
//!                                      ├──► TracingLog (default, forwards to `tracing`)
//!                                      └──► custom sink (tests, application loggers)
//! ```
//!
//! ## Implementing a custom sink
//! ```rust
//! use std::cell::RefCell;
//! use watchify::Log;
//!
//! #[derive(Default)]
//! struct Recorder(RefCell<Vec<String>>);
//!
//! impl Log for Recorder {
//!     fn debug(&self, message: &str) {
//!         self.0.borrow_mut().push(format!("debug: {message}"));
//!     }
//!
//!     fn error(&self, message: &str) {
//!         self.0.borrow_mut().push(format!("error: {message}"));
//!     }
//! }
//! ```

mod log;

pub use log::{Log, Logger, TracingLog};
