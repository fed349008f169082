//! # `Log` sink and the toggled [`Logger`] handle.

use std::fmt;
use std::rc::Rc;

/// Minimal logging sink required by pools.
pub trait Log {
    /// Records a debug-level message.
    fn debug(&self, message: &str);

    /// Records an error-level message.
    fn error(&self, message: &str);
}

/// Default sink: forwards to the `tracing` macros.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLog;

impl Log for TracingLog {
    fn debug(&self, message: &str) {
        tracing::debug!("{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!("{}", message);
    }
}

/// Sink handle with an on/off switch.
///
/// Cloning shares the sink; the switch is per clone.
#[derive(Clone)]
pub struct Logger {
    sink: Rc<dyn Log>,
    enabled: bool,
}

impl Logger {
    /// Wraps a sink. Logging starts enabled.
    pub fn new(sink: Rc<dyn Log>) -> Self {
        Self {
            sink,
            enabled: true,
        }
    }

    /// Turns logging on or off.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Returns `true` if messages reach the sink.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn debug(&self, message: impl FnOnce() -> String) {
        if self.enabled {
            self.sink.debug(&message());
        }
    }

    pub(crate) fn error(&self, message: impl FnOnce() -> String) {
        if self.enabled {
            self.sink.error(&message());
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(Rc::new(TracingLog))
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}
