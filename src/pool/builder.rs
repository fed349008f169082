use std::rc::Rc;

use crate::logging::{Log, Logger};
use crate::pool::{PoolConfig, Watchers};

/// Builder for constructing a [`Watchers`] pool with an injected logger.
///
/// ```rust
/// use std::rc::Rc;
/// use watchify::{PoolBuilder, TracingLog, Watchers};
///
/// let watchers: Watchers<String> = PoolBuilder::new()
///     .with_logger(Rc::new(TracingLog))
///     .disable_logs(true)
///     .build();
/// assert!(watchers.is_empty());
/// ```
#[derive(Default)]
pub struct PoolBuilder {
    cfg: PoolConfig,
    sink: Option<Rc<dyn Log>>,
}

impl PoolBuilder {
    /// Creates a builder with [`PoolConfig::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, cfg: PoolConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets the logging sink (defaults to [`TracingLog`](crate::TracingLog)).
    pub fn with_logger(mut self, sink: Rc<dyn Log>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Silences the pool's logger.
    pub fn disable_logs(mut self, disable: bool) -> Self {
        self.cfg.disable_logs = disable;
        self
    }

    /// Enables or disables candidate validation.
    pub fn validate(mut self, validate: bool) -> Self {
        self.cfg.validate = validate;
        self
    }

    /// Builds the pool.
    pub fn build<S: 'static, A: 'static>(self) -> Watchers<S, A> {
        let logger = match self.sink {
            Some(sink) => Logger::new(sink),
            None => Logger::default(),
        };
        Watchers::from_parts(self.cfg, logger)
    }
}
