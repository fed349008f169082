//! # Pool configuration.
//!
//! Provides [`PoolConfig`], the settings a [`Watchers`](crate::Watchers) pool is built from.
//!
//! Config is used in two ways:
//! 1. **Direct creation**: `Watchers::with_config(config)`
//! 2. **Builder**: `PoolBuilder::new().with_config(config)`

/// Settings for a validating pool.
///
/// ## Field semantics
/// - `validate`: check type-erased input ([`Candidate`](crate::Candidate)) before attaching/merging
/// - `disable_logs`: silence the pool's logger
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    /// Reject non-conforming candidates with a typed error.
    ///
    /// When `false`, non-conforming candidates are skipped and logged at error level.
    pub validate: bool,

    /// Drop all log messages emitted by the pool.
    pub disable_logs: bool,
}

impl Default for PoolConfig {
    /// Default configuration:
    ///
    /// - `validate = true`
    /// - `disable_logs = false`
    fn default() -> Self {
        Self {
            validate: true,
            disable_logs: false,
        }
    }
}
