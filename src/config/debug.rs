//! Debug toggles for request and cache logging.

/// Flags controlling diagnostic logging of the fetch layer.
///
/// These only decide whether events are emitted; they never change how a
/// request or cache lookup behaves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugFlags {
    /// Log every attempt and every cache hit, miss, expiry, set and clear.
    pub debug_api_calls: bool,
    /// Log each URL handed to the request executor.
    pub enable_api_logging: bool,
}

impl DebugFlags {
    /// Creates flags with all logging disabled.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            debug_api_calls: false,
            enable_api_logging: false,
        }
    }

    /// Creates flags with all logging enabled.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            debug_api_calls: true,
            enable_api_logging: true,
        }
    }
}
