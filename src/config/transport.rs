//! HTTP transport tuning.

use std::time::Duration;

use serde::Deserialize;

/// Connect timeout used for every Unix-socket connection.
///
/// TCP connections use [`TransportConfig::connect_timeout`] instead.
pub const UNIX_CONNECT_TIMEOUT: Duration = Duration::from_secs(32);

/// Configuration for the pooled HTTP transport.
///
/// ## Default Values
///
/// - `connect_timeout`: 10s (TCP only)
/// - `request_timeout`: none
/// - `pool_idle_timeout`: 90s
/// - `pool_max_idle_per_host`: 8
///
/// No request timeout is set by default because an image pull keeps the
/// response open until the daemon finishes; use a cancellation token to bound
/// individual calls instead.
///
/// ## Example
///
/// ```rust
/// use dockerdaemon::TransportConfig;
/// use std::time::Duration;
///
/// let config = TransportConfig::builder()
///     .connect_timeout(Duration::from_secs(5))
///     .request_timeout(Duration::from_secs(600))
///     .build();
/// ```
#[derive(Debug, Clone, bon::Builder, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Connect timeout for TCP daemons.
    #[builder(default = Duration::from_secs(10))]
    pub connect_timeout: Duration,

    /// Total timeout per request, body drain included.
    pub request_timeout: Option<Duration>,

    /// How long idle pooled connections are kept.
    #[builder(default = Duration::from_secs(90))]
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections kept per host.
    #[builder(default = 8)]
    pub pool_max_idle_per_host: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
