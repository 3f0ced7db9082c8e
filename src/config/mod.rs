//! Configuration types for the Docker daemon client.
//!
//! This module provides configuration options for:
//! - [`DaemonConfig`]: Daemon address, API version, scheme and registry
//! - [`TransportConfig`]: Timeouts and connection pooling

mod daemon;
mod transport;

pub use daemon::{DaemonConfig, Scheme};
pub use transport::{TransportConfig, UNIX_CONNECT_TIMEOUT};
