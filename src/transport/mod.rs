//! Transport layer for daemon communication.
//!
//! This module resolves a daemon address into a ready-to-use HTTP transport
//! and executes requests against it:
//!
//! - [`DaemonAddress`]: `tcp://` or `unix://` address, parsed once
//! - [`RestTransport`]: pooled reqwest client plus the POST executor
//! - [`PostRequest`]: per-call request descriptor
//!
//! Most callers use [`DockerClient`](crate::DockerClient) and never touch
//! this module directly.
//!
//! ## Address Resolution
//!
//! ```rust
//! use dockerdaemon::transport::DaemonAddress;
//!
//! let addr = DaemonAddress::parse("unix:///var/run/docker.sock")?;
//! assert!(addr.is_unix());
//! assert_eq!(addr.effective_host(), "docker");
//! # Ok::<(), dockerdaemon::Error>(())
//! ```

pub(crate) mod address;
pub(crate) mod request;
pub(crate) mod rest;

pub use address::{DaemonAddress, MAX_UNIX_SOCKET_PATH, UNIX_EFFECTIVE_HOST};
pub use request::{PostRequest, api_path, encode_query};
pub use rest::{DAEMON_HOST_HEADER, RestTransport};
