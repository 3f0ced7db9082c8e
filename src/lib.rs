//! # dockerdaemon
//!
//! A minimal client for the Docker Engine API that asks a daemon to pull
//! images from a registry.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dockerdaemon::prelude::*;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), dockerdaemon::Error> {
//!     let client = DockerClient::builder()
//!         .host("unix:///var/run/docker.sock")
//!         .registry("localhost:5367")
//!         .version("1.24")
//!         .build()?;
//!
//!     let cancel = CancellationToken::new();
//!     client.image_pull(&cancel, "library/redis", "7.2").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Key Concepts
//!
//! - **Addresses**: `tcp://host:port[/base]` or `unix:///path/to/socket`
//! - **Versioned paths**: every request goes to `<base>/v<version><path>`,
//!   or `<base><path>` when no version is configured
//! - **Completion**: a pull resolves only after the daemon closes its
//!   progress stream, so `Ok(())` means the image is present
//! - **Cancellation**: every call takes a [`CancellationToken`](tokio_util::sync::CancellationToken)
//!
//! ## Features
//!
//! - `rustls` (default): Use rustls for TLS
//! - `native-tls`: Use native TLS (OpenSSL on Linux, Secure Transport on macOS)

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;

// Transport layer
pub mod transport;

// Testing utilities
pub mod testing;

pub mod prelude;

pub use client::{ClientBuilder, DockerClient};
pub use config::{DaemonConfig, Scheme, TransportConfig};
pub use error::{Error, ErrorKind, Result};
pub use transport::DaemonAddress;

pub use testing::{ImagePuller, MockImagePuller};
