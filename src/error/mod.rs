//! Error types for the Docker daemon client.
//!
//! Every fallible operation returns [`Error`], categorized by [`ErrorKind`]:
//!
//! - address parsing: `InvalidAddress`, `UnsupportedProtocol`, `PathTooLong`
//! - request construction: `Configuration`, `InvalidRequest`
//! - transport: `Connection`, `Timeout`, `Cancelled`, `Transport`
//! - daemon: `Daemon` (carries the status code and operation path)
//! - response: `ResponseRead`
//!
//! ```rust,ignore
//! match client.image_pull(&cancel, "library/redis", "7").await {
//!     Ok(()) => {}
//!     Err(e) if e.kind() == ErrorKind::Cancelled => { /* shutting down */ }
//!     Err(e) if e.status() == Some(404) => { /* no such image */ }
//!     Err(e) => return Err(e),
//! }
//! ```

mod core;
mod kind;

pub use self::core::Error;
pub use kind::ErrorKind;

/// A specialized `Result` type for daemon client operations.
pub type Result<T> = std::result::Result<T, Error>;
