//! Error kind enumeration for categorizing client errors.

/// Categorization of client errors.
///
/// This enum provides a stable interface for matching on error types, so
/// callers can tell a malformed daemon address from a daemon-side failure
/// or a cancelled request.
///
/// ## Categories
///
/// | ErrorKind             | Category             | Retriable |
/// |-----------------------|----------------------|-----------|
/// | `InvalidAddress`      | Address parsing      | No        |
/// | `UnsupportedProtocol` | Address parsing      | No        |
/// | `PathTooLong`         | Address parsing      | No        |
/// | `Configuration`       | Construction         | No        |
/// | `InvalidRequest`      | Request construction | No        |
/// | `Connection`          | Transport            | Yes       |
/// | `Timeout`             | Transport            | Yes       |
/// | `Cancelled`           | Transport            | Caller    |
/// | `Transport`           | Transport            | Yes       |
/// | `Daemon`              | Daemon               | Depends   |
/// | `ResponseRead`        | Response             | Yes       |
///
/// The client never retries on its own; `is_retriable()` is a hint for callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The daemon address has no `scheme://` separator or an unparsable target.
    #[error("invalid address")]
    InvalidAddress,

    /// The daemon address scheme is neither `tcp` nor `unix`.
    #[error("unsupported protocol")]
    UnsupportedProtocol,

    /// The Unix socket path exceeds the platform `sun_path` limit.
    #[error("socket path too long")]
    PathTooLong,

    /// Invalid client configuration (empty registry, bad scheme, HTTP client setup).
    #[error("configuration error")]
    Configuration,

    /// The outgoing request could not be constructed (malformed URL or header).
    #[error("invalid request")]
    InvalidRequest,

    /// Connection to the daemon could not be established.
    #[error("connection error")]
    Connection,

    /// The request exceeded its configured timeout.
    #[error("timeout")]
    Timeout,

    /// The caller cancelled the request before it completed.
    #[error("cancelled")]
    Cancelled,

    /// Generic HTTP failure while sending the request.
    #[error("transport error")]
    Transport,

    /// The daemon answered with a non-200 status.
    #[error("daemon error")]
    Daemon,

    /// The response body could not be read (error body or success stream).
    #[error("response read error")]
    ResponseRead,
}

impl ErrorKind {
    /// Returns `true` for failures produced while parsing the daemon address.
    #[inline]
    pub fn is_address_error(&self) -> bool {
        matches!(
            self,
            ErrorKind::InvalidAddress | ErrorKind::UnsupportedProtocol | ErrorKind::PathTooLong
        )
    }

    /// Returns `true` for failures on the way to the daemon, cancellation included.
    ///
    /// Transport errors never carry a daemon status code.
    #[inline]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ErrorKind::Connection | ErrorKind::Timeout | ErrorKind::Cancelled | ErrorKind::Transport
        )
    }

    /// Returns `true` if this error kind is generally safe to retry.
    ///
    /// `Cancelled` is excluded: the caller asked for the abort. `Daemon` is
    /// decided per status code, see [`Error::is_retriable`](crate::Error::is_retriable).
    ///
    /// # Example
    ///
    /// ```rust
    /// use dockerdaemon::ErrorKind;
    ///
    /// assert!(ErrorKind::Connection.is_retriable());
    /// assert!(!ErrorKind::PathTooLong.is_retriable());
    /// ```
    #[inline]
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            ErrorKind::Connection
                | ErrorKind::Timeout
                | ErrorKind::Transport
                | ErrorKind::ResponseRead
        )
    }
}
