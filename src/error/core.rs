//! Main error type for the Docker daemon client.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

use super::ErrorKind;

/// The primary error type for daemon client operations.
///
/// `Error` carries enough context to diagnose a failure without logs:
/// - [`kind()`](Error::kind): Categorization for `match` statements
/// - [`path()`](Error::path): Operation path the request was posted to
/// - [`status()`](Error::status): HTTP status returned by the daemon
/// - [`is_retriable()`](Error::is_retriable): Quick retry decision
///
/// ## Error Hierarchy
///
/// ```text
/// Error
/// ├── kind: ErrorKind          (category for matching)
/// ├── message: String          (human-readable description)
/// ├── path: Option             (operation path, e.g. /images/create)
/// ├── status: Option           (daemon status code, daemon errors only)
/// └── source: Option           (underlying cause)
/// ```
///
/// ## Example
///
/// ```rust
/// use dockerdaemon::{Error, ErrorKind};
///
/// fn handle_error(err: Error) {
///     match err.kind() {
///         ErrorKind::Cancelled => println!("pull abandoned"),
///         ErrorKind::Daemon => {
///             println!("daemon rejected {:?} with {:?}", err.path(), err.status());
///         }
///         kind if kind.is_retriable() => println!("transient error, caller may retry"),
///         _ => println!("permanent error: {}", err),
///     }
/// }
/// ```
#[derive(Debug)]
pub struct Error {
    /// The error category.
    kind: ErrorKind,

    /// Human-readable error message.
    message: Cow<'static, str>,

    /// Operation path the failing request targeted.
    path: Option<String>,

    /// HTTP status code reported by the daemon.
    status: Option<u16>,

    /// The underlying error, if any.
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl Error {
    /// Creates a new error with the given kind and message.
    ///
    /// # Example
    ///
    /// ```rust
    /// use dockerdaemon::{Error, ErrorKind};
    ///
    /// let err = Error::new(ErrorKind::InvalidAddress, "unable to parse docker host `foo`");
    /// assert_eq!(err.kind(), ErrorKind::InvalidAddress);
    /// ```
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            path: None,
            status: None,
            source: None,
        }
    }

    /// Creates an error from a kind with a default message.
    pub fn from_kind(kind: ErrorKind) -> Self {
        let message = match kind {
            ErrorKind::InvalidAddress => "unable to parse docker host",
            ErrorKind::UnsupportedProtocol => "protocol not supported",
            ErrorKind::PathTooLong => "unix socket path is too long",
            ErrorKind::Configuration => "invalid configuration",
            ErrorKind::InvalidRequest => "could not construct request",
            ErrorKind::Connection => "connection failed",
            ErrorKind::Timeout => "request timed out",
            ErrorKind::Cancelled => "request cancelled",
            ErrorKind::Transport => "send request failed",
            ErrorKind::Daemon => "daemon returned an error",
            ErrorKind::ResponseRead => "read response body failed",
        };
        Self::new(kind, message)
    }

    /// Returns the error kind for categorization.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the human-readable message without the kind prefix.
    ///
    /// For daemon errors this is the message the daemon sent back.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the operation path of the failing request, if known.
    #[inline]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Returns the HTTP status code reported by the daemon, if any.
    ///
    /// Only [`ErrorKind::Daemon`] errors carry a status.
    #[inline]
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Returns `true` if the caller cancelled the request.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.kind == ErrorKind::Cancelled
    }

    /// Returns `true` if this error is generally safe to retry.
    ///
    /// Daemon errors are retriable only for 5xx statuses; everything else
    /// follows [`ErrorKind::is_retriable`].
    pub fn is_retriable(&self) -> bool {
        match (self.kind, self.status) {
            (ErrorKind::Daemon, Some(status)) => status >= 500,
            (kind, _) => kind.is_retriable(),
        }
    }

    /// Sets the operation path for this error.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the daemon status code for this error.
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the source error for this error.
    #[must_use]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    // Convenience constructors for common error types

    /// Creates an invalid address error.
    pub fn invalid_address(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidAddress, message)
    }

    /// Creates an unsupported protocol error.
    pub fn unsupported_protocol(protocol: &str) -> Self {
        Self::new(
            ErrorKind::UnsupportedProtocol,
            format!("protocol {} not supported", protocol),
        )
    }

    /// Creates a socket path too long error.
    pub fn path_too_long(path: &str, limit: usize) -> Self {
        Self::new(
            ErrorKind::PathTooLong,
            format!("unix socket path {:?} is too long (limit {} bytes)", path, limit),
        )
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Creates an invalid request error.
    pub fn invalid_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidRequest, message)
    }

    /// Creates a connection error.
    pub fn connection(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Connection, message)
    }

    /// Creates a timeout error.
    pub fn timeout(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// Creates a cancelled error.
    pub fn cancelled() -> Self {
        Self::from_kind(ErrorKind::Cancelled)
    }

    /// Creates a transport error.
    pub fn transport(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    /// Creates a daemon error for a non-200 response.
    pub fn daemon(
        path: impl Into<String>,
        status: u16,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::new(ErrorKind::Daemon, message)
            .with_path(path)
            .with_status(status)
    }

    /// Creates a response read error.
    pub fn response_read(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::ResponseRead, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.path, self.status) {
            (Some(path), Some(status)) => write!(
                f,
                "{}: error posting to {}: code {}, err: {}",
                self.kind, path, status, self.message
            ),
            (Some(path), None) => write!(f, "{}: {} ({})", self.kind, self.message, path),
            _ => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// Implement From for common error types

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::from_kind(kind)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::invalid_request(format!("invalid URL: {}", err)).with_source(err)
    }
}
