//! Daemon address parsing.
//!
//! `url::Url` cannot parse `unix:///...` into something usable as an HTTP
//! authority, so the scheme is split off by hand and each transport parses
//! its own remainder.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use url::Url;

use crate::Error;

/// Authority placed in request URLs when the daemon is reached over a
/// Unix socket. Matches the `Host` header the client always sends.
pub const UNIX_EFFECTIVE_HOST: &str = "docker";

/// Capacity of `sockaddr_un.sun_path` on this platform.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub const MAX_UNIX_SOCKET_PATH: usize = 108;

/// Capacity of `sockaddr_un.sun_path` on this platform.
#[cfg(not(any(target_os = "linux", target_os = "android")))]
pub const MAX_UNIX_SOCKET_PATH: usize = 104;

/// A parsed daemon address.
///
/// Exactly one variant is chosen when the client is built and it never
/// changes afterwards.
///
/// ## Example
///
/// ```rust
/// use dockerdaemon::DaemonAddress;
///
/// let tcp: DaemonAddress = "tcp://10.0.0.5:2375/docker".parse()?;
/// assert_eq!(tcp.effective_host(), "10.0.0.5:2375");
/// assert_eq!(tcp.base_path(), "/docker");
///
/// let unix: DaemonAddress = "unix:///var/run/docker.sock".parse()?;
/// assert_eq!(unix.effective_host(), "docker");
/// assert_eq!(unix.base_path(), "");
/// # Ok::<(), dockerdaemon::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaemonAddress {
    /// Daemon listening on a TCP port.
    Tcp {
        /// `host[:port]` used as the request authority.
        authority: String,
        /// Path prefix applied to every request; empty when absent.
        base_path: String,
    },
    /// Daemon listening on a local Unix socket.
    Unix {
        /// Filesystem path of the socket.
        path: PathBuf,
    },
}

impl DaemonAddress {
    /// Parses a `scheme://target` daemon address.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::InvalidAddress`](crate::ErrorKind::InvalidAddress) when
    ///   `://` is missing or the TCP target is not a valid URL with a host.
    /// - [`ErrorKind::UnsupportedProtocol`](crate::ErrorKind::UnsupportedProtocol)
    ///   for schemes other than `tcp` and `unix`.
    /// - [`ErrorKind::PathTooLong`](crate::ErrorKind::PathTooLong) when the
    ///   socket path exceeds [`MAX_UNIX_SOCKET_PATH`].
    pub fn parse(host: &str) -> Result<Self, Error> {
        let Some((protocol, addr)) = host.split_once("://") else {
            return Err(Error::invalid_address(format!(
                "unable to parse docker host `{}`",
                host
            )));
        };

        match protocol {
            "tcp" => parse_tcp(host, addr),
            "unix" => parse_unix(addr),
            other => Err(Error::unsupported_protocol(other)),
        }
    }

    /// Returns the authority to place in outgoing request URLs.
    pub fn effective_host(&self) -> &str {
        match self {
            DaemonAddress::Tcp { authority, .. } => authority,
            DaemonAddress::Unix { .. } => UNIX_EFFECTIVE_HOST,
        }
    }

    /// Returns the path prefix applied to every request.
    pub fn base_path(&self) -> &str {
        match self {
            DaemonAddress::Tcp { base_path, .. } => base_path,
            DaemonAddress::Unix { .. } => "",
        }
    }

    /// Returns the socket path for Unix addresses.
    pub fn socket_path(&self) -> Option<&Path> {
        match self {
            DaemonAddress::Unix { path } => Some(path),
            DaemonAddress::Tcp { .. } => None,
        }
    }

    /// Returns `true` if the daemon is reached over a Unix socket.
    pub fn is_unix(&self) -> bool {
        matches!(self, DaemonAddress::Unix { .. })
    }
}

fn parse_tcp(host: &str, addr: &str) -> Result<DaemonAddress, Error> {
    let parsed = Url::parse(&format!("tcp://{}", addr)).map_err(|e| {
        Error::invalid_address(format!("unable to parse docker host `{}`: {}", host, e))
            .with_source(e)
    })?;

    let hostname = parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| Error::invalid_address(format!("docker host `{}` has no host", host)))?;

    let authority = match parsed.port() {
        Some(port) => format!("{}:{}", hostname, port),
        None => hostname.to_string(),
    };

    // A bare trailing slash carries no prefix.
    let base_path = match parsed.path() {
        "/" => String::new(),
        path => path.to_string(),
    };

    Ok(DaemonAddress::Tcp {
        authority,
        base_path,
    })
}

fn parse_unix(addr: &str) -> Result<DaemonAddress, Error> {
    if addr.is_empty() {
        return Err(Error::invalid_address("unix socket path cannot be empty"));
    }
    if addr.len() > MAX_UNIX_SOCKET_PATH {
        return Err(Error::path_too_long(addr, MAX_UNIX_SOCKET_PATH));
    }
    Ok(DaemonAddress::Unix {
        path: PathBuf::from(addr),
    })
}

impl FromStr for DaemonAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DaemonAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DaemonAddress::Tcp {
                authority,
                base_path,
            } => write!(f, "tcp://{}{}", authority, base_path),
            DaemonAddress::Unix { path } => write!(f, "unix://{}", path.display()),
        }
    }
}
