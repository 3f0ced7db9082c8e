//! Daemon connection configuration.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use super::TransportConfig;
use crate::Error;

/// URL scheme presented to the daemon in request URLs.
///
/// This is independent of the wire transport: a Unix-socket daemon is still
/// addressed with `http://docker/...` URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// Plain HTTP (the daemon's default).
    #[default]
    Http,
    /// HTTP over TLS.
    Https,
}

impl Scheme {
    /// Returns the scheme as it appears in a URL.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "http" => Ok(Scheme::Http),
            "https" => Ok(Scheme::Https),
            other => Err(Error::configuration(format!(
                "scheme `{}` not supported, expected http or https",
                other
            ))),
        }
    }
}

/// Configuration for a [`DockerClient`](crate::DockerClient).
///
/// Fixed at construction; nothing here changes for the lifetime of a client.
///
/// ## Example
///
/// ```rust
/// use dockerdaemon::{DaemonConfig, Scheme};
///
/// let config = DaemonConfig::builder()
///     .host("unix:///var/run/docker.sock")
///     .registry("localhost:5367")
///     .version("1.24")
///     .scheme(Scheme::Http)
///     .build();
///
/// assert!(config.validate().is_ok());
/// ```
///
/// The type also deserializes from any serde format, so callers can embed it
/// in their own configuration files:
///
/// ```yaml
/// host: tcp://127.0.0.1:2375
/// version: "1.24"
/// registry: localhost:5367
/// ```
#[derive(Debug, Clone, bon::Builder, Deserialize)]
pub struct DaemonConfig {
    /// Daemon address, `tcp://host:port[/path]` or `unix:///path/to/socket`.
    #[builder(into)]
    pub host: String,

    /// URL scheme to present in request URLs.
    #[builder(default)]
    #[serde(default)]
    pub scheme: Scheme,

    /// API version, e.g. `1.24` or `v1.24`. Empty means unversioned paths.
    #[builder(into, default)]
    #[serde(default)]
    pub version: String,

    /// Registry hostname prefixed to every repository name.
    #[builder(into)]
    pub registry: String,

    /// HTTP transport tuning.
    #[builder(default)]
    #[serde(default)]
    pub transport: TransportConfig,
}

impl DaemonConfig {
    /// Checks the settings that can be validated without touching the network.
    pub fn validate(&self) -> Result<(), Error> {
        if self.host.is_empty() {
            return Err(Error::configuration("docker host cannot be empty"));
        }
        if self.registry.is_empty() {
            return Err(Error::configuration("registry cannot be empty"));
        }
        if self.registry.contains('/') {
            return Err(Error::configuration(format!(
                "registry `{}` must be a hostname, not a path",
                self.registry
            )));
        }
        Ok(())
    }
}
