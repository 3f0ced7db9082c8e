//! Client builder with typestate pattern.

use std::marker::PhantomData;
use std::time::Duration;

use crate::config::{DaemonConfig, Scheme, TransportConfig};
use crate::{DockerClient, Error};

/// Marker type: daemon host not yet provided.
pub struct NoHost;

/// Marker type: daemon host has been provided.
pub struct HasHost;

/// Marker type: registry not yet provided.
pub struct NoRegistry;

/// Marker type: registry has been provided.
pub struct HasRegistry;

/// Builder for creating [`DockerClient`] instances.
///
/// Uses the typestate pattern to ensure required configuration
/// (daemon host and registry) is provided at compile time.
///
/// ## Required Configuration
///
/// - `host()`: The daemon address (`tcp://...` or `unix://...`)
/// - `registry()`: Registry hostname prefixed to repository names
///
/// ## Optional Configuration
///
/// - `version()`: API version (default: unversioned paths)
/// - `scheme()`: URL scheme presented to the daemon (default: `http`)
/// - `transport_config()`: Timeouts and pooling
///
/// ## Example
///
/// ```rust
/// use dockerdaemon::DockerClient;
///
/// let client = DockerClient::builder()
///     .host("unix:///var/run/docker.sock")
///     .registry("localhost:5367")
///     .version("1.24")
///     .build()?;
/// # Ok::<(), dockerdaemon::Error>(())
/// ```
pub struct ClientBuilder<HostState, RegistryState> {
    host: Option<String>,
    registry: Option<String>,
    scheme: Scheme,
    version: String,
    transport_config: TransportConfig,
    _host_state: PhantomData<HostState>,
    _registry_state: PhantomData<RegistryState>,
}

impl ClientBuilder<NoHost, NoRegistry> {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self {
            host: None,
            registry: None,
            scheme: Scheme::default(),
            version: String::new(),
            transport_config: TransportConfig::default(),
            _host_state: PhantomData,
            _registry_state: PhantomData,
        }
    }
}

impl Default for ClientBuilder<NoHost, NoRegistry> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> ClientBuilder<NoHost, R> {
    /// Sets the daemon address.
    ///
    /// # Arguments
    ///
    /// * `host` - `tcp://host:port[/path]` or `unix:///path/to/socket`
    pub fn host(self, host: impl Into<String>) -> ClientBuilder<HasHost, R> {
        ClientBuilder {
            host: Some(host.into()),
            registry: self.registry,
            scheme: self.scheme,
            version: self.version,
            transport_config: self.transport_config,
            _host_state: PhantomData,
            _registry_state: PhantomData,
        }
    }
}

impl<H> ClientBuilder<H, NoRegistry> {
    /// Sets the registry hostname used to qualify repository names.
    ///
    /// Pulling `library/redis` with registry `localhost:5367` asks the
    /// daemon for `localhost:5367/library/redis`.
    pub fn registry(self, registry: impl Into<String>) -> ClientBuilder<H, HasRegistry> {
        ClientBuilder {
            host: self.host,
            registry: Some(registry.into()),
            scheme: self.scheme,
            version: self.version,
            transport_config: self.transport_config,
            _host_state: PhantomData,
            _registry_state: PhantomData,
        }
    }
}

impl<H, R> ClientBuilder<H, R> {
    /// Sets the daemon API version, e.g. `1.24` or `v1.24`.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Sets the URL scheme presented to the daemon.
    #[must_use]
    pub fn scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Sets the transport configuration.
    #[must_use]
    pub fn transport_config(mut self, config: TransportConfig) -> Self {
        self.transport_config = config;
        self
    }

    /// Sets a total timeout per request, body drain included.
    ///
    /// Image pulls hold the response open until the daemon finishes, so
    /// pick a value that covers the largest expected image.
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.transport_config.request_timeout = Some(timeout);
        self
    }
}

impl ClientBuilder<HasHost, HasRegistry> {
    /// Builds the client.
    ///
    /// Parses the daemon address and prepares the connection pool. No
    /// connection is opened until the first request.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The host is not a valid `tcp://` or `unix://` address
    /// - The registry is empty or not a bare hostname
    /// - The HTTP client cannot be created
    pub fn build(self) -> Result<DockerClient, Error> {
        let host = self.host.ok_or_else(|| Error::configuration("docker host is required"))?;
        let registry = self
            .registry
            .ok_or_else(|| Error::configuration("registry is required"))?;

        DockerClient::from_config(DaemonConfig {
            host,
            scheme: self.scheme,
            version: self.version,
            registry,
            transport: self.transport_config,
        })
    }
}
