//! Docker daemon client.
//!
//! [`DockerClient`] owns a resolved transport plus the fixed configuration
//! (API version, URL scheme, registry) and exposes image pulls on top of a
//! generic versioned POST.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dockerdaemon::DockerClient;
//! use tokio_util::sync::CancellationToken;
//!
//! let client = DockerClient::builder()
//!     .host("unix:///var/run/docker.sock")
//!     .registry("localhost:5367")
//!     .version("1.24")
//!     .build()?;
//!
//! let cancel = CancellationToken::new();
//! client.image_pull(&cancel, "library/redis", "7.2").await?;
//! ```

mod builder;
mod inner;

pub use builder::{ClientBuilder, HasHost, HasRegistry, NoHost, NoRegistry};

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::{DaemonConfig, Scheme};
use crate::testing::ImagePuller;
use crate::transport::{DaemonAddress, PostRequest, RestTransport};
use crate::Error;

/// Daemon endpoint that creates an image by pulling it.
pub const IMAGE_CREATE_PATH: &str = "/images/create";

/// Header carrying base64-encoded registry credentials.
pub const REGISTRY_AUTH_HEADER: &str = "X-Registry-Auth";

/// A client for a single Docker daemon.
///
/// ## Thread Safety
///
/// `DockerClient` is `Clone` and thread-safe. Clones share the same
/// immutable configuration and connection pool, so one client can serve any
/// number of concurrent pulls.
///
/// ## Retries
///
/// Each call makes exactly one attempt. Use
/// [`Error::is_retriable`](crate::Error::is_retriable) to build a retry
/// policy on top.
#[derive(Clone)]
pub struct DockerClient {
    inner: Arc<inner::ClientInner>,
}

impl DockerClient {
    /// Creates a new client builder.
    pub fn builder() -> ClientBuilder<NoHost, NoRegistry> {
        ClientBuilder::new()
    }

    /// Creates a client from a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns an address error if `config.host` cannot be resolved, or a
    /// configuration error if validation or HTTP client setup fails.
    pub fn from_config(config: DaemonConfig) -> Result<Self, Error> {
        config.validate()?;

        let address = DaemonAddress::parse(&config.host)?;
        let transport =
            RestTransport::new(address, config.scheme, config.version, &config.transport)?;

        tracing::debug!(
            address = %transport.address(),
            version = transport.version(),
            registry = %config.registry,
            "docker daemon client created"
        );

        Ok(Self {
            inner: Arc::new(inner::ClientInner {
                transport,
                registry: config.registry,
            }),
        })
    }

    /// Pulls `<registry>/<repository>:<tag>` into the daemon.
    ///
    /// Returns only after the daemon has finished the pull, which it signals
    /// by closing the progress stream. Cancelling `cancel` aborts the pull
    /// request with [`ErrorKind::Cancelled`](crate::ErrorKind::Cancelled).
    ///
    /// The registry auth header is sent empty; the daemon falls back to
    /// anonymous access or its own stored credentials.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cancel = CancellationToken::new();
    /// client.image_pull(&cancel, "library/redis", "7.2").await?;
    /// ```
    #[tracing::instrument(skip(self, cancel), fields(registry = %self.inner.registry))]
    pub async fn image_pull(
        &self,
        cancel: &CancellationToken,
        repository: &str,
        tag: &str,
    ) -> Result<(), Error> {
        let request = PostRequest::new(IMAGE_CREATE_PATH)
            .with_query("fromImage", self.inner.qualified_image(repository))
            .with_query("tag", tag)
            .with_header(REGISTRY_AUTH_HEADER, "")?
            .drain_on_success(true);

        self.inner.post(cancel, request).await
    }

    /// Returns the registry hostname that qualifies repository names.
    pub fn registry(&self) -> &str {
        &self.inner.registry
    }

    /// Returns the configured API version (possibly empty).
    pub fn version(&self) -> &str {
        self.inner.transport.version()
    }

    /// Returns the URL scheme presented to the daemon.
    pub fn scheme(&self) -> Scheme {
        self.inner.transport.scheme()
    }

    /// Returns the resolved daemon address.
    pub fn address(&self) -> &DaemonAddress {
        self.inner.transport.address()
    }
}

impl std::fmt::Debug for DockerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DockerClient")
            .field("address", &self.address().to_string())
            .field("registry", &self.inner.registry)
            .finish_non_exhaustive()
    }
}

impl ImagePuller for DockerClient {
    fn image_pull<'a>(
        &'a self,
        cancel: &'a CancellationToken,
        repository: &'a str,
        tag: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), Error>> + Send + 'a>> {
        Box::pin(DockerClient::image_pull(self, cancel, repository, tag))
    }
}
