//! HTTP transport to the daemon using reqwest.
//!
//! Builds one pooled `reqwest::Client` per daemon address and executes
//! versioned POSTs against it, including the daemon's two-phase success
//! protocol: a 200 status acknowledges the operation, a fully drained body
//! means it finished.

use std::time::Duration;

use futures::StreamExt;
use reqwest::StatusCode;
use reqwest::header::{HOST, HeaderValue};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::{Scheme, TransportConfig, UNIX_CONNECT_TIMEOUT};
use crate::transport::address::DaemonAddress;
use crate::transport::request::{PostRequest, api_path, encode_query};
use crate::{Error, ErrorKind};

/// Synthetic `Host` header sent on every request.
///
/// A Unix-socket daemon has no network host to route by, yet HTTP/1.1
/// requires one.
pub const DAEMON_HOST_HEADER: &str = "docker";

// ============================================================================
// REST Transport
// ============================================================================

/// Pooled HTTP transport bound to a single daemon.
///
/// Cloning is cheap and clones share the connection pool. Nothing in the
/// transport changes after construction.
#[derive(Clone)]
pub struct RestTransport {
    client: reqwest::Client,
    address: DaemonAddress,
    scheme: Scheme,
    version: String,
    request_timeout: Option<Duration>,
}

impl std::fmt::Debug for RestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestTransport")
            .field("address", &self.address.to_string())
            .field("scheme", &self.scheme)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl RestTransport {
    /// Creates a transport for the given daemon address.
    ///
    /// TCP daemons are dialed normally with the configured connect timeout.
    /// Unix-socket daemons are dialed at the socket path with a fixed
    /// [`UNIX_CONNECT_TIMEOUT`] and response compression disabled.
    pub fn new(
        address: DaemonAddress,
        scheme: Scheme,
        version: impl Into<String>,
        config: &TransportConfig,
    ) -> Result<Self, Error> {
        let builder = reqwest::Client::builder()
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(user_agent());

        let builder = match &address {
            DaemonAddress::Tcp { .. } => builder.connect_timeout(config.connect_timeout),
            DaemonAddress::Unix { path } => unix_socket_builder(builder, path)?,
        };

        let client = builder.build().map_err(|e| {
            Error::new(
                ErrorKind::Configuration,
                format!("Failed to create HTTP client: {}", e),
            )
            .with_source(e)
        })?;

        Ok(Self {
            client,
            address,
            scheme,
            version: version.into(),
            request_timeout: config.request_timeout,
        })
    }

    /// Returns the daemon address this transport dials.
    pub fn address(&self) -> &DaemonAddress {
        &self.address
    }

    /// Returns the configured API version (possibly empty).
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the URL scheme presented to the daemon.
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Builds the absolute request URL for an operation.
    pub fn request_url(&self, path: &str, query: &[(String, String)]) -> Result<Url, Error> {
        let mut url = Url::parse(&format!(
            "{}://{}",
            self.scheme,
            self.address.effective_host()
        ))?;
        url.set_path(&api_path(self.address.base_path(), &self.version, path));
        url.set_query(encode_query(query).as_deref());
        Ok(url)
    }

    /// Executes a POST and interprets the daemon's response.
    ///
    /// Returns once the status has been checked and, when
    /// `drain_on_success` is set, the body has been read to EOF. Firing
    /// `cancel` aborts the in-flight request with
    /// [`ErrorKind::Cancelled`]; the response body is dropped on every exit
    /// path, which returns or closes the connection.
    pub async fn execute(
        &self,
        cancel: &CancellationToken,
        request: PostRequest,
    ) -> Result<(), Error> {
        let path = request.path.clone();

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(path = %path, "daemon request cancelled");
                Err(Error::cancelled().with_path(path))
            }
            result = self.send(request) => result,
        }
    }

    async fn send(&self, request: PostRequest) -> Result<(), Error> {
        let PostRequest {
            path,
            query,
            mut headers,
            body,
            drain_on_success,
        } = request;

        let url = self
            .request_url(&path, &query)
            .map_err(|e| e.with_path(path.as_str()))?;
        headers.insert(HOST, HeaderValue::from_static(DAEMON_HOST_HEADER));

        let mut builder = self.client.post(url.clone()).headers(headers).body(body);
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }

        tracing::debug!(url = %url, "posting to docker daemon");

        let response = builder
            .send()
            .await
            .map_err(|e| map_reqwest_error(e).with_path(path.as_str()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let error_text = response.text().await.map_err(|e| {
                Error::response_read(format!("read error resp: {}", e))
                    .with_path(path.as_str())
                    .with_source(e)
            })?;
            let err = map_status_error(&path, status.as_u16(), &error_text);
            tracing::warn!(
                path = %path,
                status = status.as_u16(),
                "daemon returned error: {}",
                err.message()
            );
            return Err(err);
        }

        if drain_on_success {
            let drained = drain(response).await.map_err(|e| {
                Error::response_read(format!("read resp body: {}", e))
                    .with_path(path.as_str())
                    .with_source(e)
            })?;
            tracing::debug!(path = %path, bytes = drained, "drained daemon response");
        }

        Ok(())
    }
}

fn user_agent() -> String {
    format!(
        "dockerdaemon-rust/{} ({}/{})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

#[cfg(unix)]
fn unix_socket_builder(
    builder: reqwest::ClientBuilder,
    path: &std::path::Path,
) -> Result<reqwest::ClientBuilder, Error> {
    Ok(builder
        .unix_socket(path.to_path_buf())
        .no_gzip()
        .connect_timeout(UNIX_CONNECT_TIMEOUT))
}

#[cfg(not(unix))]
fn unix_socket_builder(
    _builder: reqwest::ClientBuilder,
    path: &std::path::Path,
) -> Result<reqwest::ClientBuilder, Error> {
    Err(Error::configuration(format!(
        "unix socket {:?} is not supported on this platform (connect timeout {:?})",
        path, UNIX_CONNECT_TIMEOUT
    )))
}

/// Reads the body to EOF, discarding it. Returns the number of bytes read.
async fn drain(response: reqwest::Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total = 0u64;
    while let Some(chunk) = stream.next().await {
        total += chunk?.len() as u64;
    }
    Ok(total)
}

// ============================================================================
// Error Mapping
// ============================================================================

/// Maps reqwest send errors to client errors.
fn map_reqwest_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::timeout(format!("Request timed out: {}", e)).with_source(e)
    } else if e.is_connect() {
        Error::connection(format!("Connection failed: {}", e)).with_source(e)
    } else if e.is_builder() {
        Error::invalid_request(format!("Invalid request: {}", e)).with_source(e)
    } else {
        Error::transport(format!("send post request: {}", e)).with_source(e)
    }
}

/// Maps a non-200 daemon response to a client error.
///
/// The daemon reports errors as `{"message": "..."}`; anything else is kept
/// verbatim.
fn map_status_error(path: &str, status: u16, body: &str) -> Error {
    let body = body.trim();
    let message = if body.is_empty() {
        format!("HTTP {}", status)
    } else if let Ok(error) = serde_json::from_str::<serde_json::Value>(body) {
        error
            .get("message")
            .or_else(|| error.get("error"))
            .and_then(|m| m.as_str())
            .unwrap_or(body)
            .to_string()
    } else {
        body.to_string()
    };

    Error::daemon(path, status, message)
}

// ============================================================================
// Tests
// ============================================================================
