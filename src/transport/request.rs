//! Per-call request descriptor.

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::Error;

/// A single POST to the daemon.
///
/// Built fresh for every call and consumed by
/// [`RestTransport::execute`](super::RestTransport::execute).
#[derive(Debug, Clone, Default)]
pub struct PostRequest {
    /// Operation path, e.g. `/images/create`, without base path or version.
    pub path: String,

    /// Query parameters in insertion order.
    pub query: Vec<(String, String)>,

    /// Extra request headers.
    pub headers: HeaderMap,

    /// Request body; empty when the operation has no payload.
    pub body: Bytes,

    /// Read the response body to EOF before reporting success.
    ///
    /// The daemon answers some operations with 200 as soon as they start and
    /// streams progress until they finish. Only a fully drained body means
    /// the operation is done.
    pub drain_on_success: bool,
}

impl PostRequest {
    /// Creates a request for the given operation path.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Adds a header.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidRequest`](crate::ErrorKind::InvalidRequest)
    /// if the name or value is not a valid HTTP header.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, Error> {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            Error::invalid_request(format!("invalid header name `{}`: {}", name, e))
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| {
            Error::invalid_request(format!("invalid value for header `{}`: {}", name, e))
        })?;
        self.headers.append(name, value);
        Ok(self)
    }

    /// Sets the request body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets whether the response body must be drained before success.
    #[must_use]
    pub fn drain_on_success(mut self, drain: bool) -> Self {
        self.drain_on_success = drain;
        self
    }
}

/// Builds the full request path: base path, version segment, operation path.
///
/// A leading `v` on the version is accepted and normalised; an empty version
/// produces no segment.
pub fn api_path(base_path: &str, version: &str, path: &str) -> String {
    if version.is_empty() {
        return format!("{}{}", base_path, path);
    }
    let version = version.strip_prefix('v').unwrap_or(version);
    format!("{}/v{}{}", base_path, version, path)
}

/// Form-encodes query parameters, or `None` when there are none.
pub fn encode_query(query: &[(String, String)]) -> Option<String> {
    if query.is_empty() {
        return None;
    }
    let encoded = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .finish();
    Some(encoded)
}
