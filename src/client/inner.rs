//! Internal client implementation.

use tokio_util::sync::CancellationToken;

use crate::Error;
use crate::transport::{PostRequest, RestTransport};

pub(crate) struct ClientInner {
    /// Resolved transport; also owns scheme and API version.
    pub transport: RestTransport,

    /// Registry hostname prefixed to repository names.
    pub registry: String,
}

impl ClientInner {
    /// Qualifies a repository with the configured registry.
    pub(crate) fn qualified_image(&self, repository: &str) -> String {
        format!("{}/{}", self.registry, repository)
    }

    /// Executes a versioned POST against the daemon.
    pub(crate) async fn post(
        &self,
        cancel: &CancellationToken,
        request: PostRequest,
    ) -> Result<(), Error> {
        self.transport.execute(cancel, request).await
    }
}
