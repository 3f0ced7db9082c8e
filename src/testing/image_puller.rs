//! ImagePuller trait for dependency injection.

use std::future::Future;
use std::pin::Pin;

use tokio_util::sync::CancellationToken;

use crate::Error;

/// Object-safe trait for triggering image pulls.
///
/// This trait lets callers abstract over the real [`DockerClient`](crate::DockerClient)
/// and [`MockImagePuller`](super::MockImagePuller) in their own tests.
///
/// ## Example
///
/// ```rust
/// use dockerdaemon::testing::ImagePuller;
/// use dockerdaemon::Error;
/// use tokio_util::sync::CancellationToken;
///
/// async fn preload(
///     puller: &dyn ImagePuller,
///     cancel: &CancellationToken,
///     images: &[(&str, &str)],
/// ) -> Result<(), Error> {
///     for (repository, tag) in images {
///         puller.image_pull(cancel, repository, tag).await?;
///     }
///     Ok(())
/// }
/// ```
pub trait ImagePuller: Send + Sync {
    /// Pulls `repository:tag` from the configured registry.
    ///
    /// Resolves once the pull has completed or failed.
    fn image_pull<'a>(
        &'a self,
        cancel: &'a CancellationToken,
        repository: &'a str,
        tag: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), Error>> + Send + 'a>>;
}
