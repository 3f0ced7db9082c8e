//! MockImagePuller for testing with expectations.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::testing::ImagePuller;
use crate::{Error, ErrorKind};

/// A mock image puller for testing.
///
/// `MockImagePuller` records every pull, lets you program failures for
/// specific images, and verifies that expected pulls happened.
///
/// ## Example
///
/// ```rust
/// use dockerdaemon::ErrorKind;
/// use dockerdaemon::testing::MockImagePuller;
///
/// let mock = MockImagePuller::new()
///     .expect_pull("library/redis", "7.2")
///     .fail_pull("library/missing", "latest", ErrorKind::Daemon, "no such image");
///
/// // Use the mock in your tests...
/// // mock.verify() at the end to ensure all expected pulls were made
/// ```
#[derive(Clone, Default)]
pub struct MockImagePuller {
    expectations: Arc<Mutex<Vec<Expectation>>>,
    calls: Arc<Mutex<Vec<Call>>>,
}

#[derive(Debug, Clone)]
struct Expectation {
    repository: String,
    tag: String,
    failure: Option<(ErrorKind, String)>,
}

/// A recorded pull.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    /// Repository passed to the pull.
    pub repository: String,
    /// Tag passed to the pull.
    pub tag: String,
}

impl MockImagePuller {
    /// Creates a mock whose pulls succeed unless programmed otherwise.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects a successful pull of `repository:tag`.
    #[must_use]
    pub fn expect_pull(self, repository: impl Into<String>, tag: impl Into<String>) -> Self {
        self.expectations.lock().push(Expectation {
            repository: repository.into(),
            tag: tag.into(),
            failure: None,
        });
        self
    }

    /// Expects a pull of `repository:tag` and fails it with the given error.
    #[must_use]
    pub fn fail_pull(
        self,
        repository: impl Into<String>,
        tag: impl Into<String>,
        kind: ErrorKind,
        message: impl Into<String>,
    ) -> Self {
        self.expectations.lock().push(Expectation {
            repository: repository.into(),
            tag: tag.into(),
            failure: Some((kind, message.into())),
        });
        self
    }

    /// Verifies that all expected pulls were made.
    ///
    /// # Panics
    ///
    /// Panics if any expected pull was never made.
    pub fn verify(&self) {
        let expectations = self.expectations.lock();
        let calls = self.calls.lock();

        for expectation in expectations.iter() {
            let made = calls
                .iter()
                .any(|c| c.repository == expectation.repository && c.tag == expectation.tag);
            assert!(
                made,
                "Expected image_pull({}, {}) was never called",
                expectation.repository, expectation.tag
            );
        }
    }

    /// Returns the number of pulls made.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Returns the recorded pulls in call order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// Clears all expectations and recorded calls.
    pub fn reset(&self) {
        self.expectations.lock().clear();
        self.calls.lock().clear();
    }

    fn find_result(&self, repository: &str, tag: &str) -> Result<(), Error> {
        let expectations = self.expectations.lock();
        let failure = expectations
            .iter()
            .find(|e| e.repository == repository && e.tag == tag)
            .and_then(|e| e.failure.clone());

        match failure {
            Some((kind, message)) => Err(Error::new(kind, message)),
            None => Ok(()),
        }
    }

    fn record_call(&self, repository: &str, tag: &str) {
        self.calls.lock().push(Call {
            repository: repository.to_string(),
            tag: tag.to_string(),
        });
    }
}

impl std::fmt::Debug for MockImagePuller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockImagePuller")
            .field("expectations", &self.expectations.lock().len())
            .field("calls", &self.calls.lock().len())
            .finish()
    }
}

impl ImagePuller for MockImagePuller {
    fn image_pull<'a>(
        &'a self,
        cancel: &'a CancellationToken,
        repository: &'a str,
        tag: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), Error>> + Send + 'a>> {
        self.record_call(repository, tag);
        let result = if cancel.is_cancelled() {
            Err(Error::cancelled())
        } else {
            self.find_result(repository, tag)
        };
        Box::pin(async move { result })
    }
}
