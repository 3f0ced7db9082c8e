//! Testing utilities for code that triggers image pulls.
//!
//! - [`ImagePuller`]: Object-safe trait implemented by [`DockerClient`](crate::DockerClient)
//! - [`MockImagePuller`]: A mock with programmable failures and verification
//!
//! ## Quick Start
//!
//! ```rust
//! use dockerdaemon::testing::{ImagePuller, MockImagePuller};
//! use tokio_util::sync::CancellationToken;
//!
//! let mock = MockImagePuller::new().expect_pull("library/redis", "7.2");
//!
//! async fn warm_cache(puller: &dyn ImagePuller) {
//!     let cancel = CancellationToken::new();
//!     puller.image_pull(&cancel, "library/redis", "7.2").await.unwrap();
//! }
//! ```

mod image_puller;
mod mock_puller;

pub use image_puller::ImagePuller;
pub use mock_puller::{Call, MockImagePuller};
