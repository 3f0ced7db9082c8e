//! Prelude module for convenient imports.
//!
//! ```rust
//! use dockerdaemon::prelude::*;
//! ```

pub use crate::{
    client::{ClientBuilder, DockerClient},
    config::{DaemonConfig, Scheme, TransportConfig},
    error::{Error, ErrorKind, Result},
    testing::{ImagePuller, MockImagePuller},
    transport::DaemonAddress,
};
