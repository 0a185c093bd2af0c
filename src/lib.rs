//! gcsprobe - Google Cloud Storage Credential Probe
//!
//! Confirms that the ambient Google Cloud credentials work by listing the
//! storage buckets they can see, and reports the outcome on the console.
//!
//! # Architecture
//!
//! The probe depends only on the [`storage::BucketLister`] capability.
//! [`storage::GcsClient`] implements it over the GCS JSON API, with access
//! tokens from the environment's default credential chain; tests swap in
//! fakes.

pub mod config;
pub mod error;
pub mod probe;
pub mod storage;

pub use config::ProbeConfig;
pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::ProbeConfig;
    pub use crate::error::{Error, ErrorKind, Result};
    pub use crate::probe::{check_access, ProbeOutcome};
    pub use crate::storage::{Bucket, BucketLister, GcsClient};
}
