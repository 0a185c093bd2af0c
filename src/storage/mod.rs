//! Storage Access
//!
//! The bucket listing capability the probe depends on, and its Google
//! Cloud Storage implementation.

pub mod auth;
pub mod client;

pub use auth::{AccessTokenSource, AmbientCredentials, AnonymousCredentials};
pub use client::GcsClient;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::Result;

/// A storage bucket as returned by the JSON API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    /// Bucket name
    pub name: String,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub storage_class: Option<String>,

    /// RFC 3339 creation timestamp
    #[serde(default)]
    pub time_created: Option<String>,
}

impl Bucket {
    /// Bucket carrying only a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: None,
            storage_class: None,
            time_created: None,
        }
    }
}

/// Anything that can enumerate the buckets visible to its identity
#[async_trait]
pub trait BucketLister: Send + Sync {
    /// Full listing, in provider order
    async fn list_buckets(&self) -> Result<Vec<Bucket>>;
}
