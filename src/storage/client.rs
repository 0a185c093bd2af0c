//! Google Cloud Storage Client
//!
//! Minimal JSON API client: lists buckets for a project, following page
//! tokens until the listing is exhausted.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use super::auth::{credentials_for, AccessTokenSource};
use super::{Bucket, BucketLister};
use crate::config::ProbeConfig;
use crate::error::{Error, Result};

/// One page of `storage.buckets.list`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BucketPage {
    /// Absent when the project has no buckets
    #[serde(default)]
    items: Vec<Bucket>,

    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// GCS JSON API client
pub struct GcsClient {
    http: reqwest::Client,
    credentials: Arc<dyn AccessTokenSource>,
    buckets_url: String,
    project: String,
}

impl GcsClient {
    /// Create a client bound to the ambient credentials described by `config`
    pub async fn from_config(config: &ProbeConfig) -> Result<Self> {
        config.validate()?;
        let credentials = credentials_for(config).await?;
        Self::with_credentials(config, credentials).await
    }

    /// Create a client with an explicit credential source
    pub async fn with_credentials(
        config: &ProbeConfig,
        credentials: Arc<dyn AccessTokenSource>,
    ) -> Result<Self> {
        let project = match &config.project {
            Some(project) => project.clone(),
            None => credentials.project_id().await?,
        };

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("gcsprobe/", env!("CARGO_PKG_VERSION")))
            .build()?;

        tracing::debug!("Storage client for project {} at {}", project, config.endpoint);

        Ok(Self {
            http,
            credentials,
            buckets_url: config.buckets_url(),
            project,
        })
    }

    /// Project whose buckets are listed
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Fetch a single page of the listing
    async fn fetch_page(&self, page_token: Option<&str>) -> Result<BucketPage> {
        let mut request = self
            .http
            .get(&self.buckets_url)
            .query(&[("project", self.project.as_str())]);

        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        if let Some(token) = self.credentials.access_token().await? {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let url = response.url().to_string();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                method: "GET".to_string(),
                url,
                message: error_message(&body, status),
            });
        }

        let page: BucketPage = response.json().await?;
        Ok(page)
    }
}

#[async_trait]
impl BucketLister for GcsClient {
    async fn list_buckets(&self) -> Result<Vec<Bucket>> {
        let mut buckets = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self.fetch_page(page_token.as_deref()).await?;
            pages += 1;
            buckets.extend(page.items);

            match page.next_page_token {
                Some(token) if page_token.as_deref() == Some(token.as_str()) => {
                    tracing::warn!("Server repeated page token {}, stopping listing", token);
                    break;
                }
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        for bucket in &buckets {
            tracing::debug!(
                location = ?bucket.location,
                storage_class = ?bucket.storage_class,
                time_created = ?bucket.time_created,
                "Bucket {}",
                bucket.name
            );
        }
        tracing::debug!("Listed {} buckets in {} page(s)", buckets.len(), pages);
        Ok(buckets)
    }
}

/// Pull the human readable message out of an error response
fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        if !envelope.error.message.is_empty() {
            return envelope.error.message;
        }
    }

    let body = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if body.is_empty() {
        status.canonical_reason().unwrap_or("Unknown error").to_string()
    } else {
        body
    }
}
