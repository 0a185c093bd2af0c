//! Credential Resolution
//!
//! Access tokens come from the environment's default credential chain
//! (`gcp_auth`), or are omitted entirely when talking to an emulator.

use std::sync::Arc;

use async_trait::async_trait;
use gcp_auth::TokenProvider;

use crate::config::ProbeConfig;
use crate::error::{Error, Result};

/// Source of request credentials
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    /// Bearer token for the next request, `None` for anonymous access
    async fn access_token(&self) -> Result<Option<String>>;

    /// Project the credentials belong to
    async fn project_id(&self) -> Result<String>;
}

/// Credentials discovered from the ambient environment
pub struct AmbientCredentials {
    provider: Arc<dyn TokenProvider>,
    scopes: Vec<String>,
}

impl AmbientCredentials {
    /// Discover credentials using the default resolution order
    pub async fn discover(scopes: Vec<String>) -> Result<Self> {
        let provider = gcp_auth::provider().await?;
        tracing::debug!("Resolved default credential provider");
        Ok(Self::with_provider(provider, scopes))
    }

    /// Wrap an already constructed provider
    pub fn with_provider(provider: Arc<dyn TokenProvider>, scopes: Vec<String>) -> Self {
        Self { provider, scopes }
    }
}

#[async_trait]
impl AccessTokenSource for AmbientCredentials {
    async fn access_token(&self) -> Result<Option<String>> {
        let scopes: Vec<&str> = self.scopes.iter().map(String::as_str).collect();
        let token = self.provider.token(&scopes).await?;
        Ok(Some(token.as_str().to_string()))
    }

    async fn project_id(&self) -> Result<String> {
        let project = self.provider.project_id().await?;
        Ok(project.to_string())
    }
}

/// No credentials at all (storage emulator)
pub struct AnonymousCredentials {
    project: String,
}

impl AnonymousCredentials {
    pub fn new(project: impl Into<String>) -> Self {
        Self { project: project.into() }
    }
}

#[async_trait]
impl AccessTokenSource for AnonymousCredentials {
    async fn access_token(&self) -> Result<Option<String>> {
        Ok(None)
    }

    async fn project_id(&self) -> Result<String> {
        Ok(self.project.clone())
    }
}

/// Build the credential source described by `config`
pub async fn credentials_for(config: &ProbeConfig) -> Result<Arc<dyn AccessTokenSource>> {
    if config.anonymous {
        let project = config
            .project
            .clone()
            .ok_or_else(|| Error::Config("anonymous access requires a project".into()))?;
        tracing::info!("Using anonymous credentials against {}", config.endpoint);
        return Ok(Arc::new(AnonymousCredentials::new(project)));
    }

    let credentials = AmbientCredentials::discover(config.scopes.clone()).await?;
    Ok(Arc::new(credentials))
}
