//! gcsprobe Configuration
//!
//! Everything the probe needs is read from the ambient environment once at
//! startup. There is no configuration file.

use std::time::Duration;

/// Environment variable naming a storage emulator host
pub const EMULATOR_HOST_VAR: &str = "STORAGE_EMULATOR_HOST";

/// Environment variables naming an explicit project, in precedence order
pub const PROJECT_VARS: [&str; 2] = ["GOOGLE_CLOUD_PROJECT", "GCLOUD_PROJECT"];

/// Project used against an emulator when none is given
pub const EMULATOR_PROJECT: &str = "<none>";

/// Probe configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Base URL of the JSON API (no trailing slash)
    pub endpoint: String,

    /// Explicit project id; resolved from credentials when absent
    pub project: Option<String>,

    /// Send requests without credentials (emulator mode)
    pub anonymous: bool,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// OAuth scopes requested for the access token
    pub scopes: Vec<String>,
}

fn default_endpoint() -> String {
    "https://storage.googleapis.com".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_scopes() -> Vec<String> {
    vec!["https://www.googleapis.com/auth/cloud-platform".to_string()]
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            project: None,
            anonymous: false,
            timeout_secs: default_timeout_secs(),
            scopes: default_scopes(),
        }
    }
}

impl ProbeConfig {
    /// Resolve configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::default();
        config.project = PROJECT_VARS.iter().find_map(|key| non_empty(*key));

        if let Some(host) = non_empty(EMULATOR_HOST_VAR) {
            config.endpoint = emulator_endpoint(&host);
            config.anonymous = true;
            if config.project.is_none() {
                config.project = Some(EMULATOR_PROJECT.to_string());
            }
        }

        config
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// URL of the bucket collection
    pub fn buckets_url(&self) -> String {
        format!("{}/storage/v1/b", self.endpoint)
    }

    /// Validate the configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.endpoint.is_empty() {
            return Err(crate::Error::Config("endpoint cannot be empty".into()));
        }

        if let Some(project) = &self.project {
            if project.trim().is_empty() {
                return Err(crate::Error::Config("project cannot be empty".into()));
            }
        }

        if !self.anonymous && self.scopes.is_empty() {
            return Err(crate::Error::Config("at least one OAuth scope is required".into()));
        }

        Ok(())
    }
}

/// Normalize an emulator host into a base URL
fn emulator_endpoint(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{}", host)
    }
}
