//! Credential Probe
//!
//! Attempts a bucket listing and turns whatever happens into a printable
//! outcome. Failures never escape: every error becomes
//! [`ProbeOutcome::Failure`].

use std::fmt;
use std::io::Write;

use crate::config::ProbeConfig;
use crate::error::Result;
use crate::storage::{BucketLister, GcsClient};

pub const SUCCESS_LINE: &str = "✅ GCP authentication successful.";
pub const LISTING_LINE: &str = "Found buckets:";
pub const FAILURE_PREFIX: &str = "❌ Authentication failed or permission error: ";

/// Result of one probe run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Listing succeeded; bucket names in provider order
    Success { buckets: Vec<String> },
    /// Any failure, reduced to its description
    Failure { message: String },
}

impl ProbeOutcome {
    /// Convert a fallible step into an outcome, logging the failure class
    pub fn from_result<T>(result: Result<T>) -> std::result::Result<T, ProbeOutcome> {
        result.map_err(|e| {
            tracing::warn!(kind = %e.kind(), "Probe failed: {}", e);
            ProbeOutcome::Failure { message: e.to_string() }
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProbeOutcome::Success { .. })
    }

    /// Write the console report
    pub fn render<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        write!(out, "{}", self)?;
        out.flush()
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Success { buckets } => {
                writeln!(f, "{}", SUCCESS_LINE)?;
                writeln!(f, "{}", LISTING_LINE)?;
                for name in buckets {
                    writeln!(f, " - {}", name)?;
                }
                Ok(())
            }
            ProbeOutcome::Failure { message } => {
                let message: Vec<&str> = message
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .collect();
                writeln!(f, "{}{}", FAILURE_PREFIX, message.join(" "))
            }
        }
    }
}

/// List every bucket visible to `lister` and report the outcome
pub async fn check_access(lister: &dyn BucketLister) -> ProbeOutcome {
    match ProbeOutcome::from_result(lister.list_buckets().await) {
        Ok(buckets) => {
            tracing::info!("Listing returned {} buckets", buckets.len());
            ProbeOutcome::Success {
                buckets: buckets.into_iter().map(|b| b.name).collect(),
            }
        }
        Err(outcome) => outcome,
    }
}

/// Build a client from `config` and probe it; construction failures become
/// [`ProbeOutcome::Failure`] too
pub async fn run(config: &ProbeConfig) -> ProbeOutcome {
    let client = match ProbeOutcome::from_result(GcsClient::from_config(config).await) {
        Ok(client) => client,
        Err(outcome) => return outcome,
    };

    tracing::info!("Listing buckets for project {}", client.project());
    check_access(&client).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::storage::Bucket;
    use async_trait::async_trait;

    struct FakeLister(Vec<&'static str>);

    #[async_trait]
    impl BucketLister for FakeLister {
        async fn list_buckets(&self) -> Result<Vec<Bucket>> {
            Ok(self.0.iter().map(|n| Bucket::named(*n)).collect())
        }
    }

    struct DeniedLister;

    #[async_trait]
    impl BucketLister for DeniedLister {
        async fn list_buckets(&self) -> Result<Vec<Bucket>> {
            Err(Error::Api {
                status: 403,
                method: "GET".into(),
                url: "https://storage.googleapis.com/storage/v1/b?project=demo".into(),
                message: "caller does not have storage.buckets.list access".into(),
            })
        }
    }

    fn rendered(outcome: &ProbeOutcome) -> String {
        let mut out = Vec::new();
        outcome.render(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_success_lists_in_order() {
        let outcome = check_access(&FakeLister(vec!["logs-archive", "user-uploads"])).await;
        assert!(outcome.is_success());
        assert_eq!(
            rendered(&outcome),
            "✅ GCP authentication successful.\nFound buckets:\n - logs-archive\n - user-uploads\n"
        );
    }

    #[tokio::test]
    async fn test_empty_listing_is_success() {
        let outcome = check_access(&FakeLister(vec![])).await;
        assert!(outcome.is_success());
        assert_eq!(
            rendered(&outcome),
            "✅ GCP authentication successful.\nFound buckets:\n"
        );
    }

    #[tokio::test]
    async fn test_failure_is_single_line() {
        let outcome = check_access(&DeniedLister).await;
        assert!(!outcome.is_success());

        let text = rendered(&outcome);
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("❌ Authentication failed or permission error: 403 GET "));
        assert!(text.contains("storage.buckets.list access"));
        assert!(!text.contains(" - "));
    }

    #[test]
    fn test_multiline_failure_renders_one_line() {
        let outcome = ProbeOutcome::Failure {
            message: "token refresh failed:\n  invalid_grant\r\n\nreauth required".into(),
        };
        assert_eq!(
            rendered(&outcome),
            "❌ Authentication failed or permission error: token refresh failed: invalid_grant reauth required\n"
        );
    }

    #[tokio::test]
    async fn test_run_invalid_config_is_failure() {
        let config = ProbeConfig {
            endpoint: String::new(),
            ..ProbeConfig::default()
        };

        let outcome = run(&config).await;
        assert_eq!(
            outcome,
            ProbeOutcome::Failure { message: "Configuration error: endpoint cannot be empty".into() }
        );
        assert_eq!(rendered(&outcome).lines().count(), 1);
    }

    #[tokio::test]
    async fn test_run_anonymous_without_project_is_failure() {
        let config = ProbeConfig {
            endpoint: "http://127.0.0.1:1".into(),
            anonymous: true,
            project: None,
            ..ProbeConfig::default()
        };

        let outcome = run(&config).await;
        assert!(!outcome.is_success());
        let text = rendered(&outcome);
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains("anonymous access requires a project"), "{}", text);
    }

    #[tokio::test]
    async fn test_run_unreachable_emulator_is_failure() {
        let config = ProbeConfig {
            endpoint: "http://127.0.0.1:1".into(),
            anonymous: true,
            project: Some("demo".into()),
            timeout_secs: 5,
            ..ProbeConfig::default()
        };

        let outcome = run(&config).await;
        assert!(!outcome.is_success());
        assert_eq!(rendered(&outcome).lines().count(), 1);
    }

    #[test]
    fn test_from_result_passes_success_through() {
        let value = ProbeOutcome::from_result(Ok::<_, Error>(7)).unwrap();
        assert_eq!(value, 7);

        let outcome = ProbeOutcome::from_result::<()>(Err(Error::Config("no project".into())))
            .unwrap_err();
        assert_eq!(
            outcome,
            ProbeOutcome::Failure { message: "Configuration error: no project".into() }
        );
    }
}
