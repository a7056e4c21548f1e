//! Downloading raw article pages.
//!
//! A [`Fetcher`] turns one URL into a [`DownloadOutcome`]. It never returns an
//! error: network failures, timeouts, and non-2xx statuses all become
//! [`DownloadOutcome::Failure`] with a diagnostic message, so the retrieval
//! loop can treat every failure the same way.

use crate::config::RetrievalConfig;
use crate::error::{ConfigError, FetchError};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Result of a single download attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Success {
        content: String,
        /// The `Content-Type` header, when the server sent one.
        content_type: Option<String>,
    },
    Failure {
        message: String,
    },
}

/// Something that can download a page.
pub trait Fetcher {
    async fn download(&self, url: &str) -> DownloadOutcome;
}

/// [`Fetcher`] backed by a pooled `reqwest` client.
///
/// Every request carries an explicit timeout from [`RetrievalConfig::timeout`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &RetrievalConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }

    async fn try_download(&self, url: &str) -> Result<(String, Option<String>), FetchError> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let content = resp.text().await?;
        Ok((content, content_type))
    }
}

impl Fetcher for HttpFetcher {
    #[instrument(level = "info", skip_all, fields(%url))]
    async fn download(&self, url: &str) -> DownloadOutcome {
        info!("Attempting to fetch article");
        let t0 = Instant::now();
        match self.try_download(url).await {
            Ok((content, content_type)) => {
                debug!(
                    bytes = content.len(),
                    content_type = content_type.as_deref().unwrap_or("-"),
                    elapsed_ms = t0.elapsed().as_millis() as u64,
                    "Downloaded article"
                );
                DownloadOutcome::Success {
                    content,
                    content_type,
                }
            }
            Err(e) => DownloadOutcome::Failure {
                message: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Profile};
    use crate::test_support::{refused_url, serve_once};

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(&Config::for_profile(Profile::Structured).retrieval).unwrap()
    }

    #[tokio::test]
    async fn test_successful_download_carries_body_and_content_type() {
        let (base, _req) = serve_once("200 OK", "text/html; charset=utf-8", "<p>hi</p>").await;
        let outcome = fetcher().download(&format!("{base}/a")).await;
        assert_eq!(
            outcome,
            DownloadOutcome::Success {
                content: "<p>hi</p>".into(),
                content_type: Some("text/html; charset=utf-8".into()),
            }
        );
    }

    #[tokio::test]
    async fn test_non_success_status_is_a_failure() {
        let (base, _req) = serve_once("404 Not Found", "text/html", "gone").await;
        match fetcher().download(&format!("{base}/missing")).await {
            DownloadOutcome::Failure { message } => assert!(message.contains("404")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_a_failure() {
        let url = refused_url().await;
        let outcome = fetcher().download(&url).await;
        assert!(matches!(outcome, DownloadOutcome::Failure { .. }));
    }

    #[tokio::test]
    async fn test_unparseable_url_is_a_failure() {
        let outcome = fetcher().download("not a url").await;
        assert!(matches!(outcome, DownloadOutcome::Failure { .. }));
    }
}
