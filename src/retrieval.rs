//! Full-article retrieval: fetch, extract, truncate, one result per URL.
//!
//! [`Retriever::retrieve`] never fails. Whatever happens to an individual URL
//! (download error, unparseable body, nothing extractable) shows up as an
//! [`ArticleResult`] with empty text, so the agent always receives exactly one
//! record per requested URL, in request order.
//!
//! # Logging
//!
//! | Condition | Level |
//! |-----------|-------|
//! | Download failed | `error` |
//! | Parse failed | `error` |
//! | Parsed but nothing extracted | `warn` |
//! | Extracted | `info` |

use crate::config::{OutputShape, RetrievalConfig};
use crate::extract::parse_article;
use crate::fetcher::{DownloadOutcome, Fetcher};
use crate::models::{ArticleResult, RetrievalOutput};
use crate::truncate::truncate;
use futures::stream::{self, StreamExt};
use tracing::{debug, error, info, instrument, warn};

pub struct Retriever<F> {
    fetcher: F,
    max_chars: usize,
    concurrency: usize,
}

impl<F: Fetcher> Retriever<F> {
    /// `concurrency` of 1 processes URLs strictly one after another.
    pub fn new(fetcher: F, max_chars: usize, concurrency: usize) -> Self {
        Self {
            fetcher,
            max_chars,
            concurrency: concurrency.max(1),
        }
    }

    pub fn from_config(fetcher: F, config: &RetrievalConfig) -> Self {
        Self::new(fetcher, config.max_chars, config.concurrency)
    }

    /// Retrieve every URL. Output order always matches `urls`.
    #[instrument(level = "info", skip_all, fields(count = urls.len(), concurrency = self.concurrency))]
    pub async fn retrieve(&self, urls: &[String]) -> Vec<ArticleResult> {
        let results: Vec<ArticleResult> = stream::iter(urls)
            .map(|url| self.retrieve_one(url))
            .buffered(self.concurrency)
            .collect()
            .await;

        let retrieved = results.iter().filter(|r| !r.text.is_empty()).count();
        info!(
            requested = urls.len(),
            retrieved,
            empty = urls.len() - retrieved,
            "Article retrieval complete"
        );
        results
    }

    /// [`Retriever::retrieve`] shaped into the profile's container.
    pub async fn retrieve_output(&self, urls: &[String], shape: OutputShape) -> RetrievalOutput {
        let output = RetrievalOutput::shaped(self.retrieve(urls).await, shape);
        debug!(?shape, entries = output.results().len(), "Shaped retrieval output");
        output
    }

    async fn retrieve_one(&self, url: &str) -> ArticleResult {
        let (content, content_type) = match self.fetcher.download(url).await {
            DownloadOutcome::Success {
                content,
                content_type,
            } => (content, content_type),
            DownloadOutcome::Failure { message } => {
                error!(%url, error = %message, "Failed to download article");
                return ArticleResult::empty(url);
            }
        };

        let parsed = match parse_article(&content, content_type.as_deref()) {
            Ok(parsed) => parsed,
            Err(e) => {
                error!(%url, error = %e, "Failed to parse article");
                return ArticleResult::empty(url);
            }
        };

        if parsed.text.is_empty() {
            warn!(%url, "Could not extract main text content");
            return ArticleResult::empty(url);
        }

        let length = parsed.text.chars().count();
        info!(
            %url,
            length,
            title = parsed.title.as_deref().unwrap_or("-"),
            truncated = length > self.max_chars,
            "Successfully extracted article content"
        );
        ArticleResult {
            url: url.to_string(),
            text: truncate(&parsed.text, self.max_chars),
        }
    }
}
