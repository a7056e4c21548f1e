//! News search against an external provider.
//!
//! [`NewsSearch`] asks a [`SearchProvider`] for articles about a topic within a
//! lookback window, drops records missing a title or URL, and caps the result
//! count. Provider order is kept; nothing is re-ranked.
//!
//! Unlike article retrieval, provider failures are returned to the caller as
//! [`SearchError`] rather than absorbed.

use crate::config::SearchConfig;
use crate::error::{ConfigError, SearchError};
use crate::models::{NewsItem, RawArticle};
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};
use url::Url;

/// Largest page the NewsAPI `everything` endpoint serves.
pub const PROVIDER_MAX_PAGE_SIZE: usize = 100;

/// A provider-level search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub from: DateTime<Utc>,
    /// Comma-separated domain list, e.g. `"bbc.co.uk,techcrunch.com"`.
    pub domains: Option<String>,
    pub page_size: usize,
}

/// Something that can run an "everything" search, relevance ordered.
pub trait SearchProvider {
    async fn everything(&self, query: &SearchQuery) -> Result<Vec<RawArticle>, SearchError>;
}

pub struct NewsSearch<P> {
    provider: P,
    default_max_results: usize,
    default_past_days: u32,
}

impl<P: SearchProvider> NewsSearch<P> {
    pub fn new(provider: P, default_max_results: usize, default_past_days: u32) -> Self {
        Self {
            provider,
            default_max_results,
            default_past_days,
        }
    }

    pub fn from_config(provider: P, config: &SearchConfig) -> Self {
        Self::new(provider, config.max_results, config.default_past_days)
    }

    /// Search news about `query` published within the last `past_days` days.
    ///
    /// `None` falls back to the configured defaults. Returns at most
    /// `max_results` items, each with a non-empty title and URL.
    #[instrument(level = "info", skip_all, fields(%query, ?past_days, ?domains))]
    pub async fn search(
        &self,
        query: &str,
        past_days: Option<u32>,
        domains: Option<&str>,
        max_results: Option<usize>,
    ) -> Result<Vec<NewsItem>, SearchError> {
        let past_days = past_days.unwrap_or(self.default_past_days);
        let max_results = max_results.unwrap_or(self.default_max_results);
        let from = Duration::try_days(i64::from(past_days))
            .and_then(|lookback| Utc::now().checked_sub_signed(lookback))
            .ok_or_else(|| {
                error!(past_days, "Lookback window is out of range");
                SearchError::LookbackOutOfRange { past_days }
            })?;
        let request = SearchQuery {
            query: query.to_string(),
            from,
            domains: domains
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            page_size: max_results.clamp(1, PROVIDER_MAX_PAGE_SIZE),
        };

        let raw = self.provider.everything(&request).await.map_err(|e| {
            error!(error = %e, "News search failed");
            e
        })?;
        let candidates = raw.len();
        let items: Vec<NewsItem> = raw
            .into_iter()
            .filter_map(NewsItem::from_raw)
            .take(max_results)
            .collect();

        info!(candidates, returned = items.len(), "News search complete");
        Ok(items)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EverythingResponse {
    status: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<RawArticle>,
}

/// [`SearchProvider`] for the NewsAPI `v2/everything` endpoint.
#[derive(Debug, Clone)]
pub struct NewsApiProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl NewsApiProvider {
    pub fn new(config: &SearchConfig) -> Result<Self, ConfigError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(&self, query: &SearchQuery) -> Result<Url, SearchError> {
        let from = query.from.format("%Y-%m-%dT%H:%M:%S").to_string();
        let page_size = query.page_size.to_string();
        let mut params = vec![
            ("q", query.query.as_str()),
            ("from", from.as_str()),
            ("sortBy", "relevancy"),
            ("pageSize", page_size.as_str()),
        ];
        if let Some(domains) = &query.domains {
            params.push(("domains", domains.as_str()));
        }
        Ok(Url::parse_with_params(
            &format!("{}/v2/everything", self.base_url),
            &params,
        )?)
    }
}

impl SearchProvider for NewsApiProvider {
    #[instrument(level = "info", skip_all, fields(query = %query.query, page_size = query.page_size))]
    async fn everything(&self, query: &SearchQuery) -> Result<Vec<RawArticle>, SearchError> {
        let api_key = self.api_key.as_deref().ok_or(SearchError::MissingApiKey)?;
        let url = self.endpoint(query)?;
        debug!(%url, "Querying news provider");

        let resp = self
            .client
            .get(url)
            .header("X-Api-Key", api_key)
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;

        let parsed: EverythingResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(e) if !status.is_success() => {
                return Err(SearchError::Provider {
                    code: status.as_u16().to_string(),
                    message: e.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        if parsed.status != "ok" || !status.is_success() {
            let code = parsed.code.unwrap_or_else(|| status.as_u16().to_string());
            let message = parsed.message.unwrap_or_default();
            return Err(classify_provider_error(code, message));
        }

        debug!(count = parsed.articles.len(), "News provider returned articles");
        Ok(parsed.articles)
    }
}

fn classify_provider_error(code: String, message: String) -> SearchError {
    match code.as_str() {
        "apiKeyMissing" | "apiKeyInvalid" | "apiKeyDisabled" | "apiKeyExhausted" | "401" => {
            SearchError::Auth { code, message }
        }
        "rateLimited" | "maximumResultsReached" | "429" => SearchError::Quota { code, message },
        _ => SearchError::Provider { code, message },
    }
}
