//! Error types for every stage of the news tools.
//!
//! Only [`SearchError`], [`ToolError`], [`ConfigError`] and [`ResponseError`]
//! ever reach a caller. [`FetchError`] and [`ExtractError`] are produced inside
//! the retrieval pipeline and absorbed there into empty-text results.

use thiserror::Error;

/// Why a single article download failed.
///
/// The fetcher renders this into the diagnostic message carried by
/// [`crate::fetcher::DownloadOutcome::Failure`].
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("could not build request: {0}")]
    Request(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected HTTP status {status}")]
    Status { status: u16 },

    #[error("failed to read response body: {0}")]
    Body(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout(e.to_string())
        } else if e.is_builder() {
            FetchError::Request(e.to_string())
        } else if e.is_body() || e.is_decode() {
            FetchError::Body(e.to_string())
        } else if let Some(status) = e.status() {
            FetchError::Status {
                status: status.as_u16(),
            }
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

/// Why downloaded content could not be turned into an article.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExtractError {
    #[error("downloaded document is empty")]
    EmptyDocument,

    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("document has no body to extract from")]
    NoDocumentRoot,
}

/// Failures at the news-search provider boundary. These are never absorbed.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("no news API key configured (set NEWS_API_KEY)")]
    MissingApiKey,

    #[error("lookback of {past_days} days reaches past the representable date range")]
    LookbackOutOfRange { past_days: u32 },

    #[error("news provider rejected credentials ({code}): {message}")]
    Auth { code: String, message: String },

    #[error("news provider quota exhausted ({code}): {message}")]
    Quota { code: String, message: String },

    #[error("news provider error ({code}): {message}")]
    Provider { code: String, message: String },

    #[error("news provider unreachable: {0}")]
    Network(#[from] reqwest::Error),

    #[error("could not decode news provider response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid news provider URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Failures of a tool invocation coming from the agent runtime.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("could not encode tool result: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("could not load env file: {0}")]
    EnvFile(#[from] dotenvy::Error),

    #[error("could not build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// A final agent answer that violates the structured response contract.
#[derive(Error, Debug)]
pub enum ResponseError {
    #[error("response is not valid contract JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("news_list[{index}] has an empty {field}")]
    EmptyField { index: usize, field: &'static str },
}
