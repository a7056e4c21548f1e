//! The two tools exposed to the agent runtime.
//!
//! | Tool | Arguments | Result | On failure |
//! |------|-----------|--------|------------|
//! | `get_news` | `query`, `past_days?`, `domains?`, `max_results?` | array of news items | [`ToolError::Search`] |
//! | `get_full_articles` | `urls` | list or mapping of article texts | never fails |
//!
//! The runtime learns the tools from [`declarations`] and calls them through
//! [`NewsTools::invoke`] with JSON arguments.

use crate::config::{Config, OutputShape};
use crate::error::ToolError;
use crate::fetcher::Fetcher;
use crate::retrieval::Retriever;
use crate::search::{NewsSearch, SearchProvider};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, instrument};

pub const GET_NEWS: &str = "get_news";
pub const GET_FULL_ARTICLES: &str = "get_full_articles";

/// Name, description and JSON-schema parameters of one tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GetNewsArgs {
    pub query: String,
    #[serde(default)]
    pub past_days: Option<u32>,
    #[serde(default)]
    pub domains: Option<String>,
    #[serde(default)]
    pub max_results: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GetFullArticlesArgs {
    pub urls: Vec<String>,
}

/// Tool declarations with defaults taken from the active configuration.
pub fn declarations(config: &Config) -> Vec<ToolDeclaration> {
    let articles_result = match config.retrieval.output_shape {
        OutputShape::List => "an ordered list of {url, text} objects",
        OutputShape::Mapping => "an object mapping each url to its text",
    };
    vec![
        ToolDeclaration {
            name: GET_NEWS.to_string(),
            description: "Search recent news articles about a topic. Returns a list of \
                          {title, url, description, source_name}; an empty list if nothing was found."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "Search news about this topic"},
                    "past_days": {
                        "type": "integer",
                        "minimum": 0,
                        "default": config.search.default_past_days,
                        "description": "How many days back to search"
                    },
                    "domains": {
                        "type": "string",
                        "description": "Comma-separated domains to restrict the search to"
                    },
                    "max_results": {
                        "type": "integer",
                        "minimum": 1,
                        "default": config.search.max_results,
                        "description": "Maximum number of articles to return"
                    }
                },
                "required": ["query"]
            }),
        },
        ToolDeclaration {
            name: GET_FULL_ARTICLES.to_string(),
            description: format!(
                "Fetch and extract the main text of news articles for later analysis. Returns {articles_result}; \
                 text is empty when an article could not be retrieved and ends with \"...\" when cut at {} characters.",
                config.retrieval.max_chars
            ),
            parameters: json!({
                "type": "object",
                "properties": {
                    "urls": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "URLs of the articles to fetch"
                    }
                },
                "required": ["urls"]
            }),
        },
    ]
}

/// Both tools wired to their backends.
pub struct NewsTools<P, F> {
    search: NewsSearch<P>,
    retriever: Retriever<F>,
    output_shape: OutputShape,
}

impl<P: SearchProvider, F: Fetcher> NewsTools<P, F> {
    pub fn new(search: NewsSearch<P>, retriever: Retriever<F>, output_shape: OutputShape) -> Self {
        Self {
            search,
            retriever,
            output_shape,
        }
    }

    pub fn search(&self) -> &NewsSearch<P> {
        &self.search
    }

    pub fn retriever(&self) -> &Retriever<F> {
        &self.retriever
    }

    /// Run the tool `name` with JSON `args` and return its JSON result.
    #[instrument(level = "info", skip(self, args))]
    pub async fn invoke(&self, name: &str, args: Value) -> Result<Value, ToolError> {
        match name {
            GET_NEWS => {
                let args: GetNewsArgs = decode_args(name, args)?;
                let items = self
                    .search
                    .search(
                        &args.query,
                        args.past_days,
                        args.domains.as_deref(),
                        args.max_results,
                    )
                    .await?;
                info!(returned = items.len(), "get_news finished");
                Ok(serde_json::to_value(items)?)
            }
            GET_FULL_ARTICLES => {
                let args: GetFullArticlesArgs = decode_args(name, args)?;
                let output = self
                    .retriever
                    .retrieve_output(&args.urls, self.output_shape)
                    .await;
                Ok(serde_json::to_value(output)?)
            }
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }
}

fn decode_args<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T, ToolError> {
    // Runtimes send `null` for a call without arguments.
    let args = if args.is_null() { json!({}) } else { args };
    serde_json::from_value(args).map_err(|e| ToolError::InvalidArguments {
        tool: tool.to_string(),
        reason: e.to_string(),
    })
}
