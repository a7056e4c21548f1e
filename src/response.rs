//! The agent's final-answer contract and its self-description.
//!
//! In [`ResponseMode::Structured`] the agent must answer with a JSON object of
//! the shape below, or `{}` when the request is too ambiguous to act on:
//!
//! ```json
//! {
//!   "news_list": [{"title": "..", "url": "..", "source_name": "..", "description": ".."}],
//!   "summary": {"summary_text": "..", "source_urls": [".."]}
//! }
//! ```
//!
//! No other keys are allowed. In [`ResponseMode::Conversational`] the answer
//! is free-form text and nothing is validated.

use crate::config::Config;
use crate::error::{ConfigError, ResponseError};
use crate::tools::{ToolDeclaration, declarations};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    Structured,
    Conversational,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub news_list: Option<Vec<NewsListEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NewsListEntry {
    pub title: String,
    pub url: String,
    pub source_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Summary {
    pub summary_text: String,
    pub source_urls: Vec<String>,
}

impl AgentResponse {
    /// `{}`: the agent could not tell what was asked.
    pub fn is_empty(&self) -> bool {
        self.news_list.is_none() && self.summary.is_none()
    }

    /// JSON schema handed to the agent runtime as its output schema.
    pub fn response_schema() -> Value {
        json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "news_list": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "additionalProperties": false,
                        "properties": {
                            "title": {"type": "string"},
                            "url": {"type": "string"},
                            "source_name": {"type": "string"},
                            "description": {"type": "string"}
                        },
                        "required": ["title", "url", "source_name"]
                    }
                },
                "summary": {
                    "type": "object",
                    "additionalProperties": false,
                    "properties": {
                        "summary_text": {"type": "string"},
                        "source_urls": {"type": "array", "items": {"type": "string"}}
                    },
                    "required": ["summary_text", "source_urls"]
                }
            }
        })
    }
}

/// Parse and check a structured final answer.
pub fn validate_response(text: &str) -> Result<AgentResponse, ResponseError> {
    let response: AgentResponse = serde_json::from_str(text.trim())?;
    for (index, entry) in response.news_list.iter().flatten().enumerate() {
        if entry.title.trim().is_empty() {
            return Err(ResponseError::EmptyField { index, field: "title" });
        }
        if entry.url.trim().is_empty() {
            return Err(ResponseError::EmptyField { index, field: "url" });
        }
    }
    Ok(response)
}

const STRUCTURED_INSTRUCTION: &str = "You answer questions about current news. \
Use get_news to find articles and get_full_articles to read them. \
Reply only with JSON matching the response schema, or {} if the request is ambiguous.";

const CONVERSATIONAL_INSTRUCTION: &str = "You are a conversational news discovery assistant. \
Use get_news to find stories and get_full_articles to read them before summarizing. \
Ask clarifying questions when unsure what the user wants.";

/// Everything the agent runtime needs to stand up the news agent.
#[derive(Debug, Clone, Serialize)]
pub struct AgentDefinition {
    pub name: String,
    pub description: String,
    pub model: String,
    pub instruction: String,
    pub response_mode: ResponseMode,
    pub tools: Vec<ToolDeclaration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
}

impl AgentDefinition {
    /// Build the definition for the active profile, reading the instruction
    /// from `config.instruction_file` when one is configured.
    #[instrument(level = "info", skip_all, fields(profile = ?config.profile))]
    pub async fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let mode = config.profile.response_mode();
        let instruction = match &config.instruction_file {
            Some(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                })?
                .trim()
                .to_string(),
            None => match mode {
                ResponseMode::Structured => STRUCTURED_INSTRUCTION.to_string(),
                ResponseMode::Conversational => CONVERSATIONAL_INSTRUCTION.to_string(),
            },
        };
        info!(model = %config.model, chars = instruction.len(), "Built agent definition");

        Ok(AgentDefinition {
            name: "root_agent".to_string(),
            description: "Agent to answer questions about news.".to_string(),
            model: config.model.clone(),
            instruction,
            response_mode: mode,
            tools: declarations(config),
            response_schema: (mode == ResponseMode::Structured)
                .then(AgentResponse::response_schema),
        })
    }
}
