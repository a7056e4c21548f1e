//! Command-line interface definitions for Awful News Agent.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! The news API key can be provided via flag or the `NEWS_API_KEY` environment
//! variable. Every command prints JSON on stdout; logs go to stderr.

use crate::config::Profile;
use clap::{Parser, Subcommand};

/// Command-line arguments for the Awful News Agent tools.
///
/// # Examples
///
/// ```sh
/// # Search the last three days of climate coverage
/// awful_news_agent search --query climate --past-days 3
///
/// # Fetch full article text in the conversational profile
/// awful_news_agent --profile conversational fetch https://example.com/a https://example.com/b
///
/// # Invoke a tool exactly as the agent runtime would
/// awful_news_agent tool --name get_news --args '{"query": "elections"}'
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Agent profile (defaults, output shape, response mode)
    #[arg(short, long, value_enum, global = true)]
    pub profile: Option<Profile>,

    /// News API key
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true, global = true)]
    pub news_api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search recent news on a topic
    Search {
        /// Topic to search for
        #[arg(short, long)]
        query: String,

        /// How many days back to search
        #[arg(long)]
        past_days: Option<u32>,

        /// Comma-separated domains to restrict the search to
        #[arg(short, long)]
        domains: Option<String>,

        /// Maximum number of results
        #[arg(short, long)]
        max_results: Option<usize>,
    },

    /// Fetch and extract the main text of articles
    Fetch {
        /// Article URLs, in the order results should be returned
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Invoke a tool by name with JSON arguments
    Tool {
        /// Tool name (get_news or get_full_articles)
        #[arg(short, long)]
        name: String,

        /// JSON object of tool arguments
        #[arg(short, long, default_value = "{}")]
        args: String,
    },

    /// Print the agent definition: tools, instruction, response schema
    Describe,

    /// Validate a structured agent answer read from a file or stdin
    ValidateResponse {
        /// Path to the answer, or `-` for stdin
        #[arg(default_value = "-")]
        path: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_parsing() {
        let cli = Cli::parse_from([
            "awful_news_agent",
            "search",
            "--query",
            "climate",
            "--past-days",
            "3",
            "-m",
            "5",
        ]);
        match cli.command {
            Command::Search {
                query,
                past_days,
                domains,
                max_results,
            } => {
                assert_eq!(query, "climate");
                assert_eq!(past_days, Some(3));
                assert_eq!(domains, None);
                assert_eq!(max_results, Some(5));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_fetch_with_global_profile_after_subcommand() {
        let cli = Cli::parse_from([
            "awful_news_agent",
            "fetch",
            "http://a.example",
            "http://b.example",
            "--profile",
            "conversational",
        ]);
        assert_eq!(cli.profile, Some(Profile::Conversational));
        match cli.command {
            Command::Fetch { urls } => assert_eq!(urls, vec!["http://a.example", "http://b.example"]),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_fetch_requires_urls() {
        assert!(Cli::try_parse_from(["awful_news_agent", "fetch"]).is_err());
    }

    #[test]
    fn test_tool_default_args() {
        let cli = Cli::parse_from(["awful_news_agent", "tool", "--name", "get_news"]);
        match cli.command {
            Command::Tool { name, args } => {
                assert_eq!(name, "get_news");
                assert_eq!(args, "{}");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_validate_response_defaults_to_stdin() {
        let cli = Cli::parse_from(["awful_news_agent", "validate-response"]);
        assert!(matches!(cli.command, Command::ValidateResponse { path } if path == "-"));
    }
}
