//! # Awful News Agent
//!
//! The tool layer of a conversational news agent: a news-search tool backed by
//! NewsAPI and a full-article retrieval tool that fetches pages, extracts their
//! main text, and bounds it for an LLM context window.
//!
//! ## Usage
//!
//! ```sh
//! NEWS_API_KEY=... awful_news_agent search -q "climate" --past-days 7
//! awful_news_agent fetch https://example.com/story
//! awful_news_agent describe
//! ```
//!
//! ## Architecture
//!
//! 1. **Configuration**: profile defaults, YAML file, CLI/env, resolved once
//! 2. **Search**: query the provider, drop incomplete records, cap the count
//! 3. **Retrieval**: fetch → extract → truncate per URL, failures become empty text
//! 4. **Output**: JSON on stdout for the agent runtime (or a human)

use clap::Parser;
use std::error::Error;
use std::io::Read;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod extract;
mod fetcher;
mod models;
mod response;
mod retrieval;
mod search;
#[cfg(test)]
mod test_support;
mod tools;
mod truncate;
mod utils;

use cli::{Cli, Command};
use config::{Config, ConfigFile, Overrides};
use fetcher::HttpFetcher;
use response::{AgentDefinition, ResponseMode, validate_response};
use retrieval::Retriever;
use search::{NewsApiProvider, NewsSearch};
use tools::NewsTools;
use utils::truncate_for_log;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Before tracing and clap, so RUST_LOG and NEWS_API_KEY may come from .env.
    let env_file = config::load_env_file(None);

    // --- Tracing init (stderr, so stdout stays JSON) ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    match env_file {
        Ok(Some(path)) => info!(path = %path.display(), "Loaded environment file"),
        Ok(None) => debug!("No .env file found"),
        Err(e) => {
            error!(error = %e, "Failed to load environment file");
            return Err(e.into());
        }
    }

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args.config, ?args.profile, ?args.command, "Parsed CLI arguments");

    let file = match &args.config {
        Some(path) => ConfigFile::load(path).await?,
        None => ConfigFile::default(),
    };
    let config = Config::resolve(
        file,
        Overrides {
            profile: args.profile,
            news_api_key: args.news_api_key.clone(),
        },
    )?;

    let result = run(args.command, &config).await;
    let elapsed = start_time.elapsed();
    match &result {
        Ok(()) => info!(?elapsed, "Execution complete"),
        Err(e) => error!(?elapsed, error = %e, "Execution failed"),
    }
    result
}

#[instrument(level = "info", skip_all)]
async fn run(command: Command, config: &Config) -> Result<(), Box<dyn Error>> {
    let tools = NewsTools::new(
        NewsSearch::from_config(NewsApiProvider::new(&config.search)?, &config.search),
        Retriever::from_config(HttpFetcher::new(&config.retrieval)?, &config.retrieval),
        config.retrieval.output_shape,
    );

    match command {
        Command::Search {
            query,
            past_days,
            domains,
            max_results,
        } => {
            let items = tools
                .search()
                .search(&query, past_days, domains.as_deref(), max_results)
                .await?;
            print_json(&items)?;
        }
        Command::Fetch { urls } => {
            let output = tools
                .retriever()
                .retrieve_output(&urls, config.retrieval.output_shape)
                .await;
            print_json(&output)?;
        }
        Command::Tool { name, args } => {
            let args: serde_json::Value = serde_json::from_str(&args)?;
            let value = tools.invoke(&name, args).await?;
            print_json(&value)?;
        }
        Command::Describe => {
            let definition = AgentDefinition::from_config(config).await?;
            print_json(&definition)?;
        }
        Command::ValidateResponse { path } => {
            if config.profile.response_mode() == ResponseMode::Conversational {
                info!("Conversational profile answers are free-form; validating against the structured contract anyway");
            }
            let text = read_input(&path).await?;
            match validate_response(&text) {
                Ok(response) => {
                    info!(ambiguous = response.is_empty(), "Response matches the contract");
                    print_json(&response)?;
                }
                Err(e) => {
                    error!(
                        error = %e,
                        preview = %truncate_for_log(&text, 300),
                        "Response does not match the contract"
                    );
                    return Err(e.into());
                }
            }
        }
    }
    Ok(())
}

async fn read_input(path: &str) -> Result<String, Box<dyn Error>> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(tokio::fs::read_to_string(path).await?)
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
