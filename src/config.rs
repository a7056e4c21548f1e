//! Process-wide configuration.
//!
//! A [`Config`] is resolved exactly once at startup from three layers, later
//! layers winning:
//!
//! 1. Built-in defaults of the selected [`Profile`]
//! 2. An optional YAML file (`--config`)
//! 3. Command-line flags and environment variables (`--profile`, `NEWS_API_KEY`)
//!
//! Variables from a `.env` file are merged into the process environment by
//! [`load_env_file`] before the command line is parsed. Variables already set
//! in the environment keep their value.
//!
//! After [`Config::resolve`] returns, the value is immutable and handed to the
//! components that need it. Nothing else in the crate reads the environment.
//!
//! # Example file
//!
//! ```yaml
//! profile: conversational
//! model: gemini-2.0-flash
//! search:
//!   max_results: 25
//! retrieval:
//!   max_chars: 8000
//!   timeout_secs: 20
//! ```

use crate::error::ConfigError;
use crate::response::ResponseMode;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

pub const DEFAULT_NEWS_API_BASE_URL: &str = "https://newsapi.org";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_PAST_DAYS: u32 = 7;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Named bundle of defaults for one flavour of the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Answers with the structured JSON contract; articles keyed by URL.
    #[default]
    Structured,
    /// Free-form dialogue; articles returned as an ordered list.
    Conversational,
}

/// Container shape of the article retrieval tool's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputShape {
    List,
    Mapping,
}

impl Profile {
    pub fn max_results(self) -> usize {
        match self {
            Profile::Structured => 20,
            Profile::Conversational => 30,
        }
    }

    pub fn max_chars(self) -> usize {
        match self {
            Profile::Structured => 10_000,
            Profile::Conversational => 5_000,
        }
    }

    pub fn output_shape(self) -> OutputShape {
        match self {
            Profile::Structured => OutputShape::Mapping,
            Profile::Conversational => OutputShape::List,
        }
    }

    pub fn response_mode(self) -> ResponseMode {
        match self {
            Profile::Structured => ResponseMode::Structured,
            Profile::Conversational => ResponseMode::Conversational,
        }
    }
}

/// On-disk shape of the YAML config. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub profile: Option<Profile>,
    pub model: Option<String>,
    pub instruction_file: Option<String>,
    #[serde(default)]
    pub search: SearchSection,
    #[serde(default)]
    pub retrieval: RetrievalSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchSection {
    pub base_url: Option<String>,
    pub max_results: Option<usize>,
    pub default_past_days: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetrievalSection {
    pub max_chars: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
    pub concurrency: Option<usize>,
}

impl ConfigFile {
    /// Load and parse a YAML config file.
    #[instrument(level = "info", skip_all, fields(%path))]
    pub async fn load(path: &str) -> Result<Self, ConfigError> {
        let raw = tokio::fs::read_to_string(Path::new(path))
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_string(),
                source,
            })?;
        let file: ConfigFile = serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;
        debug!(?file, "Parsed config file");
        Ok(file)
    }
}

/// Load `path`, or a `.env` found in the working directory or its parents.
///
/// Returns the file that was loaded; a missing default `.env` is not an error.
pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    match path {
        Some(path) => {
            dotenvy::from_path(path)?;
            Ok(Some(path.to_path_buf()))
        }
        None => match dotenvy::dotenv() {
            Ok(found) => Ok(Some(found)),
            Err(e) if e.not_found() => Ok(None),
            Err(e) => Err(e.into()),
        },
    }
}

/// Values supplied on the command line. `None` leaves lower layers in place.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub profile: Option<Profile>,
    pub news_api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub max_results: usize,
    pub default_past_days: u32,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    pub max_chars: usize,
    pub timeout: Duration,
    pub user_agent: String,
    pub concurrency: usize,
    pub output_shape: OutputShape,
}

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub profile: Profile,
    pub model: String,
    pub instruction_file: Option<String>,
    pub search: SearchConfig,
    pub retrieval: RetrievalConfig,
}

impl Config {
    /// Defaults of a profile with no file and no overrides.
    #[cfg(test)]
    pub fn for_profile(profile: Profile) -> Self {
        Self::resolve(ConfigFile::default(), Overrides {
            profile: Some(profile),
            news_api_key: None,
        })
        .unwrap()
    }

    /// Merge the layers and validate the result.
    pub fn resolve(file: ConfigFile, overrides: Overrides) -> Result<Self, ConfigError> {
        let profile = overrides.profile.or(file.profile).unwrap_or_default();
        let timeout_secs = file.retrieval.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        let api_key = overrides
            .news_api_key
            .filter(|k| !k.trim().is_empty());

        let config = Config {
            profile,
            model: file.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            instruction_file: file.instruction_file,
            search: SearchConfig {
                base_url: file
                    .search
                    .base_url
                    .unwrap_or_else(|| DEFAULT_NEWS_API_BASE_URL.to_string()),
                api_key,
                max_results: file.search.max_results.unwrap_or(profile.max_results()),
                default_past_days: file.search.default_past_days.unwrap_or(DEFAULT_PAST_DAYS),
                timeout: Duration::from_secs(timeout_secs),
            },
            retrieval: RetrievalConfig {
                max_chars: file.retrieval.max_chars.unwrap_or(profile.max_chars()),
                timeout: Duration::from_secs(timeout_secs),
                user_agent: file
                    .retrieval
                    .user_agent
                    .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
                concurrency: file.retrieval.concurrency.unwrap_or(1),
                output_shape: profile.output_shape(),
            },
        };
        config.validate()?;

        info!(
            profile = ?config.profile,
            max_results = config.search.max_results,
            max_chars = config.retrieval.max_chars,
            concurrency = config.retrieval.concurrency,
            has_api_key = config.search.api_key.is_some(),
            "Configuration resolved"
        );
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.search.max_results == 0 {
            return Err(ConfigError::Invalid("search.max_results must be at least 1".into()));
        }
        if self.retrieval.max_chars == 0 {
            return Err(ConfigError::Invalid("retrieval.max_chars must be at least 1".into()));
        }
        if self.retrieval.concurrency == 0 {
            return Err(ConfigError::Invalid("retrieval.concurrency must be at least 1".into()));
        }
        if self.retrieval.timeout.is_zero() {
            return Err(ConfigError::Invalid("retrieval.timeout_secs must be at least 1".into()));
        }
        url::Url::parse(&self.search.base_url)
            .map_err(|e| ConfigError::Invalid(format!("search.base_url: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_structured_profile_defaults() {
        let config = Config::for_profile(Profile::Structured);
        assert_eq!(config.search.max_results, 20);
        assert_eq!(config.retrieval.max_chars, 10_000);
        assert_eq!(config.retrieval.output_shape, OutputShape::Mapping);
        assert_eq!(config.retrieval.concurrency, 1);
        assert_eq!(config.search.default_past_days, 7);
        assert_eq!(config.retrieval.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_conversational_profile_defaults() {
        let config = Config::for_profile(Profile::Conversational);
        assert_eq!(config.search.max_results, 30);
        assert_eq!(config.retrieval.max_chars, 5_000);
        assert_eq!(config.retrieval.output_shape, OutputShape::List);
        assert_eq!(config.profile.response_mode(), ResponseMode::Conversational);
    }

    #[test]
    fn test_cli_profile_overrides_file_profile() {
        let file = ConfigFile {
            profile: Some(Profile::Conversational),
            ..Default::default()
        };
        let config = Config::resolve(
            file,
            Overrides {
                profile: Some(Profile::Structured),
                news_api_key: Some("key".into()),
            },
        )
        .unwrap();
        assert_eq!(config.profile, Profile::Structured);
        assert_eq!(config.search.api_key.as_deref(), Some("key"));
    }

    #[test]
    fn test_blank_api_key_is_treated_as_missing() {
        let config = Config::resolve(
            ConfigFile::default(),
            Overrides {
                profile: None,
                news_api_key: Some("   ".into()),
            },
        )
        .unwrap();
        assert!(config.search.api_key.is_none());
    }

    #[test]
    fn test_zero_max_chars_is_rejected() {
        let mut file = ConfigFile::default();
        file.retrieval.max_chars = Some(0);
        let err = Config::resolve(file, Overrides::default()).unwrap_err();
        assert!(err.to_string().contains("max_chars"));
    }

    #[tokio::test]
    async fn test_load_yaml_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            tmp,
            "profile: conversational\nmodel: test-model\nsearch:\n  max_results: 5\nretrieval:\n  max_chars: 123\n  concurrency: 4"
        )
        .unwrap();

        let file = ConfigFile::load(tmp.path().to_str().unwrap()).await.unwrap();
        let config = Config::resolve(file, Overrides::default()).unwrap();
        assert_eq!(config.profile, Profile::Conversational);
        assert_eq!(config.model, "test-model");
        assert_eq!(config.search.max_results, 5);
        assert_eq!(config.retrieval.max_chars, 123);
        assert_eq!(config.retrieval.concurrency, 4);
        assert_eq!(config.retrieval.output_shape, OutputShape::List);
    }

    #[tokio::test]
    async fn test_unknown_yaml_key_is_a_parse_error() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "retrieval:\n  max_charz: 10").unwrap();
        let err = ConfigFile::load(tmp.path().to_str().unwrap()).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_env_file_fills_unset_variables_only() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            tmp,
            "AWFUL_NEWS_AGENT_ENV_FILE_CHECK=loaded\nPATH=/from/env/file"
        )
        .unwrap();

        let loaded = load_env_file(Some(tmp.path())).unwrap();
        assert_eq!(loaded.as_deref(), Some(tmp.path()));
        assert_eq!(
            std::env::var("AWFUL_NEWS_AGENT_ENV_FILE_CHECK").as_deref(),
            Ok("loaded")
        );
        assert_ne!(std::env::var("PATH").as_deref(), Ok("/from/env/file"));
    }

    #[test]
    fn test_explicit_env_file_must_exist() {
        let err = load_env_file(Some(Path::new("/definitely/not/here.env"))).unwrap_err();
        assert!(matches!(err, ConfigError::EnvFile(_)));
    }

    #[tokio::test]
    async fn test_missing_file_is_an_io_error() {
        let err = ConfigFile::load("/definitely/not/here.yaml").await.unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
