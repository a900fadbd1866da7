//! Configuration for the architecture council.
//!
//! [`CouncilConfig`] is populated once at process start from the environment
//! and handed to [`build_council`](crate::council::build_council); it is
//! read-only afterwards.
//!
//! | Variable | Required | Default |
//! |---|---|---|
//! | `OPENAI_API_KEY` | yes | |
//! | `OPENAI_MODEL` | yes | |
//! | `OPENAI_BASE_URL` | no | OpenAI's endpoint |
//! | `COUNCIL_MAX_ROUNDS` | no | `6` |
//! | `COUNCIL_MAX_TOKENS` | no | `8192` |
//! | `COUNCIL_TASK` | no | built-in brainstorming task |
//!
//! # Example
//!
//! ```rust
//! use archcouncil::CouncilConfig;
//! use std::collections::HashMap;
//!
//! let vars: HashMap<&str, &str> = [("OPENAI_API_KEY", "sk-test"), ("OPENAI_MODEL", "gpt-4o-mini")]
//!     .iter()
//!     .cloned()
//!     .collect();
//! let config = CouncilConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
//! assert_eq!(config.max_rounds, 6);
//! ```

use std::error::Error;
use std::fmt;

use crate::archcouncil::agent::DEFAULT_MAX_TOKENS;
use crate::archcouncil::group_chat::DEFAULT_MAX_ROUNDS;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const MODEL_VAR: &str = "OPENAI_MODEL";
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
pub const MAX_ROUNDS_VAR: &str = "COUNCIL_MAX_ROUNDS";
pub const MAX_TOKENS_VAR: &str = "COUNCIL_MAX_TOKENS";
pub const TASK_VAR: &str = "COUNCIL_TASK";

/// Errors raised while loading [`CouncilConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    MissingVar(&'static str),
    /// A variable is set but its value cannot be used.
    InvalidValue { var: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingVar(var) => {
                write!(f, "Missing required environment variable {}", var)
            }
            ConfigError::InvalidValue { var, value } => {
                write!(f, "Invalid value for {}: '{}'", var, value)
            }
        }
    }
}

impl Error for ConfigError {}

/// Settings for one council run.
#[derive(Clone)]
pub struct CouncilConfig {
    pub api_key: String,
    pub model: String,
    /// OpenAI compatible endpoint; `None` uses OpenAI.
    pub base_url: Option<String>,
    /// Round cap for the conversation, opening task included.
    pub max_rounds: usize,
    /// Context budget of each LLM agent's session.
    pub max_tokens: usize,
    /// Replaces the default brainstorming task when set.
    pub task: Option<String>,
}

impl fmt::Debug for CouncilConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CouncilConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("max_rounds", &self.max_rounds)
            .field("max_tokens", &self.max_tokens)
            .field("task", &self.task)
            .finish()
    }
}

impl CouncilConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key -> value lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get(API_KEY_VAR).ok_or(ConfigError::MissingVar(API_KEY_VAR))?;
        let model = get(MODEL_VAR).ok_or(ConfigError::MissingVar(MODEL_VAR))?;

        let max_rounds = match get(MAX_ROUNDS_VAR) {
            Some(raw) => parse_positive(MAX_ROUNDS_VAR, &raw)?,
            None => DEFAULT_MAX_ROUNDS,
        };
        let max_tokens = match get(MAX_TOKENS_VAR) {
            Some(raw) => parse_positive(MAX_TOKENS_VAR, &raw)?,
            None => DEFAULT_MAX_TOKENS,
        };

        Ok(CouncilConfig {
            api_key,
            model,
            base_url: get(BASE_URL_VAR),
            max_rounds,
            max_tokens,
            task: get(TASK_VAR),
        })
    }
}

fn parse_positive(var: &'static str, raw: &str) -> Result<usize, ConfigError> {
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<CouncilConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CouncilConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[(API_KEY_VAR, "sk-test"), (MODEL_VAR, "gpt-4o-mini")]).unwrap();
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.base_url, None);
        assert_eq!(config.max_rounds, 6);
        assert_eq!(config.max_tokens, 8_192);
        assert_eq!(config.task, None);
    }

    #[test]
    fn test_missing_credential_and_model() {
        assert_eq!(
            load(&[(MODEL_VAR, "gpt-4o")]).unwrap_err(),
            ConfigError::MissingVar(API_KEY_VAR)
        );
        assert_eq!(
            load(&[(API_KEY_VAR, "sk-test"), (MODEL_VAR, "   ")]).unwrap_err(),
            ConfigError::MissingVar(MODEL_VAR)
        );
    }

    #[test]
    fn test_overrides_and_invalid_numbers() {
        let config = load(&[
            (API_KEY_VAR, "sk-test"),
            (MODEL_VAR, "gpt-4o"),
            (BASE_URL_VAR, "http://localhost:8000"),
            (MAX_ROUNDS_VAR, "4"),
            (TASK_VAR, "Design a CDN."),
        ])
        .unwrap();
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.max_rounds, 4);
        assert_eq!(config.task.as_deref(), Some("Design a CDN."));

        let err = load(&[
            (API_KEY_VAR, "sk-test"),
            (MODEL_VAR, "gpt-4o"),
            (MAX_ROUNDS_VAR, "0"),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                var: MAX_ROUNDS_VAR,
                value: "0".to_string()
            }
        );
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = load(&[(API_KEY_VAR, "sk-secret"), (MODEL_VAR, "gpt-4o")]).unwrap();
        assert!(!format!("{:?}", config).contains("sk-secret"));
    }
}
