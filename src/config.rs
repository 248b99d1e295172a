//! Runtime configuration from environment variables

use anyhow::{bail, Context, Result};
use std::env;
use std::str::FromStr;

/// How the chat endpoint picks products
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Filter by detected intent, then rank the survivors
    #[default]
    Intent,
    /// Rank the whole catalog by additive score
    Scored,
}

impl FromStr for MatchStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "intent" => Ok(MatchStrategy::Intent),
            "scored" | "score" => Ok(MatchStrategy::Scored),
            other => bail!("unknown match strategy '{}' (expected intent or scored)", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: String,   // "*" or comma-separated origins
    pub match_strategy: MatchStrategy,
    pub max_query_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8888,
            cors_allowed_origins: "*".to_string(),
            match_strategy: MatchStrategy::Intent,
            max_query_chars: 2000,
        }
    }
}

impl Config {
    /// Load `.env` if present, then read `SAGE_*` variables over the defaults
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let port = match lookup("SAGE_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("invalid SAGE_PORT '{}'", raw))?,
            None => defaults.port,
        };

        let match_strategy = match lookup("SAGE_MATCH_STRATEGY") {
            Some(raw) => raw.parse()?,
            None => defaults.match_strategy,
        };

        let max_query_chars = match lookup("SAGE_MAX_QUERY_CHARS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("invalid SAGE_MAX_QUERY_CHARS '{}'", raw))?,
            None => defaults.max_query_chars,
        };
        if max_query_chars == 0 {
            bail!("SAGE_MAX_QUERY_CHARS must be greater than zero");
        }

        Ok(Config {
            host: lookup("SAGE_HOST").unwrap_or(defaults.host),
            port,
            cors_allowed_origins: lookup("SAGE_CORS_ORIGINS").unwrap_or(defaults.cors_allowed_origins),
            match_strategy,
            max_query_chars,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
