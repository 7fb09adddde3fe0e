use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::db::models::{MAX_RATING, MIN_RATING};
use crate::recommend::RecommendOptions;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Every
/// value has a default; a value that is set but malformed is an error.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub recommend: RecommendOptions,
    /// Address the HTTP API binds to (LECTERN_BIND)
    pub bind: String,
    /// Port the HTTP API listens on (LECTERN_PORT)
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let defaults = RecommendOptions::default();

        let rating_threshold: f64 =
            parse_var("LECTERN_RATING_THRESHOLD", defaults.rating_threshold)?;
        if !(MIN_RATING..=MAX_RATING).contains(&rating_threshold) {
            anyhow::bail!(
                "LECTERN_RATING_THRESHOLD must be between {MIN_RATING} and {MAX_RATING}, got {rating_threshold}"
            );
        }

        let result_cap: usize = parse_var("LECTERN_RESULT_CAP", defaults.result_cap)?;
        if result_cap == 0 {
            anyhow::bail!("LECTERN_RESULT_CAP must be at least 1");
        }

        let popular_limit: usize = parse_var("LECTERN_POPULAR_LIMIT", defaults.popular_limit)?;
        if popular_limit == 0 {
            anyhow::bail!("LECTERN_POPULAR_LIMIT must be at least 1");
        }

        Ok(Self {
            db_path: env::var("LECTERN_DB_PATH").unwrap_or_else(|_| "./lectern.db".to_string()),
            recommend: RecommendOptions {
                rating_threshold,
                result_cap,
                popular_limit,
            },
            bind: env::var("LECTERN_BIND").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("LECTERN_PORT", 5000)?,
        })
    }
}

/// Read and parse an env var, falling back to `default` only when it is unset.
fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} has an invalid value: {raw:?}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var_unset_uses_default() {
        let value: usize = parse_var("LECTERN_TEST_SURELY_UNSET_VAR", 7).unwrap();
        assert_eq!(value, 7);
    }
}
