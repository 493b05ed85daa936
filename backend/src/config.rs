//! # Runtime Configuration
//!
//! Settings are read from environment variables (a `.env` file is honoured by the
//! binaries through `dotenvy`). Parsing goes through a lookup closure so tests can
//! supply an environment of their own without touching the process environment.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `DATABASE_URL` | required | SQLite file path, optionally `sqlite://`-prefixed, or `:memory:` |
//! | `HOST` | `0.0.0.0` | Listen address |
//! | `PORT` | `3000` | Listen port |
//! | `APP_ENV` | `development` | `development` or `production`; production hides 500 details |
//! | `CORS_ORIGINS` | any | Comma separated allow-list; empty or `*` allows every origin |
//! | `DB_BUSY_TIMEOUT_MS` | `5000` | Upper bound on waiting for a locked database |
//! | `TRUST_PROXY` | `false` | Key rate limits on the forwarded client address |
//! | `RATE_LIMIT_GENERAL_MAX` / `_WINDOW_SECS` | `100` / `900` | Limit for `/api/*` |
//! | `RATE_LIMIT_QUOTES_MAX` / `_WINDOW_SECS` | `30` / `60` | Limit for quote endpoints |

use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {name}")]
    Invalid { name: &'static str, value: String },
}

/// Controls how much error detail reaches clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Development,
    Production,
}

impl RunMode {
    pub fn is_production(self) -> bool {
        self == RunMode::Production
    }
}

impl FromStr for RunMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(RunMode::Development),
            "production" | "prod" => Ok(RunMode::Production),
            _ => Err(()),
        }
    }
}

/// Origins allowed by the CORS layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

impl CorsOrigins {
    pub fn parse(raw: &str) -> CorsOrigins {
        let origins: Vec<String> = raw
            .split(',')
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .map(|o| o.to_string())
            .collect();
        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            CorsOrigins::Any
        } else {
            CorsOrigins::List(origins)
        }
    }
}

/// A fixed window of `max_requests` per `window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub max_requests: u32,
    pub window: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSettings {
    pub general: RateLimit,
    pub quotes: RateLimit,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        RateLimitSettings {
            general: RateLimit {
                max_requests: 100,
                window: Duration::from_secs(15 * 60),
            },
            quotes: RateLimit {
                max_requests: 30,
                window: Duration::from_secs(60),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub mode: RunMode,
    pub cors_origins: CorsOrigins,
    pub busy_timeout: Duration,
    pub trust_proxy: bool,
    pub rate_limits: RateLimitSettings,
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<AppConfig, ConfigError> {
        AppConfig::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<AppConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let host = lookup("HOST")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "0.0.0.0".to_string());

        let defaults = RateLimitSettings::default();

        Ok(AppConfig {
            database_url,
            host,
            port: parse_var(&lookup, "PORT", 3000)?,
            mode: parse_var(&lookup, "APP_ENV", RunMode::Development)?,
            cors_origins: CorsOrigins::parse(&lookup("CORS_ORIGINS").unwrap_or_default()),
            busy_timeout: Duration::from_millis(parse_var(&lookup, "DB_BUSY_TIMEOUT_MS", 5000)?),
            trust_proxy: parse_var(&lookup, "TRUST_PROXY", false)?,
            rate_limits: RateLimitSettings {
                general: RateLimit {
                    max_requests: parse_var(
                        &lookup,
                        "RATE_LIMIT_GENERAL_MAX",
                        defaults.general.max_requests,
                    )?,
                    window: Duration::from_secs(parse_var(
                        &lookup,
                        "RATE_LIMIT_GENERAL_WINDOW_SECS",
                        defaults.general.window.as_secs(),
                    )?),
                },
                quotes: RateLimit {
                    max_requests: parse_var(
                        &lookup,
                        "RATE_LIMIT_QUOTES_MAX",
                        defaults.quotes.max_requests,
                    )?,
                    window: Duration::from_secs(parse_var(
                        &lookup,
                        "RATE_LIMIT_QUOTES_WINDOW_SECS",
                        defaults.quotes.window.as_secs(),
                    )?),
                },
            },
        })
    }
}

/// Parses `name` when present and non-blank, otherwise returns `default`.
fn parse_var<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().map_err(|_| ConfigError::Invalid { name, value: raw })
        }
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let env: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| env.get(name).cloned())
    }

    #[test]
    fn database_url_is_required() {
        assert_eq!(config(&[]).unwrap_err(), ConfigError::Missing("DATABASE_URL"));
        assert_eq!(
            config(&[("DATABASE_URL", "  ")]).unwrap_err(),
            ConfigError::Missing("DATABASE_URL")
        );
    }

    #[test]
    fn defaults() {
        let cfg = config(&[("DATABASE_URL", "verses.sqlite")]).unwrap();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.mode, RunMode::Development);
        assert_eq!(cfg.cors_origins, CorsOrigins::Any);
        assert_eq!(cfg.busy_timeout, Duration::from_secs(5));
        assert!(!cfg.trust_proxy);
        assert_eq!(cfg.rate_limits, RateLimitSettings::default());
    }

    #[test]
    fn overrides() {
        let cfg = config(&[
            ("DATABASE_URL", "verses.sqlite"),
            ("PORT", "8080"),
            ("APP_ENV", "Production"),
            ("CORS_ORIGINS", "https://a.example, https://b.example,"),
            ("RATE_LIMIT_QUOTES_MAX", "5"),
            ("TRUST_PROXY", "true"),
        ])
        .unwrap();
        assert_eq!(cfg.port, 8080);
        assert!(cfg.mode.is_production());
        assert_eq!(
            cfg.cors_origins,
            CorsOrigins::List(vec![
                "https://a.example".to_string(),
                "https://b.example".to_string()
            ])
        );
        assert_eq!(cfg.rate_limits.quotes.max_requests, 5);
        assert_eq!(cfg.rate_limits.quotes.window, Duration::from_secs(60));
        assert!(cfg.trust_proxy);
    }

    #[test]
    fn invalid_values_are_errors() {
        assert_eq!(
            config(&[("DATABASE_URL", "x"), ("PORT", "http")]).unwrap_err(),
            ConfigError::Invalid {
                name: "PORT",
                value: "http".to_string()
            }
        );
        assert!(config(&[("DATABASE_URL", "x"), ("APP_ENV", "staging")]).is_err());
    }

    #[test]
    fn wildcard_origin_means_any() {
        assert_eq!(CorsOrigins::parse("https://a.example,*"), CorsOrigins::Any);
        assert_eq!(CorsOrigins::parse(""), CorsOrigins::Any);
    }
}
