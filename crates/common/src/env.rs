use std::{
    net::{Ipv4Addr, SocketAddr},
    str::FromStr,
    sync::OnceLock,
};

use log::LevelFilter;
use reqwest::Url;

const DEFAULT_DB_PATH: &str = "bot.db";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_LOG_ERROR_FILE: &str = "errors.log";
const DEFAULT_WEBHOOK_PATH: &str = "/webhook";
const DEFAULT_WEBHOOK_PORT: u16 = 3000;

static SETTINGS: OnceLock<Settings> = OnceLock::new();

/// Process-wide settings. Loaded from env (and `.env`) on first call, never
/// changed after that
pub fn settings() -> Result<&'static Settings, ConfigError> {
    if let Some(s) = SETTINGS.get() {
        return Ok(s);
    }
    let loaded = Settings::from_env()?;
    Ok(SETTINGS.get_or_init(|| loaded))
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub bot_token: String,
    /// Custom Bot API server, e.g. a local one
    pub bot_api_url: Option<Url>,
    pub db_path: String,
    pub db_max_connections: u32,
    /// Drop and recreate tables on start
    pub db_recreate: bool,
    pub log_level: LevelFilter,
    pub log_error_file: String,
    pub run_mode: RunMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    Polling,
    Webhook(WebhookSettings),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookSettings {
    url: Url,
    path: String,
    port: u16,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                log::warn!("failed to read .env: {e}");
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let var = |key| lookup(key).filter(|v| !v.trim().is_empty());

        let bot_token = var("BOT_TOKEN").ok_or(ConfigError::Missing("BOT_TOKEN"))?;

        let run_mode = match var("RUN_MODE").as_deref() {
            None | Some("polling") | Some("long_polling") => RunMode::Polling,
            Some("webhook") => {
                let url = var("WEBHOOK_URL").ok_or(ConfigError::Missing("WEBHOOK_URL"))?;
                let path = var("WEBHOOK_PATH").unwrap_or_else(|| DEFAULT_WEBHOOK_PATH.to_string());
                let port = parse_or("WEBHOOK_PORT", var("WEBHOOK_PORT"), DEFAULT_WEBHOOK_PORT)?;
                RunMode::Webhook(WebhookSettings::new(&url, &path, port)?)
            }
            Some(other) => return Err(ConfigError::invalid("RUN_MODE", other, "expected polling or webhook")),
        };

        let bot_api_url = var("BOT_API_URL")
            .map(|url| Url::parse(&url).map_err(|e| ConfigError::invalid("BOT_API_URL", &url, e)))
            .transpose()?;

        Ok(Self {
            bot_token,
            bot_api_url,
            db_path: var("DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string()),
            db_max_connections: parse_or(
                "DB_MAX_CONNECTIONS",
                var("DB_MAX_CONNECTIONS"),
                DEFAULT_DB_MAX_CONNECTIONS,
            )?,
            db_recreate: parse_or("DB_RECREATE", var("DB_RECREATE"), false)?,
            log_level: parse_or("LOG_LEVEL", var("LOG_LEVEL"), LevelFilter::Debug)?,
            log_error_file: var("LOG_ERROR_FILE").unwrap_or_else(|| DEFAULT_LOG_ERROR_FILE.to_string()),
            run_mode,
        })
    }
}

impl WebhookSettings {
    pub fn new(url: &str, path: &str, port: u16) -> Result<Self, ConfigError> {
        let parsed = Url::parse(url).map_err(|e| ConfigError::invalid("WEBHOOK_URL", url, e))?;
        if parsed.scheme() != "https" {
            return Err(ConfigError::invalid("WEBHOOK_URL", url, "telegram requires https"));
        }
        if port == 0 {
            return Err(ConfigError::invalid("WEBHOOK_PORT", "0", "port should be in 1..=65535"));
        }
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        Ok(Self {
            url: parsed,
            path,
            port,
        })
    }
    /// Url registered in telegram: base url with webhook path
    pub fn public_url(&self) -> Url {
        let mut url = self.url.clone();
        url.set_path(&self.path);
        url
    }
    /// Local address of webhook server, listens on all interfaces
    pub fn address(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
    pub fn path(&self) -> &str {
        &self.path
    }
}

fn parse_or<T>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(v) => v.trim().parse().map_err(|e| ConfigError::invalid(key, &v, e)),
        None => Ok(default),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} env variable is not set")]
    Missing(&'static str),
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl std::fmt::Display) -> Self {
        Self::Invalid {
            key,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&'static str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<_, _> = vars.iter().map(|&(k, v)| (k, v.to_string())).collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let s = load(&[("BOT_TOKEN", "123:abc")]).unwrap();
        assert_eq!(s.bot_token, "123:abc");
        assert_eq!(s.db_path, DEFAULT_DB_PATH);
        assert_eq!(s.db_max_connections, DEFAULT_DB_MAX_CONNECTIONS);
        assert!(!s.db_recreate);
        assert_eq!(s.log_level, LevelFilter::Debug);
        assert_eq!(s.run_mode, RunMode::Polling);
        assert_eq!(s.bot_api_url, None);
    }

    #[test]
    fn test_bot_api_url() {
        let s = load(&[("BOT_TOKEN", "t"), ("BOT_API_URL", "http://localhost:8081")]).unwrap();
        assert_eq!(s.bot_api_url.map(String::from), Some("http://localhost:8081/".to_string()));
    }

    #[test]
    fn test_missing_token() {
        assert_eq!(load(&[]).unwrap_err(), ConfigError::Missing("BOT_TOKEN"));
        assert_eq!(
            load(&[("BOT_TOKEN", "  ")]).unwrap_err(),
            ConfigError::Missing("BOT_TOKEN")
        );
    }

    #[test]
    fn test_webhook_mode() {
        let s = load(&[
            ("BOT_TOKEN", "t"),
            ("RUN_MODE", "webhook"),
            ("WEBHOOK_URL", "https://example.com"),
            ("WEBHOOK_PATH", "hook"),
            ("WEBHOOK_PORT", "8443"),
        ])
        .unwrap();
        let RunMode::Webhook(webhook) = s.run_mode else {
            panic!("expected webhook mode");
        };
        assert_eq!(webhook.path(), "/hook");
        assert_eq!(webhook.public_url().as_str(), "https://example.com/hook");
        assert_eq!(webhook.address().port(), 8443);
    }

    #[test]
    fn test_invalid_values() {
        let table: &[&[(&'static str, &str)]] = &[
            &[("BOT_TOKEN", "t"), ("RUN_MODE", "webhook")],
            &[("BOT_TOKEN", "t"), ("RUN_MODE", "webhook"), ("WEBHOOK_URL", "http://example.com")],
            &[
                ("BOT_TOKEN", "t"),
                ("RUN_MODE", "webhook"),
                ("WEBHOOK_URL", "https://example.com"),
                ("WEBHOOK_PORT", "0"),
            ],
            &[
                ("BOT_TOKEN", "t"),
                ("RUN_MODE", "webhook"),
                ("WEBHOOK_URL", "https://example.com"),
                ("WEBHOOK_PORT", "70000"),
            ],
            &[("BOT_TOKEN", "t"), ("RUN_MODE", "push")],
            &[("BOT_TOKEN", "t"), ("DB_MAX_CONNECTIONS", "many")],
            &[("BOT_TOKEN", "t"), ("LOG_LEVEL", "loud")],
            &[("BOT_TOKEN", "t"), ("BOT_API_URL", "not a url")],
        ];
        for (i, vars) in table.iter().enumerate() {
            assert!(load(vars).is_err(), "test table[{i}]");
        }
    }
}
