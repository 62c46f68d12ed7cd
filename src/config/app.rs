use std::net::SocketAddr;
use anyhow::bail;
use reqwest::Url;
use crate::config::env::*;
use crate::{metrics, webhook};

const DEFAULT_APP_NAME: &str = "Safe Drive Monitor";
const DEFAULT_WEBHOOK_PATH: &str = "/webhook";
const SECRET_TOKEN_MAX_LENGTH: usize = 256;

#[derive(Clone)]
pub struct AppConfig {
    pub app_name: String,
    pub webhook_path: String,
    /// Sent by Telegram in the `X-Telegram-Bot-Api-Secret-Token` header of every webhook request.
    pub webhook_secret: Option<String>,
}

#[derive(Clone)]
pub struct BotConfig {
    pub token: String,
    pub webhook_url: Option<Url>,
}

#[derive(Clone, Copy)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let app_name = get_env_value_or_default("APP_NAME", DEFAULT_APP_NAME.to_owned());
        let webhook_path = get_env_value_or_default("WEBHOOK_PATH", DEFAULT_WEBHOOK_PATH.to_owned());
        let webhook_secret: Option<String> = get_env_optional_value("WEBHOOK_SECRET_TOKEN")?;
        if webhook_secret.is_none() {
            log::warn!("WEBHOOK_SECRET_TOKEN is not set, webhook requests won't be authenticated");
        }
        Ok(Self {
            app_name,
            webhook_path: check_webhook_path(ensure_starts_with_slash(webhook_path))?,
            webhook_secret: webhook_secret.map(check_secret_token).transpose()?,
        })
    }
}

#[cfg(test)]
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_owned(),
            webhook_path: DEFAULT_WEBHOOK_PATH.to_owned(),
            webhook_secret: None,
        }
    }
}

impl BotConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            token: get_env_mandatory_value("TELEGRAM_TOKEN")?,
            webhook_url: get_env_optional_value("WEBHOOK_URL")?,
        })
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            listen_addr: get_env_value_or_default("LISTEN_ADDR", SocketAddr::from(([0, 0, 0, 0], 8080))),
        }
    }
}

fn check_webhook_path(path: String) -> anyhow::Result<String> {
    if [webhook::INVOKE_PATH, metrics::METRICS_PATH].contains(&path.as_str()) {
        bail!("WEBHOOK_PATH must not be {path}: the path is already taken")
    }
    Ok(path)
}

/// Telegram accepts 1-256 characters from `A-Z`, `a-z`, `0-9`, `_` and `-`.
fn check_secret_token(token: String) -> anyhow::Result<String> {
    let valid_chars = token.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid_chars || token.len() > SECRET_TOKEN_MAX_LENGTH {
        bail!("invalid value of the WEBHOOK_SECRET_TOKEN environment variable")
    }
    Ok(token)
}

fn ensure_starts_with_slash(s: String) -> String {
    if s.starts_with('/') {
        s
    } else {
        format!("/{s}")
    }
}
