use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::mail::{parse_mailbox, MailConfig};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub mail: MailConfig,
    /// Address every submission is delivered to.
    pub hr_email: String,
    pub host: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    /// Remove stored resumes once the send attempt finishes.
    pub delete_uploads_after_send: bool,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            mail: MailConfig {
                user: require_env("EMAIL_USER")?,
                password: require_env("EMAIL_PASS")?,
                host: optional_env("SMTP_HOST").unwrap_or_else(|| "smtp.gmail.com".to_string()),
                port: optional_env("SMTP_PORT")
                    .map(|v| v.parse::<u16>())
                    .transpose()
                    .context("SMTP_PORT must be a valid port number")?
                    .unwrap_or(465),
            },
            hr_email: recipient_address(require_env("HR_EMAIL")?)?,
            host: optional_env("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: optional_env("PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            upload_dir: optional_env("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("uploads")),
            delete_uploads_after_send: optional_env("DELETE_UPLOADS_AFTER_SEND")
                .map(|v| parse_flag(&v))
                .transpose()?
                .unwrap_or(false),
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Rejects a recipient that could never be delivered to, so a typo fails
/// startup instead of every submission.
fn recipient_address(value: String) -> Result<String> {
    parse_mailbox(&value)
        .with_context(|| format!("HR_EMAIL '{value}' is not a valid email address"))?;
    Ok(value.trim().to_string())
}

/// Unset and empty variables are treated the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("Expected a boolean flag, got '{other}'"),
    }
}
