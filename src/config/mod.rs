//! Configuration loading and management
//!
//! Everything an installation tunes lives in one YAML file: the business
//! name printed on order documents, the SMTP account notifications go out
//! through, which notifications are wanted at all, and the login timeout.

use crate::core::error::{ConfigError, OficinaResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outgoing mail account used by notification senders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// SMTP server host
    pub server: String,

    /// SMTP port (587 for STARTTLS)
    pub port: u16,

    /// Account the mails are sent from
    pub username: String,

    /// Account password; absent means "prompt or use the keychain"
    #[serde(default)]
    pub password: Option<String>,

    /// Whether to negotiate TLS
    pub use_tls: bool,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            server: "smtp.gmail.com".to_string(),
            port: 587,
            username: "contato@roboticasustentavel.com".to_string(),
            password: None,
            use_tls: true,
        }
    }
}

/// Which events are worth a notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    /// An order moved to a different status
    pub status_change: bool,

    /// A new order was taken in
    pub new_order: bool,

    /// An order was completed
    pub order_completed: bool,

    /// A quoted budget is waiting on the customer
    pub budget_reminder: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            status_change: true,
            new_order: true,
            order_completed: true,
            budget_reminder: false,
        }
    }
}

/// Session gate tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Bound on the credential check, in milliseconds
    pub login_timeout_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            login_timeout_ms: 10_000,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Business name shown on printed order documents
    #[serde(default = "default_business_name")]
    pub business_name: String,

    #[serde(default)]
    pub smtp: SmtpConfig,

    #[serde(default)]
    pub notifications: NotificationSettings,

    #[serde(default)]
    pub session: SessionConfig,
}

fn default_business_name() -> String {
    "Robótica Sustentável".to_string()
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> OficinaResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound {
                    path: path.to_string(),
                }
            } else {
                ConfigError::IoError {
                    message: e.to_string(),
                }
            }
        })?;

        serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                file: Some(path.to_string()),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> OficinaResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// The stock configuration a fresh install starts from
    pub fn default_config() -> Self {
        Self {
            business_name: default_business_name(),
            smtp: SmtpConfig::default(),
            notifications: NotificationSettings::default(),
            session: SessionConfig::default(),
        }
    }

    /// The login timeout as a `Duration`
    pub fn login_timeout(&self) -> Duration {
        Duration::from_millis(self.session.login_timeout_ms)
    }
}
