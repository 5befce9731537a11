//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc};

use serde::Deserialize;

use super::types::Res;

/// Default database endpoint: an on-disk SurrealKV store next to the binary.
fn default_db_endpoint() -> String {
    "surrealkv://pr_bot.db".to_string()
}

/// Default database namespace.
fn default_db_namespace() -> String {
    "pr_bot".to_string()
}

/// Default database name.
fn default_db_database() -> String {
    "community".to_string()
}

/// Default role a member must hold to register.
fn default_registration_role() -> String {
    "FMF Paid Access".to_string()
}

/// Configuration for the pr-bot application.
#[derive(Debug, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConfigInner {
    /// Slack app token (`SLACK_APP_TOKEN`).
    pub slack_app_token: String,
    /// Slack bot token (`SLACK_BOT_TOKEN`).
    pub slack_bot_token: String,
    /// Database endpoint URL (`DB_ENDPOINT`).
    /// `surrealkv://<path>` for a durable store, `mem://` for a throwaway one.
    #[serde(default = "default_db_endpoint")]
    pub db_endpoint: String,
    /// Database namespace (`DB_NAMESPACE`).
    #[serde(default = "default_db_namespace")]
    pub db_namespace: String,
    /// Database name (`DB_DATABASE`).
    #[serde(default = "default_db_database")]
    pub db_database: String,
    /// Role label (Slack user group name or handle) required to register (`REGISTRATION_ROLE`).
    #[serde(default = "default_registration_role")]
    pub registration_role: String,
}

impl Config {
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(config::Environment::default().prefix("PR_BOT"));

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        result.validate()?;

        Ok(result)
    }

    fn validate(&self) -> Res<()> {
        if self.slack_app_token.is_empty() || self.slack_bot_token.is_empty() {
            return Err(anyhow::anyhow!("Slack app and bot tokens must be set."));
        }

        if self.db_endpoint.is_empty() {
            return Err(anyhow::anyhow!("Database endpoint must not be empty."));
        }

        if self.registration_role.trim().is_empty() {
            return Err(anyhow::anyhow!("Registration role must not be empty."));
        }

        Ok(())
    }
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    fn config(inner: ConfigInner) -> Config {
        Config { inner: Arc::new(inner) }
    }

    #[test]
    fn file_values_and_defaults_are_applied() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "slack_app_token = \"xapp-test\"\nslack_bot_token = \"xoxb-test\"\nregistration_role = \"Members\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();

        assert_eq!(config.slack_app_token, "xapp-test");
        assert_eq!(config.registration_role, "Members");
        assert_eq!(config.db_endpoint, "surrealkv://pr_bot.db");
        assert_eq!(config.db_namespace, "pr_bot");
        assert_eq!(config.db_database, "community");
    }

    #[test]
    fn missing_tokens_are_rejected() {
        let result = config(ConfigInner {
            slack_app_token: "xapp-test".to_string(),
            db_endpoint: default_db_endpoint(),
            registration_role: default_registration_role(),
            ..Default::default()
        })
        .validate();

        assert!(result.is_err());
    }

    #[test]
    fn blank_role_is_rejected() {
        let result = config(ConfigInner {
            slack_app_token: "xapp-test".to_string(),
            slack_bot_token: "xoxb-test".to_string(),
            db_endpoint: default_db_endpoint(),
            registration_role: "  ".to_string(),
            ..Default::default()
        })
        .validate();

        assert!(result.is_err());
    }
}
