use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default location of the configuration file, next to the binary's
/// working directory.
pub const DEFAULT_CONFIG_PATH: &str = "room-scout.toml";

const CONFIG_TEMPLATE: &str = r#"# room-scout configuration.
# Fill in every value, then run again.

# API key for the text-extraction service.
openai_api_key = ""

# URL of the group feed page to watch.
group_url = ""

# Webhook URL that receives the notification payloads.
webhook_url = ""

# Session cookies granting the browser access to the group feed.
session_cookie = ""
c_user_cookie = ""

# Where processed-ad fingerprints are stored (created if absent).
#seen_log_path = "seen_ads.log"
"#;

/// Settings consumed by the scout. Secrets live here rather than in the
/// environment because the session cookies have to be rotated by hand.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub openai_api_key: String,
    pub group_url: String,
    pub webhook_url: String,
    pub session_cookie: String,
    pub c_user_cookie: String,
    #[serde(default = "default_seen_log_path")]
    pub seen_log_path: PathBuf,
}

fn default_seen_log_path() -> PathBuf {
    PathBuf::from("seen_ads.log")
}

#[derive(Debug, Error)]
pub enum ConfigError {
    /// First run: the file did not exist, a template was scaffolded in its
    /// place. The caller reports instructions and exits non-zero.
    #[error("no configuration file at {path}; a template has been written there", path = .path.display())]
    Missing { path: PathBuf },

    #[error("configuration file {path}: {source}", path = .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid configuration in {path}: {reason}", path = .path.display())]
    Invalid { path: PathBuf, reason: String },
}

impl Config {
    /// Load the configuration, scaffolding a template on first run.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            std::fs::write(path, CONFIG_TEMPLATE).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            return Err(ConfigError::Missing {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Config = toml::from_str(&content).map_err(|err| ConfigError::Invalid {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

        config.validate(path)?;
        Ok(config)
    }

    /// A template left unfilled is configuration corruption, not first-run.
    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let required = [
            ("openai_api_key", &self.openai_api_key),
            ("group_url", &self.group_url),
            ("webhook_url", &self.webhook_url),
            ("session_cookie", &self.session_cookie),
            ("c_user_cookie", &self.c_user_cookie),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    path: path.to_path_buf(),
                    reason: format!("{name} is empty"),
                });
            }
        }
        Ok(())
    }
}
