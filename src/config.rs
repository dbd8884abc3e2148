//! Process configuration
//!
//! Built once at startup from an optional TOML file and the environment,
//! then passed by reference to the transport.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::error::{Result, SyncError};

pub const DEFAULT_API_URL: &str = "https://neocities.org/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const ENV_USER: &str = "NEOCITIES_USER";
pub const ENV_PASS: &str = "NEOCITIES_PASS";
pub const ENV_API_KEY: &str = "NEOCITIES_API_KEY";
pub const ENV_API_URL: &str = "NEOCITIES_API_URL";

/// On-disk shape; every field optional
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub user: Option<String>,
    pub password: Option<String>,
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
    ApiKey(String),
    Basic { user: String, password: String },
    Anonymous,
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print secrets
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey(..)"),
            Self::Basic { user, .. } => write!(f, "Basic({user})"),
            Self::Anonymous => f.write_str("Anonymous"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub auth: Auth,
    pub api_url: String,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auth: Auth::Anonymous,
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// File (if any) overlaid by the process environment
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let base = match file {
            Some(p) => read_config_file(p)?,
            None => ConfigFile::default(),
        };
        let env: HashMap<String, String> = std::env::vars().collect();
        Ok(Self::resolve(base, &env))
    }

    /// Merge a parsed file with environment values; environment wins
    pub fn resolve(file: ConfigFile, env: &HashMap<String, String>) -> Self {
        let pick = |key: &str, fallback: Option<String>| {
            env.get(key)
                .filter(|v| !v.is_empty())
                .cloned()
                .or(fallback.filter(|v| !v.is_empty()))
        };
        let user = pick(ENV_USER, file.user);
        let password = pick(ENV_PASS, file.password);
        let api_key = pick(ENV_API_KEY, file.api_key);
        let api_url = pick(ENV_API_URL, file.api_url).unwrap_or_else(|| DEFAULT_API_URL.into());

        let auth = match (api_key, user, password) {
            (Some(key), _, _) => Auth::ApiKey(key),
            (None, Some(user), Some(password)) => Auth::Basic { user, password },
            _ => Auth::Anonymous,
        };

        Self {
            auth,
            api_url: api_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        }
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let data = std::fs::read_to_string(path).map_err(|e| SyncError::filesystem(path, e))?;
    toml::from_str(&data).map_err(|e| SyncError::Config(format!("{}: {}", path.display(), e)))
}
