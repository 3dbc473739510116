use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::model::Credential;

pub const DEFAULT_AUTH_URL: &str = "https://api.jellyfaas.com/auth-service/v1/validate";
pub const DEFAULT_QUERY_URL: &str = "https://ai.jellyfaas.com/query-service/v1/function";
pub const DEFAULT_FUNCTION: &str = "weathercompare";

pub const API_KEY_ENV: &str = "JELLYFAAS_API_KEY";
pub const AUTH_URL_ENV: &str = "JELLYFAAS_AUTH_URL";
pub const QUERY_URL_ENV: &str = "JELLYFAAS_QUERY_URL";

/// Where the JellyFaaS services live and which function to call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub auth_url: String,
    pub query_url: String,
    pub function: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            auth_url: DEFAULT_AUTH_URL.to_string(),
            query_url: DEFAULT_QUERY_URL.to_string(),
            function: DEFAULT_FUNCTION.to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
///
/// [endpoints]
/// auth_url = "https://api.jellyfaas.com/auth-service/v1/validate"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub endpoints: Endpoints,
}

impl Config {
    /// Load config from the platform config dir, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = Self::load_from(&path)?;
        cfg.apply_overrides(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    /// Load config from `path`, or return an empty default if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "jellyfaas", "weather-compare")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Overlay values from the environment. `lookup` is `std::env::var` outside tests.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(API_KEY_ENV) {
            self.api_key = Some(key);
        }
        if let Some(url) = non_empty(AUTH_URL_ENV) {
            self.endpoints.auth_url = url;
        }
        if let Some(url) = non_empty(QUERY_URL_ENV) {
            self.endpoints.query_url = url;
        }
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// The credential used to authenticate, if one is configured.
    pub fn credential(&self) -> Result<Credential> {
        self.api_key
            .as_deref()
            .and_then(Credential::new)
            .ok_or_else(|| {
                anyhow!(
                    "No JellyFaaS API key configured.\n\
                     Hint: run `weather-compare configure` or set {API_KEY_ENV}."
                )
            })
    }
}
