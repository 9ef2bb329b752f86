// src/environment.rs
use crate::utils::trim_base_url;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub const CONFIG_FILE: &str = "config.yaml";

pub const API_URL_ENV: &str = "JOB_PORTAL_API_URL";
pub const AI_URL_ENV: &str = "JOB_PORTAL_AI_URL";
pub const REALTIME_URL_ENV: &str = "JOB_PORTAL_REALTIME_URL";
pub const REALTIME_ENABLED_ENV: &str = "JOB_PORTAL_REALTIME_ENABLED";
pub const TIMEOUT_ENV: &str = "JOB_PORTAL_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Connection settings for both backends and the realtime hub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub primary_api_url: String,
    /// Falls back to `primary_api_url` when left empty.
    pub ai_api_url: String,
    pub realtime_url: Option<String>,
    pub realtime_enabled: bool,
    pub timeout_seconds: u64,
    pub with_credentials: bool,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            primary_api_url: String::new(),
            ai_api_url: String::new(),
            realtime_url: None,
            realtime_enabled: false,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            with_credentials: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: Option<EnvironmentConfig>,
    #[serde(default)]
    production: Option<EnvironmentConfig>,
}

impl EnvironmentConfig {
    /// Load configuration based on environment
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);
        Self::load_from(Path::new(CONFIG_FILE), &environment)
    }

    /// Read `path` when it exists, apply process environment overrides, then validate.
    pub fn load_from(path: &Path, environment: &str) -> Result<Self> {
        let mut config = Self::read_section(path, environment)?;
        config.apply_env_overrides()?;
        config.finalize()
    }

    fn get_environment() -> String {
        std::env::var("JOB_PORTAL_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .or_else(|_| std::env::var("ENV"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn read_section(path: &Path, environment: &str) -> Result<Self> {
        if !path.exists() {
            info!("{} not found, using environment variables only", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file: ConfigFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        let section = match environment {
            "production" => file.production,
            _ => file.local,
        };
        Ok(section.unwrap_or_default())
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup. Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(API_URL_ENV) {
            self.primary_api_url = url;
        }
        if let Some(url) = get(AI_URL_ENV) {
            self.ai_api_url = url;
        }
        if let Some(url) = get(REALTIME_URL_ENV) {
            self.realtime_url = Some(url);
        }
        if let Some(flag) = get(REALTIME_ENABLED_ENV) {
            self.realtime_enabled = parse_flag(&flag)
                .with_context(|| format!("Invalid {}", REALTIME_ENABLED_ENV))?;
        }
        if let Some(secs) = get(TIMEOUT_ENV) {
            self.timeout_seconds = secs
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}: {}", TIMEOUT_ENV, secs))?;
        }
        Ok(())
    }

    /// Trim base URLs, fill the AI fallback and reject a missing primary URL.
    pub fn finalize(mut self) -> Result<Self> {
        self.primary_api_url = trim_base_url(&self.primary_api_url);
        if self.primary_api_url.is_empty() {
            anyhow::bail!(
                "Primary API base URL is not configured. Set {} or primary_api_url in {}.",
                API_URL_ENV,
                CONFIG_FILE
            );
        }

        self.ai_api_url = trim_base_url(&self.ai_api_url);
        if self.ai_api_url.is_empty() {
            self.ai_api_url = self.primary_api_url.clone();
        }

        self.realtime_url = self
            .realtime_url
            .as_deref()
            .map(trim_base_url)
            .filter(|url| !url.is_empty());
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("expected a boolean, got {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const YAML: &str = r#"
local:
  primary_api_url: "http://localhost:5000/api/"
  realtime_url: "http://localhost:5000/hubs/notifications"
  realtime_enabled: true
production:
  primary_api_url: "https://api.jobs.test"
  ai_api_url: "https://ai.jobs.test/"
  timeout_seconds: 45
"#;

    #[test]
    fn test_read_section_by_environment() {
        let file = write_config(YAML);

        let local = EnvironmentConfig::read_section(file.path(), "local")
            .unwrap()
            .finalize()
            .unwrap();
        assert_eq!(local.primary_api_url, "http://localhost:5000/api");
        assert_eq!(local.ai_api_url, "http://localhost:5000/api");
        assert!(local.realtime_enabled);
        assert_eq!(local.timeout_seconds, 20);
        assert!(local.with_credentials);

        let prod = EnvironmentConfig::read_section(file.path(), "production")
            .unwrap()
            .finalize()
            .unwrap();
        assert_eq!(prod.ai_api_url, "https://ai.jobs.test");
        assert_eq!(prod.timeout(), Duration::from_secs(45));
        assert!(prod.realtime_url.is_none());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            EnvironmentConfig::read_section(&dir.path().join("config.yaml"), "local").unwrap();
        assert_eq!(config, EnvironmentConfig::default());
    }

    #[test]
    fn test_overrides_win_over_file() {
        let file = write_config(YAML);
        let mut config = EnvironmentConfig::read_section(file.path(), "local").unwrap();
        config
            .apply_overrides(lookup(&[
                (API_URL_ENV, "https://override.test/"),
                (AI_URL_ENV, "https://ai.override.test"),
                (REALTIME_ENABLED_ENV, "false"),
                (TIMEOUT_ENV, "5"),
            ]))
            .unwrap();
        let config = config.finalize().unwrap();
        assert_eq!(config.primary_api_url, "https://override.test");
        assert_eq!(config.ai_api_url, "https://ai.override.test");
        assert!(!config.realtime_enabled);
        assert_eq!(config.timeout_seconds, 5);
    }

    #[test]
    fn test_invalid_override_is_an_error() {
        let mut config = EnvironmentConfig::default();
        assert!(config
            .apply_overrides(lookup(&[(TIMEOUT_ENV, "soon")]))
            .is_err());
        assert!(config
            .apply_overrides(lookup(&[(REALTIME_ENABLED_ENV, "maybe")]))
            .is_err());
    }

    #[test]
    fn test_missing_primary_url_fails() {
        let err = EnvironmentConfig::default().finalize().unwrap_err();
        assert!(err.to_string().contains(API_URL_ENV));
    }
}
