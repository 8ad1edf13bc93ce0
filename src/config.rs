//! Configuration management for toolhub.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::provider::gemini;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub blog: BlogConfig,
    #[serde(default)]
    pub contact: ContactConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub api_base: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_model() -> String {
    gemini::DEFAULT_MODEL.to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base: None,
            api_key: None,
            api_key_env: default_api_key_env(),
        }
    }
}

/// Identity provider connection. Both fields empty means the gate can never
/// authenticate, which keeps the tools view locked but hurts nothing else.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub anon_key: Option<String>,
}

/// Screen-view tracking. Absence disables tracking only.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnalyticsConfig {
    #[serde(default)]
    pub measurement_id: Option<String>,
    #[serde(default)]
    pub api_secret: Option<String>,
}

/// Blog platform credentials. Absence degrades the blog view to a notice.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BlogConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub blog_id: Option<String>,
}

/// Contact relay. Absence degrades the contact view to a notice.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ContactConfig {
    #[serde(default)]
    pub relay_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// "dark" or "light"; the persisted preference wins over this at start.
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_theme() -> String {
    "dark".to_string()
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
        }
    }
}

impl AppConfig {
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".toolhub").join("config.toml"))
    }

    /// Load from `path` (or the default location), then apply env overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path).with_context(|| {
                format!("Failed to read config file: {}", config_path.display())
            })?;
            toml::from_str(&content).with_context(|| {
                format!("Failed to parse config file: {}", config_path.display())
            })?
        } else {
            Self::default()
        };

        if let Ok(model) = std::env::var("TOOLHUB_MODEL") {
            config.gemini.model = model;
        }
        if let Ok(api_base) = std::env::var("TOOLHUB_API_BASE") {
            config.gemini.api_base = Some(api_base);
        }
        if let Ok(auth_base) = std::env::var("TOOLHUB_AUTH_URL") {
            config.auth.base_url = Some(auth_base);
        }

        Ok(config)
    }

    /// Resolve the provider credential: config value first, then the
    /// configured environment variable. `None` is a recoverable condition —
    /// dispatch short-circuits with a fixed message instead of failing.
    pub fn gemini_api_key(&self) -> Option<String> {
        if let Some(key) = &self.gemini.api_key {
            if !key.is_empty() {
                return Some(key.clone());
            }
        }
        std::env::var(&self.gemini.api_key_env)
            .ok()
            .filter(|k| !k.is_empty())
    }

    pub fn save_default() -> Result<PathBuf> {
        let config_path = Self::config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let default = Self::default();
        let content = toml::to_string_pretty(&default).context("Failed to serialize config")?;
        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;
        Ok(config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.gemini.model, gemini::DEFAULT_MODEL);
        assert_eq!(config.gemini.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.ui.theme, "dark");
        assert!(config.blog.api_key.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[gemini]
model = "gemini-exp"
api_key = "secret"

[blog]
api_key = "bk"
blog_id = "42"
"#
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.gemini.model, "gemini-exp");
        assert_eq!(config.gemini_api_key(), Some("secret".to_string()));
        assert_eq!(config.blog.blog_id.as_deref(), Some("42"));
        // Unset sections fall back to defaults.
        assert!(config.contact.relay_url.is_none());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let config = AppConfig::load(Some(missing.as_path())).unwrap();
        assert_eq!(config.gemini.model, gemini::DEFAULT_MODEL);
    }

    #[test]
    fn test_empty_config_key_is_treated_as_absent() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[gemini]
api_key = ""
api_key_env = "TOOLHUB_TEST_KEY_THAT_IS_UNSET"
"#
        )
        .unwrap();
        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.gemini_api_key(), None);
    }

    #[test]
    fn test_roundtrip_serialization() {
        let config = AppConfig::default();
        let toml_text = toml::to_string_pretty(&config).unwrap();
        let back: AppConfig = toml::from_str(&toml_text).unwrap();
        assert_eq!(back.gemini.model, config.gemini.model);
    }
}
