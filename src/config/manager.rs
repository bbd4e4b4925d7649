use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::paths;
use crate::ui::Style;

/// Completion settings in the `[engine]` section of config.toml.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineSection {
    /// The OpenAI-compatible API endpoint URL.
    pub endpoint: Option<String>,
    /// Default model name.
    pub model: Option<String>,
    /// Sampling temperature.
    pub temperature: Option<f32>,
    /// API key stored directly in config (not recommended).
    pub api_key: Option<String>,
    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,
    /// System prompt template; `{target_language}` is substituted.
    pub system_prompt: Option<String>,
    /// Extra attempts for transient request failures.
    pub max_retries: Option<u32>,
    /// Seconds to wait for the next piece of a response.
    pub timeout_secs: Option<u64>,
}

/// Chat defaults in the `[chat]` section of config.toml.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatSection {
    /// Path to the language catalog.
    pub languages: Option<PathBuf>,
    /// Language selected at start-up (display name or alias).
    pub language: Option<String>,
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/transchat/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub engine: EngineSection,
    #[serde(default)]
    pub chat: ChatSection,
}

/// Manages loading and saving configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/transchat/config.toml`
    /// or `~/.config/transchat/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_dir()?.join("config.toml"),
        })
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn exists(&self) -> bool {
        self.config_path.exists()
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile =
            toml::from_str(&contents).with_context(|| "Failed to parse config file")?;

        Ok(config_file)
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, contents).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;

        Ok(())
    }

    /// Loads the config file, falling back to defaults.
    ///
    /// A missing file is silent; a file that exists but cannot be parsed is
    /// reported as a warning.
    pub fn load_or_default(&self) -> ConfigFile {
        if !self.exists() {
            return ConfigFile::default();
        }

        self.load().unwrap_or_else(|e| {
            crate::warn!("{} {e:#}\nUsing defaults.\n", Style::warning("Warning:"));
            ConfigFile::default()
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_manager(temp_dir: &TempDir) -> ConfigManager {
        ConfigManager {
            config_path: temp_dir.path().join("config.toml"),
        }
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        let config = ConfigFile {
            engine: EngineSection {
                model: Some("gpt-4o-mini".to_string()),
                temperature: Some(0.2),
                api_key_env: Some("OPENAI_API_KEY".to_string()),
                max_retries: Some(3),
                ..EngineSection::default()
            },
            chat: ChatSection {
                languages: Some(PathBuf::from("/etc/transchat/languages.json")),
                language: Some("German".to_string()),
            },
        };

        manager.save(&config).unwrap();
        let loaded = manager.load().unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_nonexistent_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        assert!(manager.load().is_err());
        assert_eq!(manager.load_or_default(), ConfigFile::default());
    }

    #[test]
    fn test_load_partial_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        fs::write(manager.config_path(), "[engine]\nmodel = \"gpt-4o\"\n").unwrap();

        let loaded = manager.load().unwrap();

        assert_eq!(loaded.engine.model, Some("gpt-4o".to_string()));
        assert!(loaded.engine.endpoint.is_none());
        assert_eq!(loaded.chat, ChatSection::default());
    }

    #[test]
    fn test_load_or_default_with_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        fs::write(manager.config_path(), "[engine\nmodel = ").unwrap();

        assert!(manager.load().is_err());
        assert_eq!(manager.load_or_default(), ConfigFile::default());
    }
}
