//! Config command handler for showing and initialising settings.

use anyhow::{Result, bail};
use std::path::{Path, PathBuf};

use super::catalog_path;
use crate::cli::EngineArgs;
use crate::config::{
    self, ChatSection, ConfigFile, ConfigManager, DEFAULT_API_KEY_ENV, DEFAULT_ENDPOINT,
    EngineSection,
};
use crate::translation::DEFAULT_CATALOG_PATH;
use crate::ui::Style;

/// Shows the resolved configuration, or writes a starter file with `init`.
pub fn run_configure(init: bool, languages: Option<&Path>, engine: &EngineArgs) -> Result<()> {
    let manager = ConfigManager::new()?;
    if init {
        return write_starter(&manager);
    }

    let file_config = manager.load_or_default();
    let resolved = config::engine_config_from_env(&engine.overrides(), &file_config)?;

    println!("{}", Style::header("Config file"));
    let state = if manager.exists() {
        Style::success("found")
    } else {
        Style::secondary("not found")
    };
    println!(
        "  {}  {}",
        Style::secondary(manager.config_path().display().to_string()),
        state
    );
    println!();

    println!("{}", Style::header("Engine"));
    let rows = [
        ("endpoint", resolved.endpoint.clone()),
        ("model", display(resolved.model.as_deref())),
        (
            "temperature",
            resolved
                .temperature
                .map_or_else(|| "(default)".to_string(), |t| t.to_string()),
        ),
        (
            "api key",
            format!("{} ({})", resolved.masked_api_key(), resolved.api_key_env),
        ),
        ("retries", resolved.max_retries.to_string()),
        (
            "timeouts",
            format!(
                "connect {}s, read {}s",
                resolved.connect_timeout.as_secs(),
                resolved.read_timeout.as_secs()
            ),
        ),
    ];
    for (label, value) in rows {
        println!("  {} {}", Style::label(format!("{label:12}")), Style::value(value));
    }
    println!();

    println!("{}", Style::header("Chat"));
    println!(
        "  {} {}",
        Style::label(format!("{:12}", "languages")),
        Style::value(catalog_path(languages, &file_config).display())
    );
    println!(
        "  {} {}",
        Style::label(format!("{:12}", "language")),
        Style::value(display(engine.to.as_deref().or(file_config.chat.language.as_deref())))
    );

    Ok(())
}

fn display(value: Option<&str>) -> String {
    value.unwrap_or("(not set)").to_string()
}

fn starter_config() -> ConfigFile {
    ConfigFile {
        engine: EngineSection {
            endpoint: Some(DEFAULT_ENDPOINT.to_string()),
            api_key_env: Some(DEFAULT_API_KEY_ENV.to_string()),
            max_retries: Some(config::DEFAULT_MAX_RETRIES),
            ..EngineSection::default()
        },
        chat: ChatSection {
            languages: Some(PathBuf::from(DEFAULT_CATALOG_PATH)),
            language: None,
        },
    }
}

fn write_starter(manager: &ConfigManager) -> Result<()> {
    if manager.exists() {
        bail!(
            "Config file already exists: {}\n\n\
             Edit it directly or remove it to start over.",
            manager.config_path().display()
        );
    }

    manager.save(&starter_config())?;

    crate::status!(
        "{} Configuration saved to {}",
        Style::success("✓"),
        Style::secondary(manager.config_path().display().to_string())
    );
    crate::status!(
        "{}",
        Style::hint("Set a model under [engine] or via LLM_MODEL before chatting.")
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_starter_config_round_trips_through_toml() {
        let starter = starter_config();
        let text = toml::to_string_pretty(&starter).unwrap();
        assert!(text.contains("api_key_env = \"OPENAI_API_KEY\""));
        assert!(!text.contains("api_key ="));

        let parsed: ConfigFile = toml::from_str(&text).unwrap();
        assert_eq!(parsed, starter);
    }
}
