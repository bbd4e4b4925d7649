//! Configuration file management and engine settings.

mod engine;
mod manager;

pub use engine::{
    DEFAULT_API_KEY_ENV, DEFAULT_ENDPOINT, DEFAULT_MAX_RETRIES, EngineConfig, EngineOverrides,
    resolve_engine_config,
};
pub use manager::{ChatSection, ConfigFile, ConfigManager, EngineSection};

/// Resolves the engine configuration from the process environment.
///
/// Call [`load_dotenv`] first so `.env` values are visible.
pub fn engine_config_from_env(
    overrides: &EngineOverrides,
    file: &ConfigFile,
) -> Result<EngineConfig, crate::error::ConfigError> {
    resolve_engine_config(overrides, file, |key| std::env::var(key).ok())
}

/// Loads `.env` from the working directory (or a parent), if present.
///
/// With `override_existing`, values from the file replace variables that are
/// already set; `/reload` uses this to pick up edits.
pub fn load_dotenv(override_existing: bool) {
    let result = if override_existing {
        dotenvy::dotenv_override()
    } else {
        dotenvy::dotenv()
    };

    match result {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "failed to load .env"),
    }
}
