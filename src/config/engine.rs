//! Engine configuration: everything a completion call needs, resolved once.

use std::fmt;
use std::time::Duration;

use super::manager::ConfigFile;
use crate::error::ConfigError;
use crate::translation::SYSTEM_PROMPT_TEMPLATE;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com";
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(60);

pub const ENV_MODEL: &str = "LLM_MODEL";
pub const ENV_TEMPERATURE: &str = "MODEL_TEMPERATURE";
pub const ENV_SYSTEM_PROMPT: &str = "SYSTEM_PROMPT";
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";

/// Immutable settings for the completion client.
///
/// The credential and model stay optional here; a client cannot be
/// configured without them, but a session can still start and report the
/// problem on each turn.
#[derive(Clone, PartialEq)]
pub struct EngineConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    /// Name of the environment variable the API key is read from.
    pub api_key_env: String,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub system_template: String,
    pub max_retries: u32,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            model: None,
            temperature: None,
            system_template: SYSTEM_PROMPT_TEMPLATE.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

// Keeps the API key out of debug output and logs
impl fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.masked_api_key())
            .field("api_key_env", &self.api_key_env)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_retries", &self.max_retries)
            .field("connect_timeout", &self.connect_timeout)
            .field("read_timeout", &self.read_timeout)
            .finish_non_exhaustive()
    }
}

impl EngineConfig {
    /// The API key with all but its last four characters hidden.
    pub fn masked_api_key(&self) -> String {
        match &self.api_key {
            None => "(not set)".to_string(),
            Some(key) if key.chars().count() <= 8 => "****".to_string(),
            Some(key) => {
                let tail: String = key
                    .chars()
                    .rev()
                    .take(4)
                    .collect::<Vec<_>>()
                    .into_iter()
                    .rev()
                    .collect();
                format!("****{tail}")
            }
        }
    }
}

/// Command-line overrides; they take precedence over everything else.
#[derive(Debug, Clone, Default)]
pub struct EngineOverrides {
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
}

/// Resolves the engine configuration.
///
/// Priority (highest first): CLI overrides, environment variables, the
/// config file, built-in defaults. `env` looks up an environment variable;
/// empty values count as unset.
pub fn resolve_engine_config<E>(
    overrides: &EngineOverrides,
    file: &ConfigFile,
    env: E,
) -> Result<EngineConfig, ConfigError>
where
    E: Fn(&str) -> Option<String>,
{
    let env = |key: &str| env(key).filter(|value| !value.trim().is_empty());
    let section = &file.engine;
    let defaults = EngineConfig::default();

    let endpoint = overrides
        .endpoint
        .clone()
        .or_else(|| env(ENV_BASE_URL))
        .or_else(|| section.endpoint.clone())
        .unwrap_or(defaults.endpoint);

    let api_key_env = section
        .api_key_env
        .clone()
        .unwrap_or(defaults.api_key_env);

    let api_key = env(&api_key_env).or_else(|| section.api_key.clone());

    let model = overrides
        .model
        .clone()
        .or_else(|| env(ENV_MODEL))
        .or_else(|| section.model.clone());

    let temperature = match overrides.temperature {
        Some(t) => Some(t),
        None => match env(ENV_TEMPERATURE) {
            Some(raw) => Some(parse_temperature(ENV_TEMPERATURE, &raw)?),
            None => section.temperature,
        },
    };
    if let Some(t) = temperature {
        validate_temperature(t)?;
    }

    let system_template = env(ENV_SYSTEM_PROMPT)
        .or_else(|| section.system_prompt.clone())
        .unwrap_or(defaults.system_template);

    Ok(EngineConfig {
        endpoint,
        api_key,
        api_key_env,
        model,
        temperature,
        system_template,
        max_retries: section.max_retries.unwrap_or(defaults.max_retries),
        connect_timeout: defaults.connect_timeout,
        read_timeout: section
            .timeout_secs
            .map_or(defaults.read_timeout, Duration::from_secs),
    })
}

fn parse_temperature(key: &str, raw: &str) -> Result<f32, ConfigError> {
    raw.trim().parse::<f32>().map_err(|_| ConfigError::Invalid {
        key: key.to_string(),
        value: raw.to_string(),
    })
}

fn validate_temperature(temperature: f32) -> Result<(), ConfigError> {
    if temperature.is_finite() && (0.0..=2.0).contains(&temperature) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            key: "temperature".to_string(),
            value: temperature.to_string(),
        })
    }
}
