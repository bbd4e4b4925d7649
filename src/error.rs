//! Error types shared across the catalog, configuration, completion and
//! session layers.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors raised while loading or querying the language catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("Failed to read language file: {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The catalog file is not a JSON object of name to alias strings.
    #[error("Language file {} is not a valid name-to-alias map", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The requested display name is not in the catalog.
    #[error("Unknown language: '{0}'\n\nRun 'transchat languages' to see the available languages.")]
    UnknownLanguage(String),
    /// The catalog has no entries, so there is nothing to select.
    #[error("The language catalog is empty")]
    Empty,
}

impl CatalogError {
    /// Returns `true` for errors caused by a missing or malformed catalog file.
    pub const fn is_data_format(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::Format { .. })
    }
}

/// Errors raised when the engine configuration is incomplete or invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error(
        "Missing API key\n\n\
         Set the {env_var} environment variable (or add it to .env):\n  \
         export {env_var}=\"your-api-key\""
    )]
    MissingApiKey { env_var: String },
    #[error(
        "Missing required configuration: 'model'\n\n\
         Please provide it via:\n  \
         - CLI option: --model <name>\n  \
         - Environment: LLM_MODEL\n  \
         - Config file: [engine] model in ~/.config/transchat/config.toml"
    )]
    MissingModel,
    #[error("Invalid value for {key}: '{value}'")]
    Invalid { key: String, value: String },
}

/// Errors raised by a completion call after retries have been applied.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Failed to connect to API endpoint: {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("API request failed with status {status}: {body}")]
    Status {
        status: u16,
        body: String,
        /// Server-requested delay before the next attempt.
        retry_after: Option<Duration>,
    },
    #[error("API returned an error: {0}")]
    Api(String),
    #[error("Stream error: {0}")]
    Stream(String),
    #[error("Malformed response: {0}")]
    Malformed(String),
    #[error("Giving up after {attempts} attempts")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<CompletionError>,
    },
}

impl CompletionError {
    /// Returns `true` if the failure is worth another attempt.
    ///
    /// Connection failures, timeouts and the statuses OpenAI-compatible
    /// servers use for overload (408, 409, 429, 5xx) are transient.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport { source, .. } => source.is_connect() || source.is_timeout(),
            Self::Status { status, .. } => matches!(status, 408 | 409 | 429 | 500..=599),
            Self::Api(_) | Self::Stream(_) | Self::Malformed(_) | Self::RetriesExhausted { .. } => {
                false
            }
        }
    }

    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Status { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// Why a single turn of a chat session failed.
///
/// A turn error never ends the session; the transcript history before the
/// failed turn is left intact.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Completion(#[from] CompletionError),
    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
}
