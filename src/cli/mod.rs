//! Command-line interface definitions and handlers.

/// CLI argument parsing with clap.
pub mod args;

/// Subcommand implementations.
pub mod commands;

pub use args::{Args, Command, EngineArgs};

use crate::error::{CatalogError, CompletionError, ConfigError, TurnError};

/// Maps a command failure to a process exit code.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(e) = err.downcast_ref::<CatalogError>() {
        return match e {
            CatalogError::UnknownLanguage(_) => exitcode::USAGE,
            _ => exitcode::DATAERR,
        };
    }
    if err.downcast_ref::<ConfigError>().is_some() {
        return exitcode::CONFIG;
    }
    if err.downcast_ref::<CompletionError>().is_some() {
        return exitcode::UNAVAILABLE;
    }
    match err.downcast_ref::<TurnError>() {
        Some(TurnError::Config(_)) => exitcode::CONFIG,
        Some(TurnError::Completion(_)) => exitcode::UNAVAILABLE,
        Some(TurnError::Output(_)) => exitcode::IOERR,
        None => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_mapping() {
        let catalog = anyhow::Error::new(CatalogError::Empty);
        assert_eq!(exit_code(&catalog), exitcode::DATAERR);

        let config = anyhow::Error::new(ConfigError::MissingModel);
        assert_eq!(exit_code(&config), exitcode::CONFIG);

        let turn = anyhow::Error::new(TurnError::Completion(CompletionError::Api(
            "overloaded".to_string(),
        )));
        assert_eq!(exit_code(&turn), exitcode::UNAVAILABLE);

        let other = anyhow::anyhow!("Input is empty");
        assert_eq!(exit_code(&other), 1);
    }

    #[test]
    fn test_exit_code_sees_through_context() {
        let err = anyhow::Error::new(CatalogError::UnknownLanguage("Klingon".to_string()))
            .context("Failed to select a language");
        assert_eq!(exit_code(&err), exitcode::USAGE);
    }
}
