//! XDG-style path utilities for the configuration directory.
//!
//! Paths prefer XDG Base Directory conventions over OS-specific locations,
//! so the config lives in the same place on Linux and macOS.

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR: &str = "transchat";

/// Returns the configuration directory for transchat.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/transchat` if `XDG_CONFIG_HOME` is set
/// 2. `~/.config/transchat` otherwise
pub fn config_dir() -> Result<PathBuf> {
    match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => Ok(PathBuf::from(xdg).join(APP_DIR)),
        _ => Ok(home_dir()?.join(".config").join(APP_DIR)),
    }
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().context("Failed to determine home directory")
}
