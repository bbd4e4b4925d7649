//! Subcommand implementations.

use std::path::{Path, PathBuf};

use crate::config::ConfigFile;
use crate::error::CatalogError;
use crate::translation::{DEFAULT_CATALOG_PATH, LanguageCatalog};

/// Chat mode command handler.
pub mod chat;

/// Config command handler.
pub mod configure;

/// Language listing command handler.
pub mod languages;

/// One-shot translation command handler.
pub mod translate;

/// Catalog location: the `--languages` flag, then `[chat] languages`, then the default.
pub fn catalog_path(cli: Option<&Path>, file: &ConfigFile) -> PathBuf {
    cli.map(Path::to_path_buf)
        .or_else(|| file.chat.languages.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH))
}

/// Target language: `--to`, then `[chat] language`, then the catalog's first entry.
pub fn select_language<'a>(
    catalog: &'a LanguageCatalog,
    requested: Option<&str>,
    file: &ConfigFile,
) -> Result<&'a str, CatalogError> {
    match requested.or(file.chat.language.as_deref()) {
        Some(language) => catalog.resolve(language),
        None => catalog.default_language(),
    }
}
