use anyhow::Result;
use std::path::Path;

use super::catalog_path;
use crate::config::ConfigManager;
use crate::translation::{LanguageCatalog, print_languages};

pub fn run_languages(languages: Option<&Path>) -> Result<()> {
    let file_config = ConfigManager::new()?.load_or_default();
    let catalog = LanguageCatalog::load(catalog_path(languages, &file_config))?;
    print_languages(&catalog);
    Ok(())
}
