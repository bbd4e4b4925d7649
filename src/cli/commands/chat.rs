use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

use super::{catalog_path, select_language};
use crate::chat::Repl;
use crate::cli::EngineArgs;
use crate::config::{self, ConfigManager};
use crate::metrics::LatencySummary;
use crate::translation::LanguageCatalog;

pub struct ChatOptions {
    pub languages: Option<PathBuf>,
    pub engine: EngineArgs,
}

pub async fn run_chat(options: ChatOptions) -> Result<()> {
    let file_config = ConfigManager::new()?.load_or_default();

    let catalog = LanguageCatalog::load(catalog_path(options.languages.as_deref(), &file_config))?;
    let language = select_language(&catalog, options.engine.to.as_deref(), &file_config)?.to_string();

    let overrides = options.engine.overrides();
    let engine = config::engine_config_from_env(&overrides, &file_config)?;

    let mut repl = Repl::new(
        Arc::new(catalog),
        language,
        engine,
        overrides,
        Arc::new(LatencySummary::new()),
    );
    repl.run().await
}
