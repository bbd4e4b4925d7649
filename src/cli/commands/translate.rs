use anyhow::{Result, bail};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use super::{catalog_path, select_language};
use crate::chat::{ChatSession, SessionContext, TurnOutcome};
use crate::cli::EngineArgs;
use crate::config::{self, ConfigManager};
use crate::input::InputReader;
use crate::metrics::LatencySummary;
use crate::translation::{CompletionClient, LanguageCatalog};
use crate::ui::Spinner;

pub struct TranslateOptions {
    pub file: Option<PathBuf>,
    pub languages: Option<PathBuf>,
    pub engine: EngineArgs,
}

/// Translates a file or stdin in a single turn, streaming the result to stdout.
pub async fn run_translate(options: TranslateOptions) -> Result<()> {
    let file_config = ConfigManager::new()?.load_or_default();

    let catalog = LanguageCatalog::load(catalog_path(options.languages.as_deref(), &file_config))?;
    let language = select_language(&catalog, options.engine.to.as_deref(), &file_config)?;

    let source_text = InputReader::read(options.file.as_deref())?;
    if source_text.trim().is_empty() {
        bail!("Input is empty");
    }

    let engine = config::engine_config_from_env(&options.engine.overrides(), &file_config)?;
    let client = CompletionClient::configure(&engine)?;
    tracing::debug!(model = client.model(), url = client.url(), %language, "translating");

    let mut session = ChatSession::new(
        Ok(client),
        engine.system_template,
        SessionContext::new(language),
        Arc::new(LatencySummary::new()),
    );

    let spinner = Spinner::new("Translating...");
    let mut first_chunk = true;

    let outcome = session
        .submit(&source_text, |chunk| {
            if first_chunk {
                spinner.stop();
                first_chunk = false;
            }
            let mut stdout = io::stdout().lock();
            stdout.write_all(chunk.as_bytes())?;
            stdout.flush()
        })
        .await;

    spinner.stop();

    if let TurnOutcome::Completed { reply, elapsed } = outcome? {
        if !reply.ends_with('\n') {
            println!();
        }
        tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "translation finished");
    }

    Ok(())
}
