use anyhow::Result;
use inquire::ui::{Attributes, Color, RenderConfig, StyleSheet, Styled};
use inquire::{InquireError, Select, Text};
use std::io::{self, Write};
use std::sync::Arc;

use super::command::{Input, SlashCommand, SlashCommandCompleter, parse_input};
use super::session::{ChatSession, SessionContext, TurnOutcome};
use super::ui;
use crate::config::{self, ConfigManager, EngineConfig, EngineOverrides};
use crate::metrics::{LatencySummary, PAGE_EXECUTION};
use crate::translation::{CompletionClient, LanguageCatalog};
use crate::ui::{Spinner, Style, handle_prompt_cancellation};

fn render_config() -> RenderConfig<'static> {
    let prompt_style = Styled::new("❯")
        .with_fg(Color::LightBlue)
        .with_attr(Attributes::BOLD);
    let mut render_config = RenderConfig::default()
        .with_prompt_prefix(prompt_style)
        .with_answered_prompt_prefix(prompt_style);

    render_config.placeholder = StyleSheet::new().with_fg(Color::DarkGrey);
    render_config.option = StyleSheet::new().with_fg(Color::Grey);
    render_config.selected_option = Some(StyleSheet::new().with_fg(Color::DarkMagenta));
    render_config
}

/// The interactive translation loop.
pub struct Repl {
    session: ChatSession<CompletionClient>,
    catalog: Arc<LanguageCatalog>,
    metrics: Arc<LatencySummary>,
    engine: EngineConfig,
    overrides: EngineOverrides,
}

impl Repl {
    /// Creates the loop for `language`.
    ///
    /// An engine that cannot be turned into a client (for example a missing
    /// API key) does not prevent start-up; each turn reports the problem
    /// until `/reload` fixes it.
    pub fn new(
        catalog: Arc<LanguageCatalog>,
        language: impl Into<String>,
        engine: EngineConfig,
        overrides: EngineOverrides,
        metrics: Arc<LatencySummary>,
    ) -> Self {
        let client = CompletionClient::configure(&engine);
        if let Err(e) = &client {
            crate::warn!("{} {e}", Style::warning("Warning:"));
        }

        let session = ChatSession::new(
            client,
            engine.system_template.clone(),
            SessionContext::new(language),
            Arc::clone(&metrics),
        );

        Self {
            session,
            catalog,
            metrics,
            engine,
            overrides,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        ui::print_header();
        self.print_language();
        if !self.session.transcript().is_empty() {
            ui::print_history(self.session.transcript());
        }

        loop {
            self.session.await_input();
            let placeholder = ui::placeholder(self.session.language());

            let line = Text::new("")
                .with_render_config(render_config())
                .with_autocomplete(SlashCommandCompleter)
                .with_placeholder(&placeholder)
                .with_help_message("Type /help for commands")
                .prompt();

            let line = match line {
                Ok(line) => line,
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                    ui::print_goodbye();
                    break;
                }
                Err(e) => return Err(e.into()),
            };

            match parse_input(&line) {
                Input::Empty => {}
                Input::Command(SlashCommand::Quit) => {
                    ui::print_goodbye();
                    break;
                }
                Input::Command(command) => self.handle_command(command)?,
                Input::Text(text) => self.translate_and_print(&text).await,
            }
        }

        Ok(())
    }

    fn handle_command(&mut self, command: SlashCommand) -> Result<()> {
        match command {
            SlashCommand::Config => ui::print_config(&self.engine, self.session.language()),
            SlashCommand::Help => ui::print_help(),
            SlashCommand::History => ui::print_history(self.session.transcript()),
            SlashCommand::Language(None) => {
                handle_prompt_cancellation(|| self.select_language())?;
            }
            SlashCommand::Language(Some(name)) => self.change_language(&name),
            SlashCommand::Reload => self.reload(),
            SlashCommand::Stats => {
                ui::print_stats(&self.metrics.get(PAGE_EXECUTION));
                tracing::debug!(metrics = %self.metrics.render(), "latency summary");
            }
            SlashCommand::Quit => {}
            SlashCommand::Unknown(cmd) => {
                ui::print_error(&format!("Unknown command: /{cmd}"));
                ui::print_help();
            }
        }
        Ok(())
    }

    fn select_language(&mut self) -> Result<()> {
        let names = self.catalog.names();
        let cursor = names
            .iter()
            .position(|name| *name == self.session.language())
            .unwrap_or(0);

        let selected = Select::new("Translate to:", names)
            .with_render_config(render_config())
            .with_starting_cursor(cursor)
            .prompt()?
            .to_string();

        self.session.set_language(selected);
        self.print_language();
        Ok(())
    }

    fn change_language(&mut self, requested: &str) {
        match self.catalog.resolve(requested) {
            Ok(name) => {
                self.session.set_language(name);
                self.print_language();
            }
            Err(e) => ui::print_error(&e.to_string()),
        }
    }

    fn print_language(&self) {
        let language = self.session.language();
        let alias = self.catalog.alias_of(language).unwrap_or("?");
        ui::print_language(language, alias);
    }

    /// Re-reads `.env`, the environment and the config file, then swaps the client.
    fn reload(&mut self) {
        config::load_dotenv(true);

        let file_config = match ConfigManager::new() {
            Ok(manager) => manager.load_or_default(),
            Err(e) => {
                ui::print_error(&format!("{e:#}"));
                return;
            }
        };

        let engine = match config::engine_config_from_env(&self.overrides, &file_config) {
            Ok(engine) => engine,
            Err(e) => {
                self.session
                    .reconfigure(Err(e.clone()), self.engine.system_template.clone());
                ui::print_error(&e.to_string());
                return;
            }
        };

        let client = CompletionClient::configure(&engine);
        let template = engine.system_template.clone();
        self.engine = engine;

        match &client {
            Ok(_) => println!("{}\n", Style::success("Configuration reloaded.")),
            Err(e) => ui::print_error(&e.to_string()),
        }
        self.session.reconfigure(client, template);
    }

    async fn translate_and_print(&mut self, text: &str) {
        let spinner = Spinner::new("Translating...");
        let mut printed = false;

        let result = self
            .session
            .submit(text, |chunk| {
                if !printed {
                    spinner.stop();
                    printed = true;
                }
                let mut stdout = io::stdout().lock();
                stdout.write_all(chunk.as_bytes())?;
                stdout.flush()
            })
            .await;

        spinner.stop();

        match result {
            Ok(TurnOutcome::Completed { .. }) => {
                println!();
                println!();
            }
            Ok(TurnOutcome::Skipped) => {}
            Err(e) => {
                if printed {
                    println!();
                }
                ui::print_error(&format!("{:#}", anyhow::Error::new(e)));
            }
        }
    }
}
