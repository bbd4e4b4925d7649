use futures_util::StreamExt;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::transcript::Transcript;
use crate::error::{ConfigError, TurnError};
use crate::metrics::{LatencySummary, PAGE_EXECUTION};
use crate::translation::{Completion, Prompt, build_prompt};

/// Where a session is in its request/response cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingInput,
    Streaming,
    /// The last turn failed; the next submission starts a fresh turn.
    Failed,
}

/// Per-session state: the selected language and the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    language: String,
    transcript: Transcript,
}

impl SessionContext {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            transcript: Transcript::new(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = language.into();
    }

    pub const fn transcript(&self) -> &Transcript {
        &self.transcript
    }
}

/// Result of a successful call to [`ChatSession::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// The input was blank; no turn was started.
    Skipped,
    Completed { reply: String, elapsed: Duration },
}

/// One chat session: a transcript, a target language and a completion
/// backend.
///
/// The backend slot holds the configuration error instead of a client when
/// the engine could not be configured; every turn then fails with that error
/// without touching the transcript.
pub struct ChatSession<C> {
    client: Result<C, ConfigError>,
    system_template: String,
    metrics: Arc<LatencySummary>,
    context: SessionContext,
    state: SessionState,
}

impl<C: Completion> ChatSession<C> {
    pub fn new(
        client: Result<C, ConfigError>,
        system_template: impl Into<String>,
        context: SessionContext,
        metrics: Arc<LatencySummary>,
    ) -> Self {
        Self {
            client,
            system_template: system_template.into(),
            metrics,
            context,
            state: SessionState::Idle,
        }
    }

    pub const fn state(&self) -> SessionState {
        self.state
    }

    pub const fn context(&self) -> &SessionContext {
        &self.context
    }

    pub const fn transcript(&self) -> &Transcript {
        &self.context.transcript
    }

    pub fn language(&self) -> &str {
        &self.context.language
    }

    pub fn set_language(&mut self, language: impl Into<String>) {
        self.context.set_language(language);
    }

    /// The configured backend, or the reason there is none.
    pub const fn client(&self) -> Result<&C, &ConfigError> {
        self.client.as_ref()
    }

    /// Swaps in a newly configured backend and system template.
    pub fn reconfigure(&mut self, client: Result<C, ConfigError>, system_template: String) {
        self.client = client;
        self.system_template = system_template;
    }

    /// Ends the session and hands back its context.
    pub fn into_context(self) -> SessionContext {
        self.context
    }

    /// Marks the session ready for the next submission.
    pub fn await_input(&mut self) {
        if matches!(self.state, SessionState::Idle | SessionState::Failed) {
            self.state = SessionState::AwaitingInput;
        }
    }

    /// Runs one turn.
    ///
    /// Blank input is ignored. Otherwise the input, whitespace included, is
    /// recorded as the user message before the completion starts. Each text
    /// increment is passed to `on_chunk` as it arrives; on success the full
    /// reply is recorded along with one latency observation for the whole
    /// turn. A failed turn records neither.
    pub async fn submit<F>(&mut self, input: &str, mut on_chunk: F) -> Result<TurnOutcome, TurnError>
    where
        F: FnMut(&str) -> io::Result<()>,
    {
        if input.trim().is_empty() {
            return Ok(TurnOutcome::Skipped);
        }

        self.state = SessionState::AwaitingInput;

        let client = match &self.client {
            Ok(client) => client,
            Err(e) => {
                self.state = SessionState::Failed;
                return Err(TurnError::Config(e.clone()));
            }
        };

        self.state = SessionState::Streaming;
        self.context.transcript.push_user(input);

        let started = Instant::now();
        let prompt = build_prompt(input, &self.context.language, &self.system_template);

        match collect_reply(client, &prompt, &mut on_chunk).await {
            Ok(reply) => {
                let elapsed = started.elapsed();
                self.context.transcript.push_assistant(reply.clone());
                self.metrics.observe(PAGE_EXECUTION, elapsed.as_secs_f64());
                self.state = SessionState::Idle;

                tracing::debug!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    chars = reply.chars().count(),
                    "turn completed"
                );
                Ok(TurnOutcome::Completed { reply, elapsed })
            }
            Err(e) => {
                self.state = SessionState::Failed;
                tracing::debug!(error = %e, "turn failed");
                Err(e)
            }
        }
    }
}

async fn collect_reply<C, F>(client: &C, prompt: &Prompt, on_chunk: &mut F) -> Result<String, TurnError>
where
    C: Completion,
    F: FnMut(&str) -> io::Result<()>,
{
    let mut stream = client.stream(prompt).await?;
    let mut reply = String::new();

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result?;
        on_chunk(&chunk)?;
        reply.push_str(&chunk);
    }

    Ok(reply)
}
