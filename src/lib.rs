//! # transchat - Interactive Translation Chat
//!
//! `transchat` is a terminal chat for translating text with an
//! OpenAI-compatible chat-completion API. Each turn sends the user's text and
//! the selected target language, and the reply streams back as it arrives.
//! Text inside `[square brackets]` is kept untranslated.
//!
//! ## Quick Start
//!
//! ```bash
//! export OPENAI_API_KEY=sk-...
//! export LLM_MODEL=gpt-4o-mini
//!
//! # Interactive session, translating to French
//! transchat -t French
//!
//! # One-shot translation from stdin
//! echo "Hello [Bob]" | transchat translate -t de
//!
//! # List the language catalog
//! transchat languages
//! ```
//!
//! ## Configuration
//!
//! Settings are layered: command-line flags, then environment variables (a
//! `.env` file is loaded first), then `~/.config/transchat/config.toml`:
//!
//! ```toml
//! [engine]
//! endpoint = "https://api.openai.com"
//! model = "gpt-4o-mini"
//! api_key_env = "OPENAI_API_KEY"
//! max_retries = 2
//!
//! [chat]
//! languages = "languages.json"
//! language = "French"
//! ```

/// Interactive chat mode: session state machine, transcript and REPL.
pub mod chat;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management and engine settings.
pub mod config;

/// Typed errors for the catalog, configuration and completion calls.
pub mod error;

/// Input reading from files and stdin.
pub mod input;

/// In-process response latency summary.
pub mod metrics;

/// Global output configuration (quiet mode, colors, stderr/stdout routing).
pub mod output;

/// XDG-style path utilities for configuration.
pub mod paths;

/// Language catalog, prompt building and the streaming completion client.
pub mod translation;

/// Terminal UI components (spinner, colors).
pub mod ui;
