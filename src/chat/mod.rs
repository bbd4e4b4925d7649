//! Interactive chat mode for translation sessions.
//!
//! Provides a REPL-style interface with slash commands on top of a
//! [`ChatSession`], which owns the transcript and runs one turn at a time.

/// Slash command parsing and autocomplete.
pub mod command;
mod repl;
mod session;
mod transcript;
mod ui;

pub use repl::Repl;
pub use session::{ChatSession, SessionContext, SessionState, TurnOutcome};
pub use transcript::{Message, Role, Transcript};
