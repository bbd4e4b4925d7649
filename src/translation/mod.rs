mod client;
mod language;
mod prompt;
mod retry;
mod sse_parser;

pub use client::{Completion, CompletionClient, TokenStream};
pub use language::{DEFAULT_CATALOG_PATH, LanguageCatalog, print_languages};
pub use prompt::{Prompt, SYSTEM_PROMPT_TEMPLATE, build as build_prompt};
pub use retry::{RetryPolicy, with_retries};
