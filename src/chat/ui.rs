//! Chat mode UI components.

use crate::config::EngineConfig;
use crate::metrics::Observations;
use crate::ui::Style;

use super::transcript::{Role, Transcript};

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn print_header() {
    println!(
        "{} {} - Let's translate",
        Style::header("transchat"),
        Style::version(format!("v{VERSION}"))
    );
}

pub fn print_language(language: &str, alias: &str) {
    println!(
        "{} {} {}",
        Style::label("Translating to"),
        Style::value(language),
        Style::secondary(format!("({alias})"))
    );
    println!();
}

pub fn placeholder(language: &str) -> String {
    format!("What will we be translating from English to {language} today?")
}

pub fn print_goodbye() {
    println!("{}", Style::success("Goodbye!"));
}

pub fn print_config(config: &EngineConfig, language: &str) {
    println!("{}", Style::header("Configuration"));
    let model = config.model.as_deref().unwrap_or("(not set)");
    let temperature = config
        .temperature
        .map_or_else(|| "(default)".to_string(), |t| t.to_string());

    println!("  {}      {}", Style::label("model"), Style::value(model));
    println!("  {}   {}", Style::label("language"), Style::value(language));
    println!(
        "  {}   {}",
        Style::label("endpoint"),
        Style::secondary(&config.endpoint)
    );
    println!(
        "  {}    {}",
        Style::label("api key"),
        Style::secondary(config.masked_api_key())
    );
    println!(
        "  {} {}",
        Style::label("temperature"),
        Style::secondary(temperature)
    );
    println!(
        "  {}    {}",
        Style::label("retries"),
        Style::secondary(config.max_retries)
    );
    println!();
}

pub fn print_help() {
    println!("{}", Style::header("Available commands"));
    for (command, description) in [
        ("/language [name]", "Change the target language"),
        ("/history", "Show this session's transcript"),
        ("/stats", "Show response latency"),
        ("/config", "Show current configuration"),
        ("/reload", "Reload configuration"),
        ("/help", "Show this help"),
        ("/quit", "Exit chat mode"),
    ] {
        println!(
            "  {}{}",
            Style::command(format!("{command:18}")),
            Style::secondary(description)
        );
    }
    println!();
    println!(
        "{}",
        Style::hint("Text inside [square brackets] is kept untranslated.")
    );
    println!();
}

pub fn print_history(transcript: &Transcript) {
    if transcript.is_empty() {
        println!("{}", Style::secondary("No messages yet."));
        println!();
        return;
    }

    for message in transcript.messages() {
        let role = match message.role {
            Role::User => Style::value("you"),
            Role::Assistant => Style::success("ai "),
        };
        println!("{role} {}", message.content);
    }
    println!();
}

pub fn print_stats(turns: &Observations) {
    println!("{}", Style::header("Response latency"));
    println!("  {}  {}", Style::label("turns"), Style::value(turns.count));
    match turns.mean() {
        Some(mean) => {
            println!("  {}   {}", Style::label("mean"), Style::value(format!("{mean:.2}s")));
            println!(
                "  {}  {}",
                Style::label("total"),
                Style::value(format!("{:.2}s", turns.sum))
            );
        }
        None => println!("  {}", Style::secondary("No completed turns yet.")),
    }
    println!();
}

pub fn print_error(message: &str) {
    eprintln!("{} {message}", Style::error("Error:"));
    eprintln!();
}
