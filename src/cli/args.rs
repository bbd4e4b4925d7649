use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::EngineOverrides;

#[derive(Parser, Debug)]
#[command(name = "transchat")]
#[command(about = "Interactive AI translation chat")]
#[command(version)]
pub struct Args {
    /// Language catalog (JSON object of display name to alias)
    #[arg(short = 'l', long, global = true, value_name = "PATH")]
    pub languages: Option<PathBuf>,

    /// Suppress status messages
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(flatten)]
    pub engine: EngineArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Per-run engine and language overrides.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct EngineArgs {
    /// Target language, by display name or alias (e.g., French, fr)
    #[arg(short = 't', long = "to", value_name = "LANG")]
    pub to: Option<String>,

    /// Model name
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// API endpoint URL
    #[arg(short = 'e', long)]
    pub endpoint: Option<String>,

    /// Sampling temperature (0.0 - 2.0)
    #[arg(long)]
    pub temperature: Option<f32>,
}

impl EngineArgs {
    pub fn overrides(&self) -> EngineOverrides {
        EngineOverrides {
            endpoint: self.endpoint.clone(),
            model: self.model.clone(),
            temperature: self.temperature,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive translation chat (the default)
    Chat {
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Translate a file or stdin once and exit
    Translate {
        /// File to translate (reads from stdin if not provided)
        file: Option<PathBuf>,

        #[command(flatten)]
        engine: EngineArgs,
    },
    /// List the languages in the catalog
    Languages,
    /// Show the resolved configuration
    Config {
        /// Write a starter config file
        #[arg(long)]
        init: bool,
    },
}
