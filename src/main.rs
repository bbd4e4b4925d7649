use anyhow::Result;
use clap::Parser;

use transchat::cli::commands::{chat, configure, languages, translate};
use transchat::cli::{Args, Command, exit_code};
use transchat::config;
use transchat::output::{self, OutputConfig};
use transchat::ui::Style;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    output::init(OutputConfig::from_flags(args.quiet, args.no_color));
    output::init_logging();
    config::load_dotenv(false);

    if let Err(err) = run(args).await {
        eprintln!("{} {err:#}", Style::error("Error:"));
        std::process::exit(exit_code(&err));
    }
}

async fn run(args: Args) -> Result<()> {
    match args.command {
        Some(Command::Languages) => languages::run_languages(args.languages.as_deref()),
        Some(Command::Config { init }) => {
            configure::run_configure(init, args.languages.as_deref(), &args.engine)
        }
        Some(Command::Translate { file, engine }) => {
            let options = translate::TranslateOptions {
                file,
                languages: args.languages,
                engine,
            };
            translate::run_translate(options).await
        }
        Some(Command::Chat { engine }) => {
            let options = chat::ChatOptions {
                languages: args.languages,
                engine,
            };
            chat::run_chat(options).await
        }
        None => {
            let options = chat::ChatOptions {
                languages: args.languages,
                engine: args.engine,
            };
            chat::run_chat(options).await
        }
    }
}
