// Entrypoint for the CLI application.
// - Parses flags, loads config and sets up logging.
// - With no subcommand, hands the controller to the interactive menu.
// - `extract` and `generate` run a single action and print the result.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use flashcards_cli::{
    api::ApiClient,
    config::Config,
    controller::{Controller, FormState, Status},
    render::format_deck,
    ui::main_menu,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flashcards-cli", about = "Generate flashcards from text or files", version)]
struct Cli {
    /// Base URL of the flashcard server (overrides FLASHCARDS_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Upload a file and print the text the server extracted
    Extract {
        file: PathBuf,
    },

    /// Generate flashcards from text, a file, or both
    Generate {
        /// Text to generate from (use "-" to read from stdin)
        #[arg(long)]
        text: Option<String>,
        /// Extract text from this file first
        #[arg(long)]
        file: Option<PathBuf>,
        /// Desired number of cards
        #[arg(long)]
        num_cards: Option<String>,
        /// Difficulty passed to the server as-is
        #[arg(long)]
        difficulty: Option<String>,
    },
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    init_logging();
    let cli = Cli::parse();

    let mut config = Config::load();
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    if cli.no_color {
        config.color = false;
    }
    debug!(api_url = %config.api_url, "Using flashcard server");

    let api = ApiClient::from_config(&config)?;
    let form = FormState {
        num_cards: config.num_cards.to_string(),
        difficulty: config.difficulty.clone(),
        ..FormState::default()
    };
    let mut controller = Controller::with_form(api, form);

    let status = match cli.command {
        None => {
            main_menu(&mut controller, config.color)?;
            return Ok(ExitCode::SUCCESS);
        }
        Some(Command::Extract { file }) => {
            controller.form_mut().file = Some(file);
            let status = controller.extract();
            if status == Status::Extracted {
                match cli.format {
                    OutputFormat::Plain => println!("{}", controller.state().session.extracted_text),
                    OutputFormat::Json => println!(
                        "{}",
                        serde_json::json!({ "text": controller.state().session.extracted_text })
                    ),
                }
            }
            status
        }
        Some(Command::Generate {
            text,
            file,
            num_cards,
            difficulty,
        }) => {
            if let Some(n) = num_cards {
                controller.form_mut().num_cards = n;
            }
            if let Some(d) = difficulty {
                controller.form_mut().difficulty = d;
            }
            if let Some(path) = file {
                controller.form_mut().file = Some(path);
                let status = controller.extract();
                if status.is_failure() {
                    eprintln!("{}", status);
                    return Ok(ExitCode::FAILURE);
                }
            }
            if let Some(text) = text {
                controller.form_mut().text = read_text_arg(text)?;
            }
            let status = controller.generate();
            if status == Status::Generated {
                match cli.format {
                    OutputFormat::Plain => println!("{}", format_deck(controller.deck(), config.color)),
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(controller.deck())?),
                }
            }
            status
        }
    };

    eprintln!("{}", status);
    Ok(if status.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// `-` means read the whole of stdin.
fn read_text_arg(text: String) -> anyhow::Result<String> {
    if text == "-" {
        let mut buf = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut buf)?;
        Ok(buf)
    } else {
        Ok(text)
    }
}
