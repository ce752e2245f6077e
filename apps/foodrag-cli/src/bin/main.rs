use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use foodrag_cli::app::{groq_client, load_env_file, upstash_index};
use foodrag_cli::{commands, logging, App};
use foodrag_core::config::{AppConfig, SyncGuard};

#[derive(Debug, Parser)]
#[command(name = "foodrag", version, about = "Question answering over a food dataset with Upstash Vector and Groq")]
struct Cli {
    /// Configuration profile; selects config.<env>.toml.
    #[arg(long, env = "RUST_ENV", default_value = "dev", global = true)]
    env: String,

    /// Dataset file, overriding dataset.path.
    #[arg(long, global = true)]
    dataset: Option<String>,

    /// Documents passed to the model per question, overriding retrieval.top_k.
    #[arg(long, global = true)]
    top_k: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load the dataset into the index when it is missing or stale.
    Ingest {
        #[arg(long, value_enum)]
        guard: Option<Guard>,
    },
    /// Clear the index and load the dataset again.
    Reset,
    /// Sync, then ask questions interactively.
    Chat,
    /// Run the fixed test questions.
    Test,
    /// Answer one question and exit.
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Guard {
    EmptyIndex,
    Fingerprint,
}

impl From<Guard> for SyncGuard {
    fn from(guard: Guard) -> Self {
        match guard {
            Guard::EmptyIndex => SyncGuard::EmptyIndex,
            Guard::Fingerprint => SyncGuard::Fingerprint,
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = AppConfig::load_for_env(&cli.env).context("loading configuration")?;
    if let Some(path) = &cli.dataset {
        config.dataset.path = path.clone();
    }
    if let Some(top_k) = cli.top_k {
        config.retrieval.top_k = top_k;
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_file = load_env_file();
    let cli = Cli::parse();
    logging::init();
    env_file.log();

    let config = load_config(&cli)?;
    let mut stdout = std::io::stdout();

    match cli.command {
        Command::Ingest { guard } => {
            let app = App::from_config(config)?;
            let guard = guard.map_or(app.config.index.sync_guard, SyncGuard::from);
            commands::run_ingest(&app, &app.upstash()?, guard, true, &mut stdout).await?;
        }
        Command::Reset => {
            let app = App::from_config(config)?;
            commands::run_reset(&app, &app.upstash()?, true, &mut stdout).await?;
        }
        Command::Chat => {
            let app = App::from_config(config)?;
            let (index, model) = (app.upstash()?, app.groq()?);
            commands::run_chat(&app, &index, &model, std::io::stdin().lock(), &mut stdout).await?;
        }
        Command::Test => {
            let (index, model) = (upstash_index(&config)?, groq_client(&config)?);
            commands::run_test_queries(&config, &index, &model, &mut stdout).await?;
        }
        Command::Ask { question } => {
            let (index, model) = (upstash_index(&config)?, groq_client(&config)?);
            commands::run_ask(&config, &index, &model, &question.join(" "), &mut stdout).await?;
        }
    }
    Ok(())
}
