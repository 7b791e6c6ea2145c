//! Bot binary
//!
//! Serve commands over HTTP:
//!
//! ```bash
//! discord-llm-bot --env dev serve
//! ```
//!
//! Or run a single command from the terminal:
//!
//! ```bash
//! discord-llm-bot run ask-ey --text "What is a feature store?" --show-source
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use discord_llm_bot::{
    commands::{CommandOptions, CommandRouter, ConsoleResponder, Services},
    server::BotServer,
    BotConfig,
};

/// Chat bot answering commands with LLM pipelines
#[derive(Parser)]
#[command(name = "discord-llm-bot", version)]
struct Cli {
    /// Deployment environment; `dev` prefixes every command with `dev-`
    #[arg(long, value_enum, default_value_t = Environment::Prod, global = true)]
    env: Environment,

    /// Path to configuration file (TOML); built-in defaults when absent
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Environment {
    Prod,
    Dev,
}

impl Environment {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Prod => "prod",
            Self::Dev => "dev",
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Serve commands over HTTP
    Serve,

    /// Run one command and print its messages
    Run {
        /// Command name, including the environment prefix
        command: String,

        /// URL, query or question
        #[arg(long)]
        text: Option<String>,

        /// Sampling temperature in [0, 2]
        #[arg(long)]
        temperature: Option<f32>,

        /// gpt-3.5 or gpt-4
        #[arg(long)]
        model: Option<String>,

        /// Print source documents after an answer
        #[arg(long)]
        show_source: bool,

        /// Name used by `hello`
        #[arg(long)]
        author: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("No .env file loaded: {}", e);
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "discord_llm_bot=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => BotConfig::from_file(path)?,
        None => BotConfig::default(),
    }
    .for_environment(cli.env.as_str());

    tracing::info!("Configuration loaded (env: {})", cli.env.as_str());
    tracing::info!("  - Default model: {}", config.llm.default_model);
    tracing::info!("  - Embedding model: {}", config.embeddings.model);
    tracing::info!("  - Chunk size: {}", config.chunking.chunk_size);

    match cli.command {
        Commands::Serve => {
            let server = BotServer::new(config).await;
            server.start().await?;
        }
        Commands::Run {
            command,
            text,
            temperature,
            model,
            show_source,
            author,
        } => {
            let services = Services::from_config(&config).await;
            let router = CommandRouter::new(&config, services);
            let options = CommandOptions {
                text,
                temperature,
                model,
                show_source,
                author,
            };
            router.dispatch(&command, options, &ConsoleResponder).await?;
        }
    }

    Ok(())
}
