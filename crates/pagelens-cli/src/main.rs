//! pagelens CLI - Command-line interface
//!
//! Usage:
//!   pagelens tools
//!   pagelens call <tool> --input '<json>'
//!   pagelens search <query> [-k N]

use anyhow::Context;
use clap::{Parser, Subcommand};
use pagelens_core::{AppConfig, LoggingConfig};
use pagelens_tools::{tool_definitions, DocumentQueryTools, ToolCall};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pagelens")]
#[command(about = "Document retrieval tools over a vector store collection")]
#[command(version)]
struct Cli {
    /// TOML config file (environment variables take precedence)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the tool definitions as JSON
    Tools,
    /// Invoke a tool by name
    Call {
        /// Tool name
        tool: String,
        /// JSON input for the tool
        #[arg(long, default_value = "{}")]
        input: String,
    },
    /// Semantic search shortcut
    Search {
        /// Search query
        query: String,
        /// Number of results
        #[arg(short, default_value_t = 5)]
        k: usize,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::from_file(path)?.with_env_override()?,
        None => AppConfig::from_env()?,
    };
    Ok(config)
}

async fn connect(config: &AppConfig) -> anyhow::Result<DocumentQueryTools> {
    DocumentQueryTools::connect(config)
        .await
        .context("failed to initialise document tools")
}

fn init_tracing(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.json_format {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_ref())?;
    init_tracing(&config.logging);

    match cli.command {
        Commands::Tools => {
            println!("{}", serde_json::to_string_pretty(&tool_definitions())?);
        }
        Commands::Call { tool, input } => {
            let input = serde_json::from_str(&input).context("--input is not valid JSON")?;
            let result = connect(&config)
                .await?
                .create_tools()
                .call_for_agent(ToolCall {
                    id: "cli".to_string(),
                    name: tool,
                    input,
                })
                .await?;
            if result.is_error {
                anyhow::bail!("{}", result.content);
            }
            println!("{}", result.content);
        }
        Commands::Search { query, k } => {
            tracing::debug!(%query, k, "Running semantic search");
            println!("{}", connect(&config).await?.semantic_search(&query, k).await?);
        }
    }

    Ok(())
}
