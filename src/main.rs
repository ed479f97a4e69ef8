use clap::{Parser, Subcommand};
use std::path::PathBuf;

use apidex::Result;
use apidex::commands::{index_documents, scrape_reference, search_index, show_config, show_status};
use apidex::config::{Config, get_config_dir};

#[derive(Parser)]
#[command(name = "apidex")]
#[command(about = "Scrapes documentation API references and serves semantic search over them")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the API reference site and save the hierarchy JSON
    Scrape {
        /// Override the configured reference index URL
        #[arg(long)]
        url: Option<String>,
        /// Where to write the hierarchy JSON
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Flatten the hierarchy and ingest new documents into the vector index
    Index {
        /// Hierarchy JSON to index
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Search the index with a natural-language query
    Search {
        /// Natural-language query text
        query: String,
        /// Maximum number of results
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
    /// Show vector store status
    Status,
    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config_dir = get_config_dir().map_err(|e| apidex::ApidexError::Config(e.to_string()))?;
    let config = Config::load(&config_dir)?;

    match cli.command {
        Commands::Scrape { url, output } => {
            scrape_reference(&config, url, output)?;
        }
        Commands::Index { input } => {
            index_documents(&config, input).await?;
        }
        Commands::Search { query, limit } => {
            search_index(&config, &query, limit).await?;
        }
        Commands::Status => {
            show_status(&config).await?;
        }
        Commands::Config => {
            show_config(&config)?;
        }
    }

    Ok(())
}
