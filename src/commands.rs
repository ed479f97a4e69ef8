use anyhow::Context;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::Config;
use crate::embeddings::OllamaClient;
use crate::flatten;
use crate::indexer::Indexer;
use crate::reference::ApiReference;
use crate::scrape::ReferenceScraper;
use crate::search::QueryService;
use crate::store::{DocumentIndex, VectorStore};
use crate::{ApidexError, Result};

/// Scrape the configured reference site and write the hierarchy JSON
#[inline]
pub fn scrape_reference(
    config: &Config,
    url: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let mut scrape_config = config.scrape.clone();
    if let Some(url) = url {
        scrape_config.index_url = url;
    }

    let scraper = ReferenceScraper::new(&scrape_config)?;
    let mut reference = scraper.scrape_index()?;
    scraper.enrich(&mut reference)?;

    let output = output.unwrap_or_else(|| config.data_path());
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    reference.save(&output)?;

    println!(
        "Saved {} entries across {} sections to {}",
        reference.entry_count(),
        reference.sections.len(),
        output.display()
    );
    Ok(())
}

/// Flatten the hierarchy JSON and ingest new documents into the vector index
#[inline]
pub async fn index_documents(config: &Config, input: Option<PathBuf>) -> Result<()> {
    let input = input.unwrap_or_else(|| config.data_path());

    let reference = match ApiReference::load(&input) {
        Ok(reference) => reference,
        Err(ApidexError::DataUnavailable(reason)) => {
            warn!("{}", reason);
            println!(
                "No usable API reference at {}; nothing to index.",
                input.display()
            );
            println!("Run 'apidex scrape' first.");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let documents = flatten::flatten(&reference);
    info!("Flattened {} documents from {}", documents.len(), input.display());

    let embedder = OllamaClient::new(&config.ollama)?;
    let mut store = VectorStore::open(config).await?;

    let added = Indexer::new(&embedder, &mut store)
        .ingest(&documents)
        .await?;

    if added == 0 {
        println!(
            "No new documents to add; all {} are already indexed.",
            documents.len()
        );
    } else {
        println!(
            "Added {} of {} documents to the index.",
            added,
            documents.len()
        );
    }
    Ok(())
}

/// Search the index with a natural-language query
#[inline]
pub async fn search_index(config: &Config, query: &str, limit: usize) -> Result<()> {
    let embedder = OllamaClient::new(&config.ollama)?;
    let store = VectorStore::open(config).await?;

    let hits = QueryService::new(&embedder, &store)
        .search(query, limit)
        .await?;

    if hits.is_empty() {
        println!("No matches found.");
        return Ok(());
    }

    for (rank, hit) in hits.iter().enumerate() {
        println!(
            "{}. {} (distance {:.4})",
            rank + 1,
            hit.metadata.full_name,
            hit.distance
        );
        if !hit.metadata.signature.is_empty() {
            println!("   {}", hit.metadata.signature);
        }
        if !hit.metadata.link.is_empty() {
            println!("   {}", hit.metadata.link);
        }
    }
    Ok(())
}

/// Show vector store status
#[inline]
pub async fn show_status(config: &Config) -> Result<()> {
    let store = VectorStore::open(config).await?;
    let count = store.count().await?;

    println!("Vector store: {}", config.vectors_path().display());
    println!("Table: {}", config.store.table);
    println!("Indexed entries: {}", count);
    Ok(())
}

/// Print the effective configuration as TOML
#[inline]
pub fn show_config(config: &Config) -> Result<()> {
    let rendered =
        toml::to_string_pretty(config).context("Failed to serialize configuration")?;

    println!("Configuration directory: {}", config.base_dir.display());
    println!();
    print!("{}", rendered);
    Ok(())
}
