use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApidexError>;

#[derive(Error, Debug)]
pub enum ApidexError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Source data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Scrape error: {0}")]
    Scrape(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    Store(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub mod commands;
pub mod config;
pub mod embeddings;
pub mod flatten;
pub mod indexer;
pub mod reference;
pub mod scrape;
pub mod search;
pub mod store;
