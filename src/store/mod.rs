// Vector index module
// Defines the collection boundary and the LanceDB adapter

pub mod vector_store;

pub use vector_store::VectorStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::Result;

/// Entry persisted in the vector index. Exactly one entry exists per id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexedEntry {
    pub id: String,
    /// Embedding vector, length fixed to the collection dimension
    pub vector: Vec<f32>,
    /// Document body stored verbatim (the text that was embedded)
    pub document: String,
    pub metadata: EntryMetadata,
}

/// Compact fields stored alongside each vector for display and filtering
/// without refetching the source page. Excludes the example code to bound
/// storage size.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntryMetadata {
    pub full_name: String,
    pub module: String,
    pub class_name: String,
    pub link: String,
    pub signature: String,
    /// RFC 3339 timestamp of when the entry was indexed
    pub created_at: String,
}

/// Ranked hit from a nearest-neighbor query.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub id: String,
    pub document: String,
    pub metadata: EntryMetadata,
    /// Distance to the query vector; smaller is closer
    pub distance: f32,
}

/// Named persistent collection with upsert-by-id and nearest-neighbor search.
///
/// Passed into the pipeline and query service as an explicit handle, never
/// held as ambient state, so tests can substitute an in-memory fake.
#[async_trait]
pub trait DocumentIndex {
    /// Subset of `ids` currently present in the collection.
    async fn existing_ids(&self, ids: &[String]) -> Result<HashSet<String>>;

    /// Batched insert. Ids must be unique within the call and absent from
    /// the collection; the pipeline guarantees both.
    async fn add(&mut self, entries: Vec<IndexedEntry>) -> Result<()>;

    /// The `limit` nearest entries to `vector`, ascending by distance.
    /// A `limit` beyond the collection size returns all entries.
    async fn query(&self, vector: &[f32], limit: usize) -> Result<Vec<SearchHit>>;

    /// Total number of entries stored.
    async fn count(&self) -> Result<u64>;
}
