// Indexing pipeline
// Flattened documents in, newly added vector-store entries out


use chrono::Utc;
use itertools::izip;
use tracing::{debug, info};

use crate::Result;
use crate::embeddings::Embedder;
use crate::flatten::ApiDocument;
use crate::store::{DocumentIndex, EntryMetadata, IndexedEntry};

/// Single-pass ingestion pipeline: embed every document, diff candidate ids
/// against the store, and upsert only the new ones.
///
/// Holds borrowed handles so the caller keeps ownership of the embedder and
/// the store across runs.
pub struct Indexer<'a, E, S> {
    embedder: &'a E,
    store: &'a mut S,
}

impl<'a, E: Embedder, S: DocumentIndex> Indexer<'a, E, S> {
    #[inline]
    pub fn new(embedder: &'a E, store: &'a mut S) -> Self {
        Self { embedder, store }
    }

    /// Ingest `documents`, returning the number of newly added entries.
    ///
    /// Already-present ids are skipped, never re-upserted, even if their
    /// content changed since the last run. The embedder call and the
    /// existence lookup both happen before any store mutation; a failure in
    /// either aborts the run with the store untouched. A failure during the
    /// final write can leave a partial batch behind, which a re-run skips
    /// over safely.
    #[inline]
    pub async fn ingest(&mut self, documents: &[ApiDocument]) -> Result<usize> {
        if documents.is_empty() {
            info!("No documents to ingest");
            return Ok(0);
        }

        debug!("Embedding {} documents", documents.len());
        let texts: Vec<String> = documents
            .iter()
            .map(|d| d.embedding_text.clone())
            .collect();
        let vectors = self.embedder.encode(&texts)?;

        let ids: Vec<String> = documents.iter().map(|d| d.id.clone()).collect();
        let existing = self.store.existing_ids(&ids).await?;

        let created_at = Utc::now().to_rfc3339();
        let new_entries: Vec<IndexedEntry> = izip!(documents, vectors)
            .filter(|(document, _)| !existing.contains(&document.id))
            .map(|(document, vector)| IndexedEntry {
                id: document.id.clone(),
                vector,
                document: document.embedding_text.clone(),
                metadata: EntryMetadata {
                    full_name: document.full_name.clone(),
                    module: document.module.clone(),
                    class_name: document.class_name.clone(),
                    link: document.link.clone(),
                    signature: document.signature.clone(),
                    created_at: created_at.clone(),
                },
            })
            .collect();

        if new_entries.is_empty() {
            info!(
                "No new documents to add; all {} candidates already indexed",
                documents.len()
            );
            return Ok(0);
        }

        let added = new_entries.len();
        self.store.add(new_entries).await?;
        info!(
            "Added {} new documents to the index ({} skipped as already present)",
            added,
            documents.len() - added
        );
        Ok(added)
    }
}
