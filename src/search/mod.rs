// Query service
// Read-time similarity search over the document index


use tracing::debug;

use crate::embeddings::Embedder;
use crate::store::{DocumentIndex, SearchHit};
use crate::{ApidexError, Result};

/// Read-side similarity search. Every call re-embeds the query and
/// re-queries the store; nothing is cached.
pub struct QueryService<'a, E, S> {
    embedder: &'a E,
    store: &'a S,
}

impl<'a, E: Embedder, S: DocumentIndex> QueryService<'a, E, S> {
    #[inline]
    pub fn new(embedder: &'a E, store: &'a S) -> Self {
        Self { embedder, store }
    }

    /// The nearest indexed entries for `query_text`, ascending by distance.
    ///
    /// Returns at most `top_k` hits; a `top_k` beyond the collection size
    /// returns everything available. `top_k` of zero is a contract
    /// violation.
    #[inline]
    pub async fn search(&self, query_text: &str, top_k: usize) -> Result<Vec<SearchHit>> {
        if top_k == 0 {
            return Err(ApidexError::InvalidArgument(
                "top_k must be positive".to_string(),
            ));
        }

        debug!("Searching for: {}", query_text);
        let vector = self.embedder.encode_one(query_text)?;
        let hits = self.store.query(&vector, top_k).await?;

        debug!("Query returned {} hits", hits.len());
        Ok(hits)
    }
}
