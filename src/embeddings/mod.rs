// Embeddings module
// Defines the model boundary and the Ollama HTTP adapter

pub mod ollama;

pub use ollama::OllamaClient;

use crate::{ApidexError, Result};

/// Text embedding model boundary.
///
/// Implementations map text to fixed-dimension vectors; `encode` returns one
/// vector per input, in input order. Passed into the pipeline and query
/// service as an explicit handle so tests can substitute a deterministic fake.
pub trait Embedder {
    /// Output dimension, fixed per model instance.
    fn dimension(&self) -> usize;

    /// Batch encode.
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Single-text convenience form.
    fn encode_one(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.encode(&[text.to_string()])?;
        match vectors.pop() {
            Some(vector) if vectors.is_empty() => Ok(vector),
            _ => Err(ApidexError::Embedding(
                "Expected exactly one embedding for a single text".to_string(),
            )),
        }
    }
}
