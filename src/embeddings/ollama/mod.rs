
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};
use url::Url;

use crate::config::OllamaConfig;
use crate::embeddings::Embedder;
use crate::{ApidexError, Result};

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
const EXPONENTIAL_BACKOFF_BASE: u64 = 2;

/// Blocking client for the Ollama embedding API.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: Url,
    model: String,
    batch_size: u32,
    dimension: usize,
    agent: ureq::Agent,
    retry_attempts: u32,
}

#[derive(Debug, Serialize)]
struct EmbedRequest {
    model: String,
    prompt: String,
}

#[derive(Debug, Serialize)]
struct BatchEmbedRequest {
    model: String,
    #[serde(rename = "input")]
    inputs: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct BatchEmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

impl OllamaClient {
    #[inline]
    pub fn new(config: &OllamaConfig) -> Result<Self> {
        let base_url = config
            .ollama_url()
            .map_err(|e| ApidexError::Embedding(format!("Invalid Ollama URL: {}", e)))?;

        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT_SECONDS)))
            .build()
            .into();

        Ok(Self {
            base_url,
            model: config.model.clone(),
            batch_size: config.batch_size,
            dimension: config.embedding_dimension as usize,
            agent,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
        })
    }

    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        self
    }

    #[inline]
    pub fn with_retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts;
        self
    }

    /// Check that the Ollama server is reachable.
    #[inline]
    pub fn ping(&self) -> Result<()> {
        let url = self
            .base_url
            .join("/api/tags")
            .map_err(|e| ApidexError::Embedding(format!("Failed to build ping URL: {}", e)))?;

        debug!("Pinging Ollama server at {}", url);

        self.request_with_retry(|| {
            self.agent
                .get(url.as_str())
                .call()
                .and_then(|mut resp| resp.body_mut().read_to_string())
        })?;

        debug!("Server ping successful");
        Ok(())
    }

    /// Embed a single text through the single-prompt endpoint.
    fn embed_single(&self, text: &str) -> Result<Vec<f32>> {
        debug!("Generating embedding for text (length: {})", text.len());

        let request = EmbedRequest {
            model: self.model.clone(),
            prompt: text.to_string(),
        };
        let request_json = serde_json::to_string(&request)
            .map_err(|e| ApidexError::Embedding(format!("Failed to serialize request: {}", e)))?;

        let response_text = self.post_embed(&request_json)?;
        let response: EmbedResponse = serde_json::from_str(&response_text).map_err(|e| {
            ApidexError::Embedding(format!("Failed to parse embedding response: {}", e))
        })?;

        self.check_dimension(&response.embedding)?;
        Ok(response.embedding)
    }

    /// Embed up to `batch_size` texts in one request.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.len() == 1 {
            return Ok(vec![self.embed_single(&texts[0])?]);
        }

        let request = BatchEmbedRequest {
            model: self.model.clone(),
            inputs: texts.to_vec(),
        };
        let request_json = serde_json::to_string(&request)
            .map_err(|e| ApidexError::Embedding(format!("Failed to serialize request: {}", e)))?;

        let response_text = self.post_embed(&request_json)?;
        let response: BatchEmbedResponse = serde_json::from_str(&response_text).map_err(|e| {
            ApidexError::Embedding(format!("Failed to parse batch embedding response: {}", e))
        })?;

        if response.embeddings.len() != texts.len() {
            return Err(ApidexError::Embedding(format!(
                "Mismatch between request and response counts: {} vs {}",
                texts.len(),
                response.embeddings.len()
            )));
        }

        for embedding in &response.embeddings {
            self.check_dimension(embedding)?;
        }

        Ok(response.embeddings)
    }

    fn post_embed(&self, request_json: &str) -> Result<String> {
        let url = self
            .base_url
            .join("/api/embed")
            .map_err(|e| ApidexError::Embedding(format!("Failed to build embed URL: {}", e)))?;

        self.request_with_retry(|| {
            self.agent
                .post(url.as_str())
                .header("Content-Type", "application/json")
                .send(request_json)
                .and_then(|mut resp| resp.body_mut().read_to_string())
        })
    }

    fn check_dimension(&self, embedding: &[f32]) -> Result<()> {
        if embedding.len() == self.dimension {
            Ok(())
        } else {
            Err(ApidexError::Embedding(format!(
                "Model returned {}-dimensional embedding, expected {}",
                embedding.len(),
                self.dimension
            )))
        }
    }

    fn request_with_retry<F>(&self, mut request_fn: F) -> Result<String>
    where
        F: FnMut() -> std::result::Result<String, ureq::Error>,
    {
        let mut last_error = None;

        for attempt in 1..=self.retry_attempts {
            debug!("HTTP request attempt {}/{}", attempt, self.retry_attempts);

            match request_fn() {
                Ok(response_text) => {
                    debug!("Request succeeded on attempt {}", attempt);
                    return Ok(response_text);
                }
                Err(error) => {
                    let should_retry = match &error {
                        ureq::Error::StatusCode(status) => {
                            if *status >= 500 {
                                warn!(
                                    "Server error (status {}), attempt {}/{}",
                                    status, attempt, self.retry_attempts
                                );
                                true
                            } else {
                                warn!("Client error (status {}), not retrying", status);
                                return Err(ApidexError::Embedding(format!(
                                    "Client error: HTTP {}",
                                    status
                                )));
                            }
                        }
                        ureq::Error::ConnectionFailed
                        | ureq::Error::HostNotFound
                        | ureq::Error::Timeout(_)
                        | ureq::Error::Io(_) => {
                            warn!(
                                "Transport error: {}, attempt {}/{}",
                                error, attempt, self.retry_attempts
                            );
                            true
                        }
                        _ => {
                            warn!("Non-retryable error: {}", error);
                            false
                        }
                    };

                    if !should_retry {
                        return Err(ApidexError::Embedding(format!(
                            "Non-retryable error: {}",
                            error
                        )));
                    }

                    last_error = Some(ApidexError::Embedding(format!("Request error: {}", error)));

                    if attempt < self.retry_attempts {
                        let delay_ms = EXPONENTIAL_BACKOFF_BASE.pow(attempt - 1) * 1000;
                        let delay = Duration::from_millis(delay_ms);
                        debug!("Waiting {:?} before retry", delay);
                        std::thread::sleep(delay);
                    }
                }
            }
        }

        error!("All retry attempts failed for request to {}", self.base_url);

        Err(last_error
            .unwrap_or_else(|| ApidexError::Embedding("Request failed after retries".to_string())))
    }
}

impl Embedder for OllamaClient {
    fn dimension(&self) -> usize {
        self.dimension
    }

    /// One batched call at the pipeline seam; sub-batched by `batch_size`
    /// internally to avoid overwhelming the server.
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Generating embeddings for {} texts", texts.len());

        let mut vectors = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(self.batch_size as usize) {
            vectors.extend(self.embed_batch(chunk)?);
        }

        debug!("Generated {} embeddings total", vectors.len());
        Ok(vectors)
    }

    fn encode_one(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_single(text)
    }
}
