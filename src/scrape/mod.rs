// Reference scraper
// Fetches the API reference index and entry pages, producing an ApiReference

pub mod extract;

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::ScrapeConfig;
use crate::reference::ApiReference;
use crate::{ApidexError, Result};

use extract::{EXAMPLE_FALLBACK, SIGNATURE_FALLBACK};

/// Page-specific scraper for a sklearn-style API reference site.
pub struct ReferenceScraper {
    agent: ureq::Agent,
    index_url: Url,
    user_agent: String,
}

impl ReferenceScraper {
    #[inline]
    pub fn new(config: &ScrapeConfig) -> Result<Self> {
        let index_url = Url::parse(&config.index_url).map_err(|e| {
            ApidexError::Config(format!("Invalid index URL {}: {}", config.index_url, e))
        })?;

        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_seconds)))
            .build()
            .into();

        Ok(Self {
            agent,
            index_url,
            user_agent: config.user_agent.clone(),
        })
    }

    fn fetch(&self, url: &Url) -> Result<String> {
        debug!("Fetching {}", url);

        self.agent
            .get(url.as_str())
            .header("User-Agent", &self.user_agent)
            .call()
            .and_then(|mut resp| resp.body_mut().read_to_string())
            .map_err(|e| ApidexError::Scrape(format!("Failed to fetch {}: {}", url, e)))
    }

    /// Scrape the index page into a bare section/subsection tree.
    #[inline]
    pub fn scrape_index(&self) -> Result<ApiReference> {
        info!("Scraping API reference index at {}", self.index_url);

        let html = self.fetch(&self.index_url)?;
        let reference = extract::parse_reference_index(&html, &self.index_url)?;

        info!(
            "Found {} sections with {} entries",
            reference.sections.len(),
            reference.entry_count()
        );
        Ok(reference)
    }

    /// Visit every entry page, filling in class signature and example code.
    ///
    /// A page that cannot be fetched or does not match the expected shape
    /// leaves the entry with its fallback strings; the run keeps going.
    #[inline]
    pub fn enrich(&self, reference: &mut ApiReference) -> Result<()> {
        let progress = ProgressBar::new(reference.entry_count() as u64);
        progress.set_style(
            ProgressStyle::with_template(
                "{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        for section in reference.sections.values_mut() {
            for (name, entry) in section.subsections.iter_mut() {
                progress.set_message(name.clone());

                let page_url = match Url::parse(&entry.link) {
                    Ok(url) => url,
                    Err(e) => {
                        warn!("Skipping {}: invalid link {}: {}", name, entry.link, e);
                        entry.class_signature = SIGNATURE_FALLBACK.to_string();
                        entry.example_code = EXAMPLE_FALLBACK.to_string();
                        progress.inc(1);
                        continue;
                    }
                };

                match self.fetch(&page_url) {
                    Ok(html) => {
                        entry.class_signature = extract::extract_class_signature(&html);
                        entry.example_code = extract::extract_example_code(&html);
                    }
                    Err(e) => {
                        warn!("Skipping {}: {}", name, e);
                        entry.class_signature = SIGNATURE_FALLBACK.to_string();
                        entry.example_code = EXAMPLE_FALLBACK.to_string();
                    }
                }

                progress.inc(1);
            }
        }

        progress.finish_with_message("scrape complete");
        Ok(())
    }
}
