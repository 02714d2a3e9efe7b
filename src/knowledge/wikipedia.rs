//! MediaWiki query client
//!
//! One GET per lookup against the `action=query` API, asking for the
//! plain-text extract, a thumbnail and page properties of the exact title.
//! Redirects are followed by the API itself (`redirects=1`).

use eyre::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::time::Duration;

use super::{KnowledgeSource, LookupOutcome, PageSummary};
use crate::config::KnowledgeConfig;

/// Top-level `action=query` response
#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    pub query: Option<QueryBody>,
}

#[derive(Debug, Deserialize)]
pub struct QueryBody {
    /// Page id → page, in response order
    #[serde(default)]
    pub pages: IndexMap<String, WikiPage>,
}

#[derive(Debug, Deserialize)]
pub struct WikiPage {
    #[serde(default)]
    pub title: String,
    pub extract: Option<String>,
    pub thumbnail: Option<Thumbnail>,
    /// Present (usually as `""`) when the title does not exist
    pub missing: Option<serde_json::Value>,
    pub pageprops: Option<PageProps>,
}

#[derive(Debug, Deserialize)]
pub struct Thumbnail {
    pub source: String,
}

#[derive(Debug, Deserialize)]
pub struct PageProps {
    pub disambiguation: Option<serde_json::Value>,
}

/// Classify a decoded response for `search_term`
pub fn classify(search_term: &str, response: QueryResponse, min_extract_chars: usize) -> LookupOutcome {
    let not_found = || LookupOutcome::NotFound {
        search_term: search_term.to_string(),
    };

    let Some(query) = response.query else {
        log::warn!("Lookup for \"{}\" returned no query block", search_term);
        return LookupOutcome::ApiError {
            search_term: Some(search_term.to_string()),
        };
    };

    let Some((page_id, page)) = query.pages.into_iter().next() else {
        log::info!("No page for \"{}\"", search_term);
        return not_found();
    };

    if page_id == "-1" {
        log::info!("No page for \"{}\" (page id -1)", search_term);
        return not_found();
    }

    if page.missing.is_some() {
        log::info!("Page for \"{}\" is marked missing", search_term);
        return not_found();
    }

    if page.pageprops.as_ref().is_some_and(|p| p.disambiguation.is_some()) {
        log::info!("Page for \"{}\" is a disambiguation page", search_term);
        return LookupOutcome::Ambiguous {
            search_term: search_term.to_string(),
        };
    }

    let extract = page.extract.unwrap_or_default();
    let length = extract.chars().count();
    if length < min_extract_chars {
        log::info!(
            "Page for \"{}\" found but extract too short (length: {})",
            search_term,
            length
        );
        return LookupOutcome::InsufficientContent {
            search_term: search_term.to_string(),
        };
    }

    log::info!("Resolved \"{}\" to \"{}\" ({} chars)", search_term, page.title, length);
    LookupOutcome::Success(PageSummary {
        title: page.title,
        extract,
        image_url: page.thumbnail.map(|t| t.source),
    })
}

/// Decode a raw body and classify it; undecodable bodies are API errors
pub fn classify_body(search_term: &str, body: &str, min_extract_chars: usize) -> LookupOutcome {
    match serde_json::from_str::<QueryResponse>(body) {
        Ok(response) => classify(search_term, response, min_extract_chars),
        Err(e) => {
            log::error!("Failed to parse lookup response for \"{}\": {}", search_term, e);
            LookupOutcome::ApiError {
                search_term: Some(search_term.to_string()),
            }
        }
    }
}

pub struct WikipediaClient {
    agent: ureq::Agent,
    config: KnowledgeConfig,
}

impl WikipediaClient {
    pub fn new(config: KnowledgeConfig) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .build()
            .into();
        Self { agent, config }
    }

    fn fetch(&self, search_term: &str) -> Result<String> {
        let thumb_size = self.config.thumbnail_size.to_string();

        let mut response = self
            .agent
            .get(&self.config.base_url)
            .query("action", "query")
            .query("format", "json")
            .query("prop", "extracts|pageimages|pageprops")
            .query("explaintext", "true")
            .query("piprop", "thumbnail|name")
            .query("pithumbsize", &thumb_size)
            .query("redirects", "1")
            .query("titles", search_term)
            .query("origin", "*")
            .call()
            .context("Encyclopedia request failed")?;

        response
            .body_mut()
            .read_to_string()
            .context("Failed to read encyclopedia response")
    }
}

impl KnowledgeSource for WikipediaClient {
    fn lookup(&self, search_term: &str) -> LookupOutcome {
        log::debug!("Looking up \"{}\" at {}", search_term, self.config.base_url);

        match self.fetch(search_term) {
            Ok(body) => classify_body(search_term, &body, self.config.min_extract_chars),
            Err(e) => {
                log::error!("Lookup for \"{}\" failed: {:#}", search_term, e);
                LookupOutcome::ApiError {
                    search_term: Some(search_term.to_string()),
                }
            }
        }
    }
}
