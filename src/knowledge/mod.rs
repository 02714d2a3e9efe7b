//! Encyclopedia lookups
//!
//! A lookup resolves a free-text name to a page summary and classifies the
//! result into exactly one outcome. Lookups never fail outright: transport
//! problems come back as [`LookupOutcome::ApiError`].

pub mod wikipedia;

use serde::Serialize;

pub use wikipedia::WikipediaClient;

/// Summary of a resolved page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub title: String,
    /// Plain-text summary, at least the configured minimum length
    pub extract: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Classified result of a single lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LookupOutcome {
    Success(PageSummary),
    NotFound { search_term: String },
    Ambiguous { search_term: String },
    InsufficientContent { search_term: String },
    ApiError { search_term: Option<String> },
}

impl LookupOutcome {
    /// Short tag for logs and tables
    pub fn tag(&self) -> &'static str {
        match self {
            LookupOutcome::Success(_) => "success",
            LookupOutcome::NotFound { .. } => "not_found",
            LookupOutcome::Ambiguous { .. } => "ambiguous",
            LookupOutcome::InsufficientContent { .. } => "insufficient_content",
            LookupOutcome::ApiError { .. } => "api_error",
        }
    }
}

/// Anything that can answer a lookup
pub trait KnowledgeSource: Send + Sync {
    fn lookup(&self, search_term: &str) -> LookupOutcome;
}
