//! Literature sources: the search/fetch gateway toward upstream catalogs.
//!
//! This module defines the [`LiteratureSource`] trait. The pipeline only ever
//! talks to a source through its two calls:
//!
//! 1. [`LiteratureSource::search`] resolves a free-text query into document ids
//! 2. [`LiteratureSource::fetch_details`] retrieves the full records for those ids
//!
//! [`PubMedSource`] implements it against NCBI E-utilities; [`MockSource`]
//! returns canned data for tests.

pub mod mock;
mod pubmed;

pub use mock::MockSource;
pub use pubmed::PubMedSource;

use crate::models::{ArticleSet, DocumentError};
use async_trait::async_trait;

/// The LiteratureSource trait defines the interface of the upstream catalog.
#[async_trait]
pub trait LiteratureSource: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source (e.g., "pubmed")
    fn id(&self) -> &str;

    /// Search for documents matching the query and return their ids.
    ///
    /// No hits is an empty vector, not an error.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<String>, GatewayError>;

    /// Fetch the full records for the given ids in one batched request.
    ///
    /// Fails with [`GatewayError::InvalidArgument`] when `ids` is empty.
    async fn fetch_details(&self, ids: &[String]) -> Result<ArticleSet, GatewayError>;
}

/// Errors that can occur when talking to a source
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Transport failure (DNS, connect, TLS, body read)
    #[error("Network error: {0}")]
    Network(String),

    /// The request did not complete within the configured timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The upstream answered with a non-success HTTP status
    #[error("API returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::Timeout(err.to_string())
        } else if let Some(status) = err.status() {
            GatewayError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            GatewayError::Network(err.to_string())
        }
    }
}

impl From<quick_xml::DeError> for GatewayError {
    fn from(err: quick_xml::DeError) -> Self {
        GatewayError::Parse(format!("XML: {}", err))
    }
}

impl From<DocumentError> for GatewayError {
    fn from(err: DocumentError) -> Self {
        GatewayError::Parse(format!("XML: {}", err))
    }
}
