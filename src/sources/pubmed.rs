//! PubMed source implementation using the E-utilities API.

use async_trait::async_trait;
use quick_xml::de::from_str;
use serde::Deserialize;
use std::sync::Arc;

use crate::config::PubMedConfig;
use crate::models::ArticleSet;
use crate::sources::{GatewayError, LiteratureSource};
use crate::utils::HttpClient;

/// E-utilities endpoint names, relative to the configured base URL
const ESEARCH_ENDPOINT: &str = "esearch.fcgi";
const EFETCH_ENDPOINT: &str = "efetch.fcgi";

/// Value of the `tool` parameter NCBI asks clients to send
const TOOL_NAME: &str = env!("CARGO_PKG_NAME");

/// PubMed research source
///
/// Uses NCBI E-utilities for searching and fetching PubMed records. Every
/// request is preceded by the configured fixed delay to stay inside the
/// upstream rate limit.
#[derive(Debug, Clone)]
pub struct PubMedSource {
    client: Arc<HttpClient>,
    config: PubMedConfig,
}

impl PubMedSource {
    /// Create a new PubMed source
    pub fn new(config: PubMedConfig) -> Result<Self, GatewayError> {
        let client = HttpClient::new(config.timeout())?;
        Ok(Self::with_client(Arc::new(client), config))
    }

    /// Create with a custom HTTP client (for testing)
    pub fn with_client(client: Arc<HttpClient>, config: PubMedConfig) -> Self {
        Self { client, config }
    }

    /// Full URL of an endpoint
    fn endpoint_url(&self, endpoint: &str) -> String {
        if self.config.base_url.ends_with('/') {
            format!("{}{}", self.config.base_url, endpoint)
        } else {
            format!("{}/{}", self.config.base_url, endpoint)
        }
    }

    /// Parameters sent with every call (tool, email, api_key)
    fn common_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("tool", TOOL_NAME.to_string())];
        if let Some(email) = self.config.email.as_ref().filter(|e| !e.is_empty()) {
            params.push(("email", email.clone()));
        }
        if let Some(key) = self.config.api_key.as_ref().filter(|k| !k.is_empty()) {
            params.push(("api_key", key.clone()));
        }
        params
    }

    /// Build E-utilities search parameters
    fn search_params(&self, query: &str, max_results: usize) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("db", "pubmed".to_string()),
            ("term", query.to_string()),
            ("retmax", max_results.to_string()),
            ("retmode", "xml".to_string()),
        ];
        params.extend(self.common_params());
        params
    }

    /// Build E-utilities fetch parameters for specific PubMed IDs
    fn fetch_params(&self, ids: &[String]) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("db", "pubmed".to_string()),
            ("id", ids.join(",")),
            ("retmode", "xml".to_string()),
            ("rettype", "abstract".to_string()),
        ];
        params.extend(self.common_params());
        params
    }

    /// Wait out the rate-limit delay, then GET the endpoint and return the body
    async fn get(
        &self,
        endpoint: &str,
        params: &[(&'static str, String)],
    ) -> Result<String, GatewayError> {
        let url = self.endpoint_url(endpoint);
        tracing::debug!(
            "Making request to {} with params: {:?}",
            url,
            redacted(params)
        );

        tokio::time::sleep(self.config.request_delay()).await;

        let response = self
            .client
            .client()
            .get(&url)
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
                message: format!("PubMed {} request failed", endpoint),
            });
        }

        Ok(response.text().await?)
    }

    /// Parse E-utilities search response XML
    fn parse_search_response(xml: &str) -> Result<Vec<String>, GatewayError> {
        #[derive(Debug, Deserialize)]
        #[allow(non_snake_case)]
        struct ESearchResult {
            #[serde(default)]
            IdList: Option<IdList>,
        }

        #[derive(Debug, Deserialize)]
        #[allow(non_snake_case)]
        struct IdList {
            #[serde(rename = "Id", default)]
            ids: Vec<String>,
        }

        let result: ESearchResult = from_str(xml)?;

        Ok(result
            .IdList
            .map(|list| list.ids)
            .unwrap_or_default()
            .into_iter()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect())
    }
}

/// Copy of the request parameters with the API key masked, for logging
fn redacted(params: &[(&'static str, String)]) -> Vec<(&'static str, String)> {
    params
        .iter()
        .map(|(k, v)| {
            if *k == "api_key" {
                (*k, "***".to_string())
            } else {
                (*k, v.clone())
            }
        })
        .collect()
}

#[async_trait]
impl LiteratureSource for PubMedSource {
    fn id(&self) -> &str {
        "pubmed"
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<String>, GatewayError> {
        let xml = self
            .get(ESEARCH_ENDPOINT, &self.search_params(query, max_results))
            .await?;

        let ids = Self::parse_search_response(&xml)?;
        tracing::info!("Found {} papers for query: {}", ids.len(), query);
        Ok(ids)
    }

    async fn fetch_details(&self, ids: &[String]) -> Result<ArticleSet, GatewayError> {
        if ids.is_empty() {
            return Err(GatewayError::InvalidArgument(
                "No PMIDs provided".to_string(),
            ));
        }

        let xml = self.get(EFETCH_ENDPOINT, &self.fetch_params(ids)).await?;

        let articles = ArticleSet::parse(&xml)
            .map_err(|e| GatewayError::Parse(format!("Failed to parse paper details: {}", e)))?;
        tracing::info!("Fetched details for {} papers", ids.len());
        Ok(articles)
    }
}
