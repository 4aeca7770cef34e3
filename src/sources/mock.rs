//! Mock source for testing purposes.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::models::ArticleSet;
use crate::sources::{GatewayError, LiteratureSource};

/// A mock source for testing that returns predefined responses.
///
/// Searches return the configured ids (truncated to `max_results`); fetches
/// parse the configured efetch body. Either call can be made to fail once an
/// error is set. Every call is recorded.
#[derive(Debug, Default)]
pub struct MockSource {
    ids: Mutex<Vec<String>>,
    details_xml: Mutex<Option<String>>,
    search_error: Mutex<Option<GatewayError>>,
    fetch_error: Mutex<Option<GatewayError>>,
    searches: Mutex<Vec<(String, usize)>>,
    fetches: Mutex<Vec<Vec<String>>>,
}

impl MockSource {
    /// Create a new mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ids returned by `search`.
    pub fn set_search_ids<I, S>(&self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut guard = self.ids.lock().unwrap();
        *guard = ids.into_iter().map(Into::into).collect();
    }

    /// Set the efetch body returned by `fetch_details`.
    pub fn set_details_xml(&self, xml: impl Into<String>) {
        let mut guard = self.details_xml.lock().unwrap();
        *guard = Some(xml.into());
    }

    /// Make `search` fail with this error.
    pub fn fail_search(&self, error: GatewayError) {
        let mut guard = self.search_error.lock().unwrap();
        *guard = Some(error);
    }

    /// Make `fetch_details` fail with this error.
    pub fn fail_fetch(&self, error: GatewayError) {
        let mut guard = self.fetch_error.lock().unwrap();
        *guard = Some(error);
    }

    /// Recorded `search` calls as `(query, max_results)`.
    pub fn searches(&self) -> Vec<(String, usize)> {
        self.searches.lock().unwrap().clone()
    }

    /// Recorded `fetch_details` calls.
    pub fn fetches(&self) -> Vec<Vec<String>> {
        self.fetches.lock().unwrap().clone()
    }
}

#[async_trait]
impl LiteratureSource for MockSource {
    fn id(&self) -> &str {
        "mock"
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<String>, GatewayError> {
        self.searches
            .lock()
            .unwrap()
            .push((query.to_string(), max_results));

        if let Some(err) = self.search_error.lock().unwrap().take() {
            return Err(err);
        }

        let ids = self.ids.lock().unwrap();
        Ok(ids.iter().take(max_results).cloned().collect())
    }

    async fn fetch_details(&self, ids: &[String]) -> Result<ArticleSet, GatewayError> {
        self.fetches.lock().unwrap().push(ids.to_vec());

        if ids.is_empty() {
            return Err(GatewayError::InvalidArgument("No PMIDs provided".to_string()));
        }

        if let Some(err) = self.fetch_error.lock().unwrap().take() {
            return Err(err);
        }

        let xml = self.details_xml.lock().unwrap().clone();
        match xml {
            Some(xml) => Ok(ArticleSet::parse(&xml)?),
            None => Ok(ArticleSet::parse("<PubmedArticleSet/>")?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_search_truncates_and_records() {
        let source = MockSource::new();
        source.set_search_ids(["1", "2", "3"]);

        assert_eq!(source.id(), "mock");
        let ids = source.search("cancer", 2).await.unwrap();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(source.searches(), vec![("cancer".to_string(), 2)]);
    }

    #[tokio::test]
    async fn test_mock_errors_fire_once() {
        let source = MockSource::new();
        source.fail_search(GatewayError::Network("down".to_string()));

        assert!(source.search("q", 10).await.is_err());
        assert!(source.search("q", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mock_fetch() {
        let source = MockSource::new();
        source.set_details_xml(
            "<PubmedArticleSet><PubmedArticle><PMID>1</PMID></PubmedArticle></PubmedArticleSet>",
        );

        let set = source.fetch_details(&["1".to_string()]).await.unwrap();
        assert_eq!(set.articles().len(), 1);

        let err = source.fetch_details(&[]).await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidArgument(_)));
        assert_eq!(source.fetches().len(), 2);
    }
}
