//! End-to-end run: search, fetch, parse, classify, export.

use crate::classify::AffiliationClassifier;
use crate::export::{CsvExporter, ExportError, OutputTarget};
use crate::parser::parse_papers;
use crate::sources::{GatewayError, LiteratureSource};

/// How a run ended when nothing failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The search matched nothing
    NoSearchResults,
    /// Records were fetched but none could be parsed
    NoParsedPapers,
    /// Papers were parsed but none has a company author
    NoCompanyPapers,
    /// This many papers were written to the output
    Exported(usize),
}

/// Errors that abort a run
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Everything a run needs apart from the query
#[derive(Debug)]
pub struct Pipeline<'a, S: LiteratureSource + ?Sized> {
    source: &'a S,
    classifier: &'a AffiliationClassifier,
    exporter: CsvExporter,
}

impl<'a, S: LiteratureSource + ?Sized> Pipeline<'a, S> {
    pub fn new(source: &'a S, classifier: &'a AffiliationClassifier) -> Self {
        Self {
            source,
            classifier,
            exporter: CsvExporter::new(),
        }
    }

    /// Run the query and export matching papers to `target`.
    ///
    /// Empty intermediate results end the run early with a warning and are
    /// not errors.
    pub async fn run(
        &self,
        query: &str,
        max_results: usize,
        target: &OutputTarget,
    ) -> Result<RunOutcome, PipelineError> {
        tracing::info!("Searching {} for: {}", self.source.id(), query);

        let ids = self.source.search(query, max_results).await?;
        if ids.is_empty() {
            tracing::warn!("No papers found for the given query");
            return Ok(RunOutcome::NoSearchResults);
        }

        tracing::info!("Fetching details for {} papers", ids.len());
        let articles = self.source.fetch_details(&ids).await?;

        let papers = parse_papers(&articles);
        if papers.is_empty() {
            tracing::warn!("No papers could be parsed from the API response");
            return Ok(RunOutcome::NoParsedPapers);
        }

        tracing::info!("Filtering papers for pharmaceutical/biotech affiliations");
        let classified = self.classifier.filter_papers(papers);
        if classified.is_empty() {
            tracing::warn!("No papers found with pharmaceutical/biotech company affiliations");
            return Ok(RunOutcome::NoCompanyPapers);
        }

        self.exporter.export(&classified, target)?;
        tracing::info!(
            "Found {} papers with pharmaceutical/biotech company affiliations",
            classified.len()
        );

        Ok(RunOutcome::Exported(classified.len()))
    }
}

/// Run the whole pipeline once with a default exporter
pub async fn run<S: LiteratureSource + ?Sized>(
    source: &S,
    classifier: &AffiliationClassifier,
    query: &str,
    max_results: usize,
    target: &OutputTarget,
) -> Result<RunOutcome, PipelineError> {
    Pipeline::new(source, classifier)
        .run(query, max_results, target)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::MockSource;
    use tempfile::tempdir;

    const ONE_COMPANY_ONE_ACADEMIC: &str = r#"<PubmedArticleSet>
  <PubmedArticle>
    <MedlineCitation>
      <PMID>111</PMID>
      <Article>
        <ArticleTitle>Industry study</ArticleTitle>
        <AuthorList>
          <Author><LastName>Doe</LastName><ForeName>John</ForeName>
            <AffiliationInfo><Affiliation>Pfizer Inc., New York. john@pfizer.com</Affiliation></AffiliationInfo>
          </Author>
        </AuthorList>
        <ArticleDate><Year>2024</Year><Month>02</Month><Day>03</Day></ArticleDate>
      </Article>
    </MedlineCitation>
  </PubmedArticle>
  <PubmedArticle>
    <MedlineCitation>
      <PMID>222</PMID>
      <Article>
        <ArticleTitle>Academic study</ArticleTitle>
        <AuthorList>
          <Author><LastName>Smith</LastName><ForeName>Jane</ForeName>
            <AffiliationInfo><Affiliation>Harvard Medical School, Boston</Affiliation></AffiliationInfo>
          </Author>
        </AuthorList>
      </Article>
    </MedlineCitation>
  </PubmedArticle>
</PubmedArticleSet>"#;

    fn output_path(dir: &tempfile::TempDir) -> std::path::PathBuf {
        dir.path().join("out.csv")
    }

    #[tokio::test]
    async fn test_run_exports_company_papers() {
        let source = MockSource::new();
        source.set_search_ids(["111", "222"]);
        source.set_details_xml(ONE_COMPANY_ONE_ACADEMIC);
        let classifier = AffiliationClassifier::default();
        let dir = tempdir().unwrap();
        let path = output_path(&dir);

        let outcome = run(&source, &classifier, "cancer", 10, &OutputTarget::File(path.clone()))
            .await
            .unwrap();

        assert_eq!(outcome, RunOutcome::Exported(1));
        assert_eq!(source.fetches(), vec![vec!["111".to_string(), "222".to_string()]]);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("111,Industry study,2024-02-03,John Doe,Pfizer,john@pfizer.com"));
        assert!(!content.contains("222"));
    }

    #[tokio::test]
    async fn test_run_without_hits_skips_fetch() {
        let source = MockSource::new();
        let classifier = AffiliationClassifier::default();

        let outcome = run(&source, &classifier, "nothing", 10, &OutputTarget::Stdout)
            .await
            .unwrap();

        assert_eq!(outcome, RunOutcome::NoSearchResults);
        assert!(source.fetches().is_empty());
    }

    #[tokio::test]
    async fn test_run_with_unparsable_records() {
        let source = MockSource::new();
        source.set_search_ids(["1"]);
        source.set_details_xml(
            "<PubmedArticleSet><PubmedArticle><ArticleTitle>No id</ArticleTitle></PubmedArticle></PubmedArticleSet>",
        );
        let classifier = AffiliationClassifier::default();

        let outcome = run(&source, &classifier, "q", 10, &OutputTarget::Stdout)
            .await
            .unwrap();
        assert_eq!(outcome, RunOutcome::NoParsedPapers);
    }

    #[tokio::test]
    async fn test_run_without_company_papers_writes_nothing() {
        let source = MockSource::new();
        source.set_search_ids(["222"]);
        source.set_details_xml(
            r#"<PubmedArticleSet><PubmedArticle><PMID>222</PMID><ArticleTitle>Academic</ArticleTitle>
            <AuthorList><Author><LastName>Smith</LastName><Affiliation>University of Oxford</Affiliation></Author></AuthorList>
            </PubmedArticle></PubmedArticleSet>"#,
        );
        let classifier = AffiliationClassifier::default();
        let dir = tempdir().unwrap();
        let path = output_path(&dir);

        let outcome = run(&source, &classifier, "q", 10, &OutputTarget::File(path.clone()))
            .await
            .unwrap();

        assert_eq!(outcome, RunOutcome::NoCompanyPapers);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_gateway_errors_propagate() {
        let source = MockSource::new();
        source.fail_search(GatewayError::Status {
            status: 500,
            message: "boom".to_string(),
        });
        let classifier = AffiliationClassifier::default();

        let err = run(&source, &classifier, "q", 10, &OutputTarget::Stdout)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Gateway(GatewayError::Status { status: 500, .. })));

        source.set_search_ids(["1"]);
        source.fail_fetch(GatewayError::Timeout("slow".to_string()));
        let err = run(&source, &classifier, "q", 10, &OutputTarget::Stdout)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Gateway(GatewayError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_export_errors_propagate() {
        let source = MockSource::new();
        source.set_search_ids(["111"]);
        source.set_details_xml(ONE_COMPANY_ONE_ACADEMIC);
        let classifier = AffiliationClassifier::default();
        let dir = tempdir().unwrap();
        let target = OutputTarget::File(dir.path().join("missing/dir/out.csv"));

        let err = run(&source, &classifier, "q", 10, &target).await.unwrap_err();
        assert!(matches!(err, PipelineError::Export(ExportError::Io(_))));
    }

    #[tokio::test]
    async fn test_pipeline_with_trait_object() {
        let source: Box<dyn LiteratureSource> = Box::new(MockSource::new());
        let classifier = AffiliationClassifier::default();

        let outcome = Pipeline::new(source.as_ref(), &classifier)
            .run("q", 5, &OutputTarget::Stdout)
            .await
            .unwrap();
        assert_eq!(outcome, RunOutcome::NoSearchResults);
    }
}
