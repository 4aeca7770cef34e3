//! PubMed record parser.
//!
//! Turns the efetch [`ArticleSet`] into [`Paper`] values. A record that cannot
//! be turned into a paper is logged and skipped; the rest of the batch is
//! still returned.

mod date;

pub use date::{date_from_element, month_number, resolve_publication_date, DATE_CANDIDATES};

use regex::Regex;
use std::sync::OnceLock;

use crate::models::{ArticleSet, Author, DocumentError, Paper, PaperBuilder, XmlElement};

static EMAIL_PATTERN: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_PATTERN.get_or_init(|| {
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
            .expect("email pattern is a valid regex")
    })
}

/// Why a single article record was skipped
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArticleError {
    #[error("article without PMID")]
    MissingPmid,

    #[error("article {0} without title")]
    MissingTitle(String),

    #[error("article {pmid} is malformed: {reason}")]
    Malformed { pmid: String, reason: String },
}

/// Parse every article in the set, skipping the ones that fail
pub fn parse_papers(articles: &ArticleSet) -> Vec<Paper> {
    let mut papers = Vec::new();

    for article in articles.articles() {
        match parse_article(article) {
            Ok(paper) => {
                tracing::debug!("Parsed paper {}: {}", paper.pmid, preview(&paper.title, 50));
                papers.push(paper);
            }
            Err(err @ (ArticleError::MissingPmid | ArticleError::MissingTitle(_))) => {
                tracing::warn!("Skipping {}", err);
            }
            Err(err) => {
                tracing::error!("Error parsing article: {}", err);
            }
        }
    }

    tracing::info!("Successfully parsed {} papers", papers.len());
    papers
}

/// Parse an efetch response body and then its articles
pub fn parse_papers_from_str(xml: &str) -> Result<Vec<Paper>, DocumentError> {
    let articles = ArticleSet::parse(xml)?;
    Ok(parse_papers(&articles))
}

/// Parse a single `PubmedArticle` element
pub fn parse_article(article: &XmlElement) -> Result<Paper, ArticleError> {
    let pmid = article
        .find("PMID")
        .map(XmlElement::text)
        .filter(|id| !id.is_empty())
        .ok_or(ArticleError::MissingPmid)?
        .to_string();

    if let Some(reason) = article.first_decode_error() {
        return Err(ArticleError::Malformed {
            pmid,
            reason: reason.to_string(),
        });
    }

    let title = article
        .find("ArticleTitle")
        .map(XmlElement::full_text)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ArticleError::MissingTitle(pmid.clone()))?;

    Ok(PaperBuilder::new(pmid, title)
        .publication_date(resolve_publication_date(article))
        .authors(parse_authors(article))
        .build())
}

/// Authors of an article, in listed order.
///
/// Entries without a family name (collective names, for instance) are skipped.
pub fn parse_authors(article: &XmlElement) -> Vec<Author> {
    let Some(author_list) = article.find("AuthorList") else {
        tracing::debug!("No author list found in article");
        return Vec::new();
    };

    author_list
        .children_named("Author")
        .filter_map(|entry| {
            let last_name = entry.child_text("LastName")?;
            let first_name = entry.child_text("ForeName").unwrap_or_default();
            let affiliation = entry
                .find("Affiliation")
                .map(XmlElement::full_text)
                .unwrap_or_default();
            let email = extract_email(&affiliation);

            Some(Author {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                affiliation,
                email,
            })
        })
        .collect()
}

/// First email address embedded in free text
pub fn extract_email(text: &str) -> Option<String> {
    email_regex().find(text).map(|m| m.as_str().to_string())
}

fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" ?>
<!DOCTYPE PubmedArticleSet PUBLIC "-//NLM//DTD PubMedArticle, 1st January 2024//EN" "https://dtd.nlm.nih.gov/ncbi/pubmed/out/pubmed_240101.dtd">
<PubmedArticleSet>
  <PubmedArticle>
    <MedlineCitation Status="MEDLINE" Owner="NLM">
      <PMID Version="1">38000001</PMID>
      <DateCompleted><Year>2024</Year><Month>01</Month><Day>10</Day></DateCompleted>
      <Article PubModel="Print-Electronic">
        <Journal>
          <JournalIssue CitedMedium="Internet">
            <PubDate><Year>2023</Year><Month>Dec</Month></PubDate>
          </JournalIssue>
        </Journal>
        <ArticleTitle>A phase 2 trial of <i>KRAS</i> inhibitors.</ArticleTitle>
        <AuthorList CompleteYN="Y">
          <Author ValidYN="Y">
            <LastName>Doe</LastName>
            <ForeName>John</ForeName>
            <AffiliationInfo>
              <Affiliation>Pfizer Inc., New York, NY, USA. john.doe@pfizer.com.</Affiliation>
            </AffiliationInfo>
          </Author>
          <Author ValidYN="Y">
            <LastName>Smith</LastName>
            <ForeName>Jane</ForeName>
            <AffiliationInfo>
              <Affiliation>University of California, San Francisco.</Affiliation>
            </AffiliationInfo>
          </Author>
          <Author ValidYN="Y">
            <CollectiveName>KRAS Study Group</CollectiveName>
          </Author>
        </AuthorList>
        <ArticleDate DateType="Electronic"><Year>2023</Year><Month>11</Month><Day>28</Day></ArticleDate>
      </Article>
    </MedlineCitation>
  </PubmedArticle>
  <PubmedArticle>
    <MedlineCitation>
      <Article><ArticleTitle>No identifier here</ArticleTitle></Article>
    </MedlineCitation>
  </PubmedArticle>
  <PubmedArticle>
    <MedlineCitation>
      <PMID>38000003</PMID>
      <Article><ArticleTitle></ArticleTitle></Article>
    </MedlineCitation>
  </PubmedArticle>
  <PubmedArticle>
    <MedlineCitation>
      <PMID>38000004</PMID>
      <Article><ArticleTitle>Editorial without authors</ArticleTitle></Article>
    </MedlineCitation>
  </PubmedArticle>
</PubmedArticleSet>"#;

    #[test]
    fn test_parse_papers_skips_bad_records() {
        let papers = parse_papers_from_str(SAMPLE).unwrap();

        assert_eq!(papers.len(), 2);
        assert_eq!(papers[0].pmid, "38000001");
        assert_eq!(papers[1].pmid, "38000004");
    }

    #[test]
    fn test_parse_full_record() {
        let papers = parse_papers_from_str(SAMPLE).unwrap();
        let paper = &papers[0];

        assert_eq!(paper.title, "A phase 2 trial of KRAS inhibitors.");
        assert_eq!(paper.publication_date, "2023-11-28");
        assert_eq!(paper.authors.len(), 2);
        assert_eq!(paper.authors[0].full_name(), "John Doe");
        assert_eq!(paper.authors[0].email.as_deref(), Some("john.doe@pfizer.com"));
        assert_eq!(paper.authors[1].email, None);
        assert_eq!(
            paper.corresponding_author_email.as_deref(),
            Some("john.doe@pfizer.com")
        );
    }

    #[test]
    fn test_article_without_author_list() {
        let papers = parse_papers_from_str(SAMPLE).unwrap();
        let editorial = &papers[1];

        assert!(editorial.authors.is_empty());
        assert_eq!(editorial.corresponding_author_email, None);
        assert_eq!(editorial.publication_date, "1900-01-01");
    }

    #[test]
    fn test_parse_article_errors() {
        let no_pmid = XmlElement::parse(
            "<PubmedArticle><ArticleTitle>T</ArticleTitle></PubmedArticle>",
        )
        .unwrap();
        assert_eq!(parse_article(&no_pmid), Err(ArticleError::MissingPmid));

        let no_title = XmlElement::parse("<PubmedArticle><PMID>9</PMID></PubmedArticle>").unwrap();
        assert_eq!(
            parse_article(&no_title),
            Err(ArticleError::MissingTitle("9".to_string()))
        );
    }

    #[test]
    fn test_malformed_record_does_not_abort_batch() {
        let xml = r#"<PubmedArticleSet>
  <PubmedArticle><PMID>1</PMID><ArticleTitle>Broken &nonsense; title</ArticleTitle></PubmedArticle>
  <PubmedArticle><PMID>2</PMID><ArticleTitle>Fine title</ArticleTitle></PubmedArticle>
</PubmedArticleSet>"#;

        let set = ArticleSet::parse(xml).unwrap();
        assert!(matches!(
            parse_article(set.articles()[0]),
            Err(ArticleError::Malformed { .. })
        ));

        let papers = parse_papers(&set);
        assert_eq!(papers.len(), 1);
        assert_eq!(papers[0].pmid, "2");
    }

    #[test]
    fn test_parse_authors() {
        let article = XmlElement::parse(
            r#"<PubmedArticle>
            <AuthorList>
                <Author>
                    <ForeName>John</ForeName>
                    <LastName>Doe</LastName>
                    <Affiliation>Pfizer Inc., New York, NY</Affiliation>
                </Author>
                <Author>
                    <ForeName>Jane</ForeName>
                    <LastName>Smith</LastName>
                    <Affiliation>University of California, email: jane@example.com</Affiliation>
                </Author>
                <Author>
                    <LastName>Solo</LastName>
                </Author>
                <Author>
                    <ForeName>Nameless</ForeName>
                </Author>
            </AuthorList>
        </PubmedArticle>"#,
        )
        .unwrap();

        let authors = parse_authors(&article);
        assert_eq!(authors.len(), 3);
        assert_eq!(authors[0].first_name, "John");
        assert_eq!(authors[0].last_name, "Doe");
        assert!(authors[0].affiliation.contains("Pfizer"));
        assert_eq!(authors[1].email.as_deref(), Some("jane@example.com"));
        assert_eq!(authors[2].full_name(), "Solo");
        assert_eq!(authors[2].affiliation, "");
    }

    #[test]
    fn test_extract_email() {
        assert_eq!(
            extract_email("Department of Medicine, University Hospital, email: test@example.com"),
            Some("test@example.com".to_string())
        );
        assert_eq!(extract_email("Department of Medicine, University Hospital"), None);
        assert_eq!(
            extract_email("a@b.co and c@d.org"),
            Some("a@b.co".to_string())
        );
        assert_eq!(extract_email("user@localhost"), None);
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("short", 50), "short");
        assert_eq!(preview("abcdef", 3), "abc...");
    }
}
