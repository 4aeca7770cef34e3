//! Affiliation classification: industry vs. academic authors.
//!
//! The heuristic is a flat rule chain over substring matches:
//!
//! 1. Empty text is never a company.
//! 2. Any academic indicator wins and short-circuits everything else.
//! 3. A pharma keyword (named company or generic industry term) is a company.
//! 4. Otherwise a corporate suffix only counts together with a business keyword,
//!    so an arbitrary "Software Ltd." does not qualify.
//!
//! The lists themselves live in [`KeywordSets`] and come from configuration.

mod keywords;

pub use keywords::KeywordSets;

use crate::models::{Classification, ClassifiedPaper, Paper};

/// Stateless industry-affiliation classifier
#[derive(Debug, Clone)]
pub struct AffiliationClassifier {
    keywords: KeywordSets,
}

impl Default for AffiliationClassifier {
    fn default() -> Self {
        Self::new(KeywordSets::default())
    }
}

impl AffiliationClassifier {
    /// Create a classifier from keyword sets (lower-cased here once)
    pub fn new(keywords: KeywordSets) -> Self {
        Self {
            keywords: keywords.normalized(),
        }
    }

    /// Whether the affiliation names an academic institution
    pub fn is_academic(&self, affiliation: &str) -> bool {
        let lower = affiliation.to_lowercase();
        first_match(&lower, &self.keywords.academic_indicators).is_some()
    }

    /// Whether the affiliation looks like a pharmaceutical/biotech company
    pub fn is_company_affiliation(&self, affiliation: &str) -> bool {
        if affiliation.is_empty() || self.is_academic(affiliation) {
            return false;
        }

        let lower = affiliation.to_lowercase();

        if let Some(keyword) = first_match(&lower, &self.keywords.pharma_keywords) {
            tracing::debug!("Found pharma keyword '{}' in: {}", keyword, affiliation);
            return true;
        }

        first_match(&lower, &self.keywords.corporate_suffixes).is_some()
            && first_match(&lower, &self.keywords.business_keywords).is_some()
    }

    /// Whether the email domain suggests a corporate address
    pub fn is_corporate_email(&self, email: &str) -> bool {
        let Some(domain) = email_domain(email) else {
            return false;
        };

        if self.keywords.corporate_domains.iter().any(|d| *d == domain) {
            return true;
        }

        domain.ends_with(".com")
            && first_match(&domain, &self.keywords.non_corporate_domain_markers).is_none()
    }

    /// Company name from a company affiliation, or `None` for anything else
    pub fn extract_company_name(&self, affiliation: &str) -> Option<String> {
        if !self.is_company_affiliation(affiliation) {
            return None;
        }

        let before_comma = affiliation.split(',').next().unwrap_or_default().trim();
        let mut name = before_comma.split('.').next().unwrap_or_default().trim();

        for suffix in &self.keywords.company_name_suffixes {
            if let Some(stripped) = name.strip_suffix(suffix.as_str()) {
                name = stripped.trim();
            }
        }

        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }

    /// Classify a single paper.
    ///
    /// Returns `None` when no author qualifies.
    pub fn classify(&self, paper: &Paper) -> Option<Classification> {
        // Indices into paper.authors: two entries with identical fields are
        // still two authors.
        let mut selected: Vec<usize> = Vec::new();
        let mut company_affiliations: Vec<String> = Vec::new();

        for (index, author) in paper.authors.iter().enumerate() {
            if self.is_company_affiliation(&author.affiliation) {
                selected.push(index);
                if let Some(company) = self.extract_company_name(&author.affiliation) {
                    if !company_affiliations.contains(&company) {
                        company_affiliations.push(company);
                    }
                }
            }

            let corporate_email = author
                .email
                .as_deref()
                .is_some_and(|email| !email.is_empty() && self.is_corporate_email(email));
            if corporate_email && !selected.contains(&index) {
                selected.push(index);
            }
        }

        if selected.is_empty() {
            return None;
        }

        Some(Classification {
            company_authors: selected
                .into_iter()
                .map(|i| paper.authors[i].clone())
                .collect(),
            company_affiliations,
        })
    }

    /// Keep only papers with at least one company author, annotated, in input order
    pub fn filter_papers(&self, papers: Vec<Paper>) -> Vec<ClassifiedPaper> {
        let total = papers.len();

        let classified: Vec<ClassifiedPaper> = papers
            .into_iter()
            .filter_map(|paper| {
                let classification = self.classify(&paper)?;
                tracing::debug!(
                    "Paper {} has {} company authors",
                    paper.pmid,
                    classification.company_authors.len()
                );
                Some(ClassifiedPaper {
                    paper,
                    classification,
                })
            })
            .collect();

        tracing::info!(
            "Filtered {} papers with company authors from {} total papers",
            classified.len(),
            total
        );
        classified
    }
}

/// Lower-cased domain of an email address, if it has one
fn email_domain(email: &str) -> Option<String> {
    let domain = email.split('@').nth(1)?.to_lowercase();
    if domain.is_empty() {
        None
    } else {
        Some(domain)
    }
}

fn first_match<'a>(haystack: &str, needles: &'a [String]) -> Option<&'a str> {
    needles
        .iter()
        .find(|needle| haystack.contains(needle.as_str()))
        .map(String::as_str)
}
