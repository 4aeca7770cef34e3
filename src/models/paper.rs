//! Paper and author models produced by the PubMed parser.

/// Date used when an article carries no usable date structure
pub const DEFAULT_PUBLICATION_DATE: &str = "1900-01-01";

/// An author of a paper as listed in the PubMed record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    /// Given name (may be empty)
    pub first_name: String,

    /// Family name (never empty for parsed authors)
    pub last_name: String,

    /// Free-text affiliation (empty when the record has none)
    pub affiliation: String,

    /// Email address found inside the affiliation text
    pub email: Option<String>,
}

impl Author {
    /// Create an author without an email address
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        affiliation: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            affiliation: affiliation.into(),
            email: None,
        }
    }

    /// Set the email address
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// "First Last", trimmed so a missing given name leaves no stray space
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// A PubMed paper
///
/// Created once by the parser and never mutated afterwards. Classification
/// results live in [`ClassifiedPaper`], not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paper {
    /// PubMed identifier
    pub pmid: String,

    /// Article title
    pub title: String,

    /// Publication date (YYYY-MM-DD)
    pub publication_date: String,

    /// Authors in the order PubMed lists them
    pub authors: Vec<Author>,

    /// First email address found among the authors
    pub corresponding_author_email: Option<String>,
}

impl Paper {
    /// Create a paper with no authors and the default publication date
    pub fn new(pmid: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            pmid: pmid.into(),
            title: title.into(),
            publication_date: DEFAULT_PUBLICATION_DATE.to_string(),
            authors: Vec::new(),
            corresponding_author_email: None,
        }
    }

    /// Email of the first author that has one
    pub fn first_author_email(&self) -> Option<&str> {
        self.authors
            .iter()
            .filter_map(|a| a.email.as_deref())
            .find(|e| !e.is_empty())
    }
}

/// Builder for constructing Paper objects
#[derive(Debug, Clone)]
pub struct PaperBuilder {
    paper: Paper,
}

impl PaperBuilder {
    /// Create a new builder with required fields
    pub fn new(pmid: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            paper: Paper::new(pmid, title),
        }
    }

    /// Set publication date
    pub fn publication_date(mut self, date: impl Into<String>) -> Self {
        self.paper.publication_date = date.into();
        self
    }

    /// Set authors
    pub fn authors(mut self, authors: Vec<Author>) -> Self {
        self.paper.authors = authors;
        self
    }

    /// Add a single author
    pub fn author(mut self, author: Author) -> Self {
        self.paper.authors.push(author);
        self
    }

    /// Set the corresponding author email explicitly
    pub fn corresponding_author_email(mut self, email: impl Into<String>) -> Self {
        self.paper.corresponding_author_email = Some(email.into());
        self
    }

    /// Build the Paper, deriving the corresponding author email from the
    /// authors when it was not set explicitly
    pub fn build(mut self) -> Paper {
        if self.paper.corresponding_author_email.is_none() {
            self.paper.corresponding_author_email =
                self.paper.first_author_email().map(str::to_string);
        }
        self.paper
    }
}

/// Industry annotation attached to a paper that passed the company filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Authors flagged as industry-affiliated, in paper order
    pub company_authors: Vec<Author>,

    /// Distinct company names, in first-seen order
    pub company_affiliations: Vec<String>,
}

/// A paper together with its classification
///
/// Only papers with at least one company author are ever wrapped in this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedPaper {
    pub paper: Paper,
    pub classification: Classification,
}

impl ClassifiedPaper {
    /// Company authors' full names
    pub fn company_author_names(&self) -> Vec<String> {
        self.classification
            .company_authors
            .iter()
            .map(Author::full_name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        assert_eq!(Author::new("John", "Doe", "").full_name(), "John Doe");
        assert_eq!(Author::new("", "Doe", "").full_name(), "Doe");
    }

    #[test]
    fn test_paper_builder() {
        let paper = PaperBuilder::new("12345", "Test Paper")
            .publication_date("2023-01-01")
            .author(Author::new("Jane", "Smith", "Roche"))
            .author(Author::new("John", "Doe", "Pfizer Inc.").with_email("john@pfizer.com"))
            .build();

        assert_eq!(paper.pmid, "12345");
        assert_eq!(paper.publication_date, "2023-01-01");
        assert_eq!(paper.authors.len(), 2);
        assert_eq!(
            paper.corresponding_author_email,
            Some("john@pfizer.com".to_string())
        );
    }

    #[test]
    fn test_paper_defaults() {
        let paper = Paper::new("1", "Untitled");
        assert_eq!(paper.publication_date, DEFAULT_PUBLICATION_DATE);
        assert!(paper.authors.is_empty());
        assert!(paper.first_author_email().is_none());
    }
}
