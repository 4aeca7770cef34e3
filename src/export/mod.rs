//! CSV export of classified papers.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::models::ClassifiedPaper;

/// Column headers, in output order
pub const HEADERS: [&str; 6] = [
    "PubmedID",
    "Title",
    "Publication Date",
    "Non-academic Author(s)",
    "Company Affiliation(s)",
    "Corresponding Author Email",
];

/// Separator used inside list-valued columns
pub const LIST_SEPARATOR: &str = "; ";

/// Where the CSV goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Create or truncate the file at this path
    File(PathBuf),
    /// Write to standard output
    Stdout,
}

impl OutputTarget {
    /// File target when a path is given, stdout otherwise
    pub fn from_path(path: Option<PathBuf>) -> Self {
        path.map(OutputTarget::File).unwrap_or(OutputTarget::Stdout)
    }
}

impl std::fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputTarget::File(path) => write!(f, "{}", path.display()),
            OutputTarget::Stdout => write!(f, "stdout"),
        }
    }
}

/// Errors that can occur while exporting
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Exporter for converting classified papers to CSV
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter;

impl CsvExporter {
    pub fn new() -> Self {
        Self
    }

    /// Export papers to the target.
    ///
    /// An empty slice writes nothing at all (no file is created).
    pub fn export(&self, papers: &[ClassifiedPaper], target: &OutputTarget) -> Result<(), ExportError> {
        if papers.is_empty() {
            tracing::warn!("No papers to export");
            return Ok(());
        }

        tracing::info!("Exporting {} papers to {}", papers.len(), target);

        match target {
            OutputTarget::File(path) => {
                let file = File::create(path)?;
                self.write_to(papers, file)?;
            }
            OutputTarget::Stdout => {
                let stdout = io::stdout();
                self.write_to(papers, stdout.lock())?;
            }
        }

        tracing::info!("Export completed successfully");
        Ok(())
    }

    /// Write the header and one row per paper to any writer
    pub fn write_to<W: Write>(&self, papers: &[ClassifiedPaper], writer: W) -> Result<(), ExportError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(HEADERS)?;

        for paper in papers {
            csv_writer.write_record(Self::row(paper))?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Cells of a single row
    pub fn row(paper: &ClassifiedPaper) -> [String; 6] {
        [
            paper.paper.pmid.clone(),
            paper.paper.title.clone(),
            paper.paper.publication_date.clone(),
            format_authors_list(paper),
            format_affiliations_list(&paper.classification.company_affiliations),
            paper
                .paper
                .corresponding_author_email
                .clone()
                .unwrap_or_default(),
        ]
    }
}

/// Company authors' names joined with `"; "`
pub fn format_authors_list(paper: &ClassifiedPaper) -> String {
    paper.company_author_names().join(LIST_SEPARATOR)
}

/// Company names joined with `"; "`
pub fn format_affiliations_list(affiliations: &[String]) -> String {
    affiliations.join(LIST_SEPARATOR)
}
