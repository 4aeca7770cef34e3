//! Core data models for papers, authors and their classification, plus the
//! raw XML document handed from the fetch call to the parser.

mod document;
mod paper;

pub use document::{ArticleSet, DocumentError, XmlElement, ARTICLE_TAG};
pub use paper::{
    Author, Classification, ClassifiedPaper, Paper, PaperBuilder, DEFAULT_PUBLICATION_DATE,
};
