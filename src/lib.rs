//! # Pharma Papers
//!
//! Finds PubMed papers with at least one author affiliated with a
//! pharmaceutical or biotech company and exports them as CSV.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`sources`]: Search/fetch gateway toward PubMed E-utilities
//! - [`models`]: Core data structures (Paper, Author, the raw XML tree)
//! - [`parser`]: Turns efetch XML into papers
//! - [`classify`]: Industry-affiliation heuristics
//! - [`export`]: CSV output
//! - [`pipeline`]: The end-to-end run
//! - [`utils`]: HTTP client
//! - [`config`]: Configuration management

pub mod classify;
pub mod config;
pub mod export;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use classify::AffiliationClassifier;
pub use export::{CsvExporter, OutputTarget};
pub use models::{Author, ClassifiedPaper, Paper};
pub use pipeline::{PipelineError, RunOutcome};
pub use sources::{GatewayError, LiteratureSource, PubMedSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
