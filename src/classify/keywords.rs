//! Keyword sets driving the affiliation heuristics.
//!
//! Every list is plain configuration data and can be replaced from the
//! `[keywords]` section of the configuration file:
//!
//! ```toml
//! [keywords]
//! pharma_keywords = ["pfizer", "novartis", "my biotech startup"]
//! corporate_domains = ["pfizer.com", "mybiotech.io"]
//! ```
//!
//! A category missing from the file keeps its built-in list.

use serde::{Deserialize, Serialize};

/// Substring lists used by [`AffiliationClassifier`](super::AffiliationClassifier)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordSets {
    /// Any match marks an affiliation as academic
    pub academic_indicators: Vec<String>,

    /// Named companies and generic pharma/biotech terms
    pub pharma_keywords: Vec<String>,

    /// Legal-entity markers for companies missing from `pharma_keywords`
    pub corporate_suffixes: Vec<String>,

    /// Domain terms that must accompany a corporate suffix
    pub business_keywords: Vec<String>,

    /// Email domains of known pharma companies
    pub corporate_domains: Vec<String>,

    /// Substrings that keep a `.com` domain from counting as corporate
    pub non_corporate_domain_markers: Vec<String>,

    /// Suffixes stripped from extracted company names (case-sensitive)
    pub company_name_suffixes: Vec<String>,
}

impl Default for KeywordSets {
    fn default() -> Self {
        Self {
            academic_indicators: to_strings(ACADEMIC_INDICATORS),
            pharma_keywords: to_strings(PHARMA_KEYWORDS),
            corporate_suffixes: to_strings(CORPORATE_SUFFIXES),
            business_keywords: to_strings(BUSINESS_KEYWORDS),
            corporate_domains: to_strings(CORPORATE_DOMAINS),
            non_corporate_domain_markers: to_strings(NON_CORPORATE_DOMAIN_MARKERS),
            company_name_suffixes: to_strings(COMPANY_NAME_SUFFIXES),
        }
    }
}

impl KeywordSets {
    /// Copy with every case-insensitive list lower-cased.
    ///
    /// `company_name_suffixes` is left untouched.
    pub fn normalized(&self) -> Self {
        Self {
            academic_indicators: lowercase_all(&self.academic_indicators),
            pharma_keywords: lowercase_all(&self.pharma_keywords),
            corporate_suffixes: lowercase_all(&self.corporate_suffixes),
            business_keywords: lowercase_all(&self.business_keywords),
            corporate_domains: lowercase_all(&self.corporate_domains),
            non_corporate_domain_markers: lowercase_all(&self.non_corporate_domain_markers),
            company_name_suffixes: self.company_name_suffixes.clone(),
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn lowercase_all(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|s| s.to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

const ACADEMIC_INDICATORS: &[&str] = &[
    ".edu",
    "university",
    "college",
    "school of",
    "medical school",
    "institute of",
    "department of",
    "faculty of",
    "academic",
];

const PHARMA_KEYWORDS: &[&str] = &[
    // Named companies
    "pfizer",
    "novartis",
    "roche",
    "merck",
    "johnson & johnson",
    "j&j",
    "bristol myers squibb",
    "bms",
    "abbvie",
    "amgen",
    "gilead",
    "biogen",
    "regeneron",
    "vertex",
    "moderna",
    "biontech",
    "gsk",
    "glaxosmithkline",
    "sanofi",
    "takeda",
    "astrazeneca",
    "eli lilly",
    "lilly",
    "boehringer ingelheim",
    "celgene",
    "alexion",
    "incyte",
    "illumina",
    "genentech",
    "immunogen",
    "seagen",
    "seattle genetics",
    "gilead sciences",
    "biogen idec",
    // Generic industry terms
    "pharmaceuticals",
    "pharma",
    "biotech",
    "biotechnology",
    "therapeutic",
    "therapeutics",
    "drug development",
    "clinical research",
    // Legal entities
    "inc.",
    "corp.",
    "corporation",
    "ltd.",
    "limited",
    "company",
    "co.",
];

const CORPORATE_SUFFIXES: &[&str] = &["inc.", "corp.", "ltd.", "limited", "llc", "gmbh"];

const BUSINESS_KEYWORDS: &[&str] = &[
    "pharmaceutical",
    "biotech",
    "therapeutic",
    "drug",
    "clinical",
];

const CORPORATE_DOMAINS: &[&str] = &[
    "pfizer.com",
    "novartis.com",
    "roche.com",
    "merck.com",
    "jnj.com",
    "bms.com",
    "abbvie.com",
    "amgen.com",
    "gilead.com",
    "biogen.com",
    "regeneron.com",
    "vrtx.com",
    "modernatx.com",
    "biontech.de",
    "gsk.com",
    "sanofi.com",
];

const NON_CORPORATE_DOMAIN_MARKERS: &[&str] = &["edu", "ac.", "univ"];

const COMPANY_NAME_SUFFIXES: &[&str] = &[" Inc", " Corp", " Ltd", " Limited", " LLC", " GmbH"];
