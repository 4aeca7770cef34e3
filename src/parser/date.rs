//! Publication date resolution.

use chrono::NaiveDate;

use crate::models::{XmlElement, DEFAULT_PUBLICATION_DATE};

/// Date structures tried in order; the first one that yields a real
/// calendar date wins.
pub const DATE_CANDIDATES: [&str; 4] = ["ArticleDate", "PubDate", "DateCompleted", "DateRevised"];

const MONTHS: [(&str, &str); 12] = [
    ("Jan", "01"),
    ("Feb", "02"),
    ("Mar", "03"),
    ("Apr", "04"),
    ("May", "05"),
    ("Jun", "06"),
    ("Jul", "07"),
    ("Aug", "08"),
    ("Sep", "09"),
    ("Oct", "10"),
    ("Nov", "11"),
    ("Dec", "12"),
];

/// Resolve an article's publication date as `YYYY-MM-DD`
pub fn resolve_publication_date(article: &XmlElement) -> String {
    DATE_CANDIDATES
        .iter()
        .filter_map(|name| article.find(name))
        .find_map(date_from_element)
        .unwrap_or_else(|| DEFAULT_PUBLICATION_DATE.to_string())
}

/// Assemble and validate a date from a `Year`/`Month`/`Day` element.
///
/// Missing parts default to 1900, 01 and 01.
pub fn date_from_element(element: &XmlElement) -> Option<String> {
    let year = element.child_text("Year").unwrap_or("1900");
    let month = element.child_text("Month").unwrap_or("01");
    let day = element.child_text("Day").unwrap_or("01");

    let month = month_number(month).unwrap_or(month);
    let date = format!("{}-{}-{}", year, zero_pad(month), zero_pad(day));

    // chrono's %Y also takes short years
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        tracing::debug!("Ignoring {} '{}': year is not four digits", element.name, date);
        return None;
    }

    match NaiveDate::parse_from_str(&date, "%Y-%m-%d") {
        Ok(_) => Some(date),
        Err(e) => {
            tracing::debug!("Ignoring invalid {} '{}': {}", element.name, date, e);
            None
        }
    }
}

/// Two-digit month for a three-letter English month name
pub fn month_number(name: &str) -> Option<&'static str> {
    MONTHS
        .iter()
        .find(|(abbr, _)| *abbr == name)
        .map(|(_, number)| *number)
}

fn zero_pad(part: &str) -> String {
    format!("{:0>2}", part)
}
