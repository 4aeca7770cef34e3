//! Raw XML document returned by the fetch call.
//!
//! PubMed's efetch output is read into a small element tree so the parser can
//! look records up by element name the same way regardless of which optional
//! sub-structures a record carries.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Element name of a single article record
pub const ARTICLE_TAG: &str = "PubmedArticle";

/// Deepest element nesting accepted; the tree walks below are recursive
pub const MAX_DEPTH: usize = 256;

/// Errors raised while reading an XML document
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("unexpected closing tag </{0}>")]
    UnbalancedClose(String),

    #[error("unclosed element <{0}>")]
    Unclosed(String),

    #[error("document has no root element")]
    Empty,

    #[error("elements nested deeper than {0} levels")]
    TooDeep(usize),
}

/// An XML element with its text and child elements
///
/// Attributes are not kept. `text` holds the character data before the first
/// child and `tail` the character data between this element's end tag and the
/// next sibling, both untrimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub text: String,
    pub tail: String,
    pub children: Vec<XmlElement>,
    /// Set when a text node inside this element could not be unescaped
    pub decode_error: Option<String>,
}

impl XmlElement {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Append a child element (builder style, mostly for tests)
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Set the element's own text (builder style, mostly for tests)
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Parse a document and return its root element
    pub fn parse(xml: &str) -> Result<Self, DocumentError> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    if stack.len() >= MAX_DEPTH {
                        return Err(DocumentError::TooDeep(MAX_DEPTH));
                    }
                    stack.push(Self::from_start(&e));
                }
                Event::Empty(e) => {
                    let element = Self::from_start(&e);
                    attach(&mut stack, &mut root, element);
                }
                Event::End(e) => {
                    let element = stack.pop().ok_or_else(|| {
                        DocumentError::UnbalancedClose(
                            String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                        )
                    })?;
                    attach(&mut stack, &mut root, element);
                }
                Event::Text(t) => {
                    if let Some(top) = stack.last_mut() {
                        match t.unescape() {
                            Ok(text) => top.push_char_data(&text),
                            Err(err) => {
                                top.push_char_data(&String::from_utf8_lossy(&t));
                                top.decode_error.get_or_insert_with(|| err.to_string());
                            }
                        }
                    }
                }
                Event::CData(c) => {
                    if let Some(top) = stack.last_mut() {
                        top.push_char_data(&String::from_utf8_lossy(&c.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.pop() {
            return Err(DocumentError::Unclosed(open.name));
        }
        root.ok_or(DocumentError::Empty)
    }

    fn from_start(e: &BytesStart<'_>) -> Self {
        Self::new(String::from_utf8_lossy(e.name().as_ref()).into_owned())
    }

    fn push_char_data(&mut self, data: &str) {
        match self.children.last_mut() {
            Some(last) => last.tail.push_str(data),
            None => self.text.push_str(data),
        }
    }

    /// Own text, trimmed
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// Own text plus all descendant text in document order, trimmed
    pub fn full_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out.trim().to_string()
    }

    fn collect_text(&self, out: &mut String) {
        out.push_str(&self.text);
        for child in &self.children {
            child.collect_text(out);
            out.push_str(&child.tail);
        }
    }

    /// First direct child with the given name
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children with the given name
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Trimmed text of the first direct child with the given name
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(XmlElement::text).filter(|t| !t.is_empty())
    }

    /// First descendant (depth-first, document order) with the given name
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        for child in &self.children {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.find(name) {
                return Some(found);
            }
        }
        None
    }

    /// All descendants with the given name, in document order
    pub fn find_all<'a>(&'a self, name: &str) -> Vec<&'a XmlElement> {
        let mut out = Vec::new();
        self.collect_named(name, &mut out);
        out
    }

    fn collect_named<'a>(&'a self, name: &str, out: &mut Vec<&'a XmlElement>) {
        for child in &self.children {
            if child.name == name {
                out.push(child);
            }
            child.collect_named(name, out);
        }
    }

    /// First decode error in this element or any descendant
    pub fn first_decode_error(&self) -> Option<&str> {
        self.decode_error
            .as_deref()
            .or_else(|| self.children.iter().find_map(XmlElement::first_decode_error))
    }
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            // Anything after the first root-level element is ignored
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

/// The parsed efetch response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleSet {
    root: XmlElement,
}

impl ArticleSet {
    /// Wrap an already-parsed document root
    pub fn new(root: XmlElement) -> Self {
        Self { root }
    }

    /// Parse an efetch response body
    pub fn parse(xml: &str) -> Result<Self, DocumentError> {
        XmlElement::parse(xml).map(Self::new)
    }

    /// Document root element
    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    /// Every article record in the document, in order
    pub fn articles(&self) -> Vec<&XmlElement> {
        if self.root.name == ARTICLE_TAG {
            return vec![&self.root];
        }
        self.root.find_all(ARTICLE_TAG)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_document() {
        let xml = r#"<?xml version="1.0"?>
<!DOCTYPE PubmedArticleSet>
<PubmedArticleSet>
  <PubmedArticle><MedlineCitation><PMID Version="1">111</PMID></MedlineCitation></PubmedArticle>
  <PubmedArticle><MedlineCitation><PMID>222</PMID></MedlineCitation></PubmedArticle>
</PubmedArticleSet>"#;

        let set = ArticleSet::parse(xml).unwrap();
        assert_eq!(set.root().name, "PubmedArticleSet");

        let articles = set.articles();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].find("PMID").unwrap().text(), "111");
        assert_eq!(articles[1].find("PMID").unwrap().text(), "222");
    }

    #[test]
    fn test_full_text_flattens_markup() {
        let root =
            XmlElement::parse("<ArticleTitle>Role of <i>KRAS</i> mutations</ArticleTitle>").unwrap();
        assert_eq!(root.text(), "Role of");
        assert_eq!(root.full_text(), "Role of KRAS mutations");
    }

    #[test]
    fn test_entities_are_unescaped() {
        let root = XmlElement::parse("<Affiliation>R&amp;D, Pfizer Inc.</Affiliation>").unwrap();
        assert_eq!(root.text(), "R&D, Pfizer Inc.");
        assert!(root.first_decode_error().is_none());
    }

    #[test]
    fn test_undecodable_text_is_flagged_not_fatal() {
        let root =
            XmlElement::parse("<Set><A><T>bad &bogus; entity</T></A><A><T>ok</T></A></Set>")
                .unwrap();
        let articles = root.find_all("A");
        assert!(articles[0].first_decode_error().is_some());
        assert!(articles[1].first_decode_error().is_none());
    }

    #[test]
    fn test_empty_elements_and_child_text() {
        let root = XmlElement::parse("<IdList><Id>1</Id><Id/><Id> 3 </Id></IdList>").unwrap();
        let texts: Vec<&str> = root.children_named("Id").map(XmlElement::text).collect();
        assert_eq!(texts, vec!["1", "", "3"]);
        assert_eq!(root.child_text("Id"), Some("1"));
    }

    #[test]
    fn test_nesting_depth_is_capped() {
        let nested = |depth: usize| format!("{}{}", "<a>".repeat(depth), "</a>".repeat(depth));

        assert!(XmlElement::parse(&nested(MAX_DEPTH)).is_ok());
        assert!(matches!(
            XmlElement::parse(&nested(MAX_DEPTH + 1)),
            Err(DocumentError::TooDeep(MAX_DEPTH))
        ));
        assert!(matches!(
            XmlElement::parse(&nested(100_000)),
            Err(DocumentError::TooDeep(_))
        ));
    }

    #[test]
    fn test_mismatched_tags_fail() {
        assert!(XmlElement::parse("<a><b></a>").is_err());
        assert!(XmlElement::parse("<a><b></b>").is_err());
        assert!(matches!(XmlElement::parse(""), Err(DocumentError::Empty)));
    }
}
