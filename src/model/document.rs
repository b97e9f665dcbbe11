//! Document-level types.

use super::Page;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A layout-analyzed document, as handed over by the layout extraction service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Pages in reading order
    pub pages: Vec<Page>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self { pages: Vec::new() }
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&Page> {
        self.pages.iter().find(|p| p.number == page_num)
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Number of figure regions across pages that carry an image.
    pub fn figure_count(&self) -> usize {
        self.pages
            .iter()
            .filter(|p| p.has_figures())
            .map(|p| p.figures.len())
            .sum()
    }
}

/// Where a document came from; carried onto every output record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Original document key (object key or path)
    pub key: String,

    /// Public URL of the document
    pub url: Option<String>,

    /// Caller-supplied identifier passed through to every record
    pub source_id: Option<String>,
}

impl SourceInfo {
    /// Create source info for a document key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            url: None,
            source_id: None,
        }
    }

    /// Set the public document URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the pass-through source identifier.
    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    /// Document identifier: the file name component of the key.
    pub fn doc_id(&self) -> String {
        Path::new(&self.key)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.key.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_new() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.page_count(), 0);
    }

    #[test]
    fn test_get_page_by_number() {
        let mut doc = Document::new();
        doc.add_page(Page::new(1));
        doc.add_page(Page::new(2));
        assert_eq!(doc.get_page(2).map(|p| p.number), Some(2));
        assert!(doc.get_page(0).is_none());
        assert!(doc.get_page(3).is_none());
    }

    #[test]
    fn test_doc_id_is_file_name() {
        let source = SourceInfo::new("publications/2024/wi-admin-tax-16.pdf");
        assert_eq!(source.doc_id(), "wi-admin-tax-16.pdf");
        assert_eq!(SourceInfo::new("plain.pdf").doc_id(), "plain.pdf");
    }
}
