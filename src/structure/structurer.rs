//! Turns a layout document into a tagged line stream and a line/page index.

use unicode_normalization::UnicodeNormalization;

use super::options::{LinearizationConfig, TITLE_MARKER};
use crate::model::{Document, Page};

/// A cleaned line and the page it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredLine {
    /// Trimmed line text (may still carry structural tags)
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
}

/// Ordered `(line, page)` index over every non-empty line of a document.
///
/// This is the only source of truth for page attribution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineIndex {
    lines: Vec<StructuredLine>,
}

impl LineIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line.
    pub fn push(&mut self, text: impl Into<String>, page: u32) {
        self.lines.push(StructuredLine {
            text: text.into(),
            page,
        });
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Iterate lines in document order.
    pub fn iter(&self) -> std::slice::Iter<'_, StructuredLine> {
        self.lines.iter()
    }

    /// All lines joined with newlines.
    pub fn joined(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<'a> IntoIterator for &'a LineIndex {
    type Item = &'a StructuredLine;
    type IntoIter = std::slice::Iter<'a, StructuredLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

impl FromIterator<(String, u32)> for LineIndex {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        let mut index = LineIndex::new();
        for (text, page) in iter {
            index.push(text, page);
        }
        index
    }
}

/// Output of the structurer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredDocument {
    /// Title blocks (one block for statute documents)
    pub header_split: Vec<String>,
    /// Line/page index
    pub lines: LineIndex,
}

impl StructuredDocument {
    /// Build a structured document from raw `(line, page)` pairs, splitting
    /// on title markers unless `is_statute`.
    pub fn from_lines(lines: LineIndex, is_statute: bool) -> Self {
        let joined = lines.joined();
        let header_split = if is_statute {
            vec![joined]
        } else {
            joined.split(TITLE_MARKER).map(str::to_string).collect()
        };
        Self {
            header_split,
            lines,
        }
    }
}

/// Line/page structurer.
#[derive(Debug, Clone)]
pub struct Structurer {
    config: LinearizationConfig,
    is_statute: bool,
    normalize_unicode: bool,
}

impl Structurer {
    /// Create a structurer for a document class.
    pub fn new(is_statute: bool) -> Self {
        Self {
            config: LinearizationConfig::for_statute(is_statute),
            is_statute,
            normalize_unicode: true,
        }
    }

    /// Replace the linearization config.
    pub fn with_config(mut self, config: LinearizationConfig) -> Self {
        self.config = config;
        self
    }

    /// Enable or disable NFC normalization of block text.
    pub fn with_unicode_normalization(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }

    /// Linearize every page and build the line index.
    pub fn structure(&self, doc: &Document) -> StructuredDocument {
        let mut lines = LineIndex::new();

        for page in &doc.pages {
            let page_text = self.linearize_page(page);
            for line in page_text.lines().map(str::trim).filter(|l| !l.is_empty()) {
                lines.push(line, page.number);
            }
        }

        log::debug!(
            "Structured {} pages into {} lines",
            doc.page_count(),
            lines.len()
        );

        StructuredDocument::from_lines(lines, self.is_statute)
    }

    /// Linearize a single page to tagged text.
    pub fn linearize_page(&self, page: &Page) -> String {
        page.blocks
            .iter()
            .filter_map(|block| {
                let text = if self.normalize_unicode {
                    block.text.nfc().collect::<String>()
                } else {
                    block.text.clone()
                };
                let text = text.trim();
                if text.is_empty() {
                    return None;
                }
                self.config.render(block, text)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LayoutBlock, LayoutKind};

    fn sample_document() -> Document {
        let mut doc = Document::new();
        doc.add_page(
            Page::new(1)
                .with_block(LayoutBlock::new(LayoutKind::Header, "Guide 2024"))
                .with_block(LayoutBlock::title("Part One"))
                .with_block(LayoutBlock::text("I. Overview\n\n  first body line  ")),
        );
        doc.add_page(
            Page::new(2)
                .with_block(LayoutBlock::title("Part Two"))
                .with_block(LayoutBlock::text("second body line"))
                .with_block(LayoutBlock::new(LayoutKind::PageNumber, "2")),
        );
        doc
    }

    #[test]
    fn test_line_index_pairs_lines_with_pages() {
        let structured = Structurer::new(false).structure(&sample_document());
        let pairs: Vec<(&str, u32)> = structured
            .lines
            .iter()
            .map(|l| (l.text.as_str(), l.page))
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("<titles><<title>><title>Part One</title><</title>>", 1),
                ("I. Overview", 1),
                ("first body line", 1),
                ("<titles><<title>><title>Part Two</title><</title>>", 2),
                ("second body line", 2),
            ]
        );
    }

    #[test]
    fn test_tagged_output_splits_on_titles() {
        let structured = Structurer::new(false).structure(&sample_document());
        assert_eq!(structured.header_split.len(), 3);
        assert_eq!(structured.header_split[0], "");
        assert!(structured.header_split[1].starts_with("<<title>><title>Part One"));
        assert!(structured.header_split[2].contains("second body line"));
    }

    #[test]
    fn test_statute_output_is_single_block() {
        let structured = Structurer::new(true).structure(&sample_document());
        assert_eq!(structured.header_split.len(), 1);
        // Nothing hidden: header and page number survive.
        assert_eq!(structured.lines.len(), 7);
        assert!(structured.header_split[0].starts_with("Guide 2024\nPart One"));
    }

    #[test]
    fn test_empty_blocks_are_skipped() {
        let mut doc = Document::new();
        doc.add_page(Page::new(1).with_block(LayoutBlock::title("   ")));
        let structured = Structurer::new(false).structure(&doc);
        assert!(structured.lines.is_empty());
    }

    #[test]
    fn test_unicode_normalization() {
        let mut doc = Document::new();
        doc.add_page(Page::from_text(1, "cafe\u{0301}"));
        let structured = Structurer::new(true).structure(&doc);
        assert_eq!(structured.lines.iter().next().unwrap().text, "caf\u{e9}");

        let raw = Structurer::new(true)
            .with_unicode_normalization(false)
            .structure(&doc);
        assert_eq!(raw.lines.iter().next().unwrap().text, "cafe\u{0301}");
    }
}
