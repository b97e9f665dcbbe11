//! Chunk types produced by the chunkers and the clean-text filter.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Heading given to chunks produced from flowchart figures.
pub const FLOWCHART_HEADING: &str = "Flowchart";

/// An inclusive page span. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "PageBounds")]
pub struct PageRange {
    /// First page (1-indexed)
    #[serde(rename = "start_page")]
    pub start: u32,
    /// Last page (1-indexed)
    #[serde(rename = "end_page")]
    pub end: u32,
}

impl PageRange {
    /// Create a range from two bounds in either order.
    pub fn new(a: u32, b: u32) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// A range covering a single page.
    pub fn single(page: u32) -> Self {
        Self {
            start: page,
            end: page,
        }
    }

    /// Smallest range covering all given pages, or `None` for no pages.
    pub fn covering<I: IntoIterator<Item = u32>>(pages: I) -> Option<Self> {
        pages.into_iter().fold(None, |acc, page| match acc {
            None => Some(Self::single(page)),
            Some(range) => Some(Self::new(range.start.min(page), range.end.max(page))),
        })
    }

    /// Move the end of the range to `page`, never before the start.
    pub fn extend_to(self, page: u32) -> Self {
        Self::new(self.start, self.end.max(page))
    }

    /// Number of pages spanned.
    pub fn len(&self) -> u32 {
        self.end - self.start + 1
    }

    /// A page range is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Unchecked bounds as they appear in serialized metadata.
#[derive(Deserialize)]
struct PageBounds {
    start_page: u32,
    end_page: u32,
}

impl From<PageBounds> for PageRange {
    fn from(bounds: PageBounds) -> Self {
        Self::new(bounds.start_page, bounds.end_page)
    }
}

impl Default for PageRange {
    /// Page attribution fallback: `(1, 1)`.
    fn default() -> Self {
        Self::single(1)
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "p. {}", self.start)
        } else {
            write!(f, "pp. {}-{}", self.start, self.end)
        }
    }
}

/// A span of extracted text with heading and page metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Chunk text, headings first
    pub text: String,
    /// Source and structure metadata
    pub metadata: ChunkMetadata,
}

impl Chunk {
    /// Create a chunk.
    pub fn new(
        text: impl Into<String>,
        doc_id: impl Into<String>,
        heading: impl Into<String>,
        subheading: Option<String>,
        pages: PageRange,
    ) -> Self {
        Self {
            text: text.into(),
            metadata: ChunkMetadata {
                doc_id: doc_id.into(),
                heading: heading.into(),
                subheading: subheading.filter(|s| !s.is_empty()),
                pages,
            },
        }
    }

    /// Create a flowchart chunk for a figure found on `page`.
    pub fn flowchart(text: impl Into<String>, doc_id: impl Into<String>, page: u32) -> Self {
        Self::new(
            text,
            doc_id,
            FLOWCHART_HEADING,
            None,
            PageRange::single(page),
        )
    }

    /// First page of the chunk.
    pub fn start_page(&self) -> u32 {
        self.metadata.pages.start
    }

    /// Last page of the chunk.
    pub fn end_page(&self) -> u32 {
        self.metadata.pages.end
    }

    /// Top-level heading.
    pub fn heading(&self) -> &str {
        &self.metadata.heading
    }
}

/// Metadata attached to every [`Chunk`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Document identifier
    pub doc_id: String,
    /// Top-level heading (Roman section, rule number, chapter)
    pub heading: String,
    /// Second-level heading, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subheading: Option<String>,
    /// Pages the chunk was attributed to
    #[serde(flatten)]
    pub pages: PageRange,
}

/// A chunk that survived the clean-text filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeptChunk {
    /// Position of the chunk in the chunker output
    pub index: usize,
    /// Normalized text
    pub text: String,
}

/// A chunk dropped by the clean-text filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovedChunk {
    /// Text at the time of removal
    pub text: String,
    /// Why it was dropped
    pub reason: RemovalReason,
}

/// Reason a chunk was dropped by the clean-text filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalReason {
    /// Nothing left after tag stripping
    Empty,
    /// Looks like an isolated index entry or title
    IndexOrTitle,
    /// Too few words and sentences to stand alone
    TooShort {
        /// Word count
        words: usize,
        /// Sentence-terminated lines
        sentences: usize,
    },
}

impl fmt::Display for RemovalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemovalReason::Empty => f.write_str("Empty"),
            RemovalReason::IndexOrTitle => f.write_str("index/title"),
            RemovalReason::TooShort { words, sentences } => {
                write!(f, "Too short ({} words, {} sentences)", words, sentences)
            }
        }
    }
}

impl Serialize for RemovalReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
