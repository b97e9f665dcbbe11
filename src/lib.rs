//! # lexchunk
//!
//! Layout-aware chunking of statutes, administrative code, assessment
//! manuals and general publications for retrieval.
//!
//! The library takes an already layout-analyzed document (pages, typed
//! layout blocks, page rasters, figure boxes) and turns it into ordered
//! chunk records with heading hierarchy and page attribution.
//!
//! ## Quick Start
//!
//! ```no_run
//! use lexchunk::{load_document, Pipeline, SourceInfo};
//!
//! fn main() -> lexchunk::Result<()> {
//!     let doc = load_document("wi-admin-tax-16.json")?;
//!     let source = SourceInfo::new("admin/wi-admin-tax-16.pdf")
//!         .with_url("https://example.org/wi-admin-tax-16.pdf");
//!
//!     let processed = Pipeline::new().process(&doc, &source)?;
//!     for record in &processed.records {
//!         println!("{}: {}", record.chunk_id, record.metadata.source_url);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Three chunking strategies**: Roman-numeral publications, rule-per-chunk
//!   statutes, chapter/section manuals, picked from the document identifier
//! - **Exact page attribution**: every chunk is mapped back through a line/page index
//! - **Noise filtering**: TOC, index and title fragments are dropped, headings never are
//! - **Flowcharts**: large figures are described by a pluggable vision model
//! - **Chunk logs**: optional JSONL dumps of every pipeline stage

pub mod assemble;
pub mod chunk;
pub mod detect;
pub mod error;
pub mod export;
pub mod figure;
pub mod filter;
pub mod model;
pub mod options;
pub mod pipeline;
pub mod structure;

// Re-export commonly used types
pub use assemble::assemble;
pub use chunk::Chunker;
pub use detect::{detect_strategy, Strategy};
pub use error::{Error, Result};
pub use export::{ChunkLog, JsonFormat};
pub use figure::{FigureExtractor, VisionModel};
pub use filter::{CleanTextFilter, FilterOutcome};
pub use model::{
    BoundingBox, Chunk, ChunkMetadata, ChunkRecord, Document, KeptChunk, LayoutBlock, LayoutKind,
    Page, PageImage, PageRange, RecordMetadata, RemovalReason, RemovedChunk, SourceInfo,
};
pub use options::{ChunkOptions, ErrorMode, FilterOptions};
pub use pipeline::{Pipeline, ProcessedDocument};
pub use structure::{StructuredDocument, Structurer};

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Load a layout document from a JSON file.
///
/// # Example
///
/// ```no_run
/// use lexchunk::load_document;
///
/// let doc = load_document("guide.json").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<Document> {
    let file = File::open(path)?;
    read_document(BufReader::new(file))
}

/// Read a layout document from any reader producing JSON.
pub fn read_document<R: Read>(reader: R) -> Result<Document> {
    let doc: Document = serde_json::from_reader(reader)?;
    validate(doc)
}

/// Parse a layout document from a JSON string.
///
/// # Example
///
/// ```
/// use lexchunk::parse_document;
///
/// let doc = parse_document(r#"{"pages": [{"number": 1, "blocks": [{"kind": "title", "text": "Guide"}]}]}"#).unwrap();
/// assert_eq!(doc.page_count(), 1);
/// ```
pub fn parse_document(json: &str) -> Result<Document> {
    let doc: Document = serde_json::from_str(json)?;
    validate(doc)
}

fn validate(doc: Document) -> Result<Document> {
    if let Some(page) = doc.pages.iter().find(|p| p.number == 0) {
        return Err(Error::InvalidDocument(format!(
            "page numbers are 1-based, found page {}",
            page.number
        )));
    }
    Ok(doc)
}

/// Chunk a document with default options and no vision model.
///
/// # Example
///
/// ```
/// use lexchunk::{chunk_document, Document, Page, SourceInfo};
///
/// let mut doc = Document::new();
/// doc.add_page(Page::from_text(1, "I. Overview\nAll property is taxed."));
///
/// let records = chunk_document(&doc, &SourceInfo::new("guide.pdf")).unwrap();
/// assert_eq!(records[0].text, "I. Overview\n\nAll property is taxed.");
/// ```
pub fn chunk_document(doc: &Document, source: &SourceInfo) -> Result<Vec<ChunkRecord>> {
    Ok(Pipeline::new().process(doc, source)?.records)
}

/// Load a JSON layout document and chunk it with default options.
///
/// The document key is the file name of `path` with a `.pdf` extension.
pub fn chunk_file<P: AsRef<Path>>(path: P) -> Result<Vec<ChunkRecord>> {
    let path = path.as_ref();
    let doc = load_document(path)?;
    let key = path
        .with_extension("pdf")
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    chunk_document(&doc, &SourceInfo::new(key))
}
