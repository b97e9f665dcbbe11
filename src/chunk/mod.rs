//! Heading-aware chunkers.
//!
//! Each document class has its own chunker:
//!
//! - [`GenericChunker`]: Roman-numeral sections and capital-letter subsections
//! - [`StatuteChunker`]: one chunk per numbered rule, read straight off the line index
//! - [`ManualChunker`]: chapters and title-case sections with TOC screening
//!
//! All of them attribute pages through the shared line index, so every
//! chunk satisfies `start_page <= end_page`.

mod generic;
mod manual;
mod pages;
mod statute;
pub(crate) mod text;

pub use generic::GenericChunker;
pub use manual::{is_probably_toc, ManualChunker};
pub use pages::PageResolver;
pub use statute::StatuteChunker;

use crate::detect::Strategy;
use crate::model::Chunk;
use crate::options::ChunkOptions;
use crate::structure::StructuredDocument;

/// Splits a structured document into raw chunks.
pub trait Chunker {
    /// Produce chunks in document order.
    fn chunk(&self, doc: &StructuredDocument) -> Vec<Chunk>;
}

impl Strategy {
    /// Build the chunker for this strategy.
    pub fn chunker(&self, doc_id: &str, options: &ChunkOptions) -> Box<dyn Chunker> {
        match *self {
            Strategy::Generic => Box::new(GenericChunker::new(doc_id, options.max_words)),
            Strategy::Statute { bare_numbers } => {
                Box::new(StatuteChunker::new(doc_id, bare_numbers))
            }
            Strategy::Manual => Box::new(
                ManualChunker::new(doc_id, options.max_words)
                    .with_merge_limits(options.min_merge_words, options.max_merge_words),
            ),
        }
    }

    /// Chunk a structured document with this strategy.
    pub fn chunk(
        &self,
        doc_id: &str,
        doc: &StructuredDocument,
        options: &ChunkOptions,
    ) -> Vec<Chunk> {
        let chunks = self.chunker(doc_id, options).chunk(doc);
        log::debug!("{} chunker produced {} chunks for {}", self.name(), chunks.len(), doc_id);
        chunks
    }
}
