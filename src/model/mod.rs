//! Document model types.
//!
//! The input side (`Document`, `Page`, `LayoutBlock`) mirrors what the layout
//! extraction service hands over. The output side (`Chunk`, `ChunkRecord`) is
//! what the chunkers, the clean-text filter and the assembler produce.

mod chunk;
mod document;
mod page;
mod record;

pub use chunk::{
    Chunk, ChunkMetadata, KeptChunk, PageRange, RemovalReason, RemovedChunk, FLOWCHART_HEADING,
};
pub use document::{Document, SourceInfo};
pub use page::{BoundingBox, LayoutBlock, LayoutKind, Page, PageImage};
pub use record::{ChunkRecord, RecordMetadata, NOT_AVAILABLE};
