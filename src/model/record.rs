//! Final records handed to the ingestion step.

use serde::{Deserialize, Serialize};

/// Placeholder used when the caller supplies no URL or source identifier.
pub const NOT_AVAILABLE: &str = "n/a";

/// A retrieval-ready chunk with a stable positional identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// `{doc_id}_final_{n}` for text, `{doc_id}_flowchart_{n}` for figures
    pub chunk_id: String,
    /// Chunk text
    pub text: String,
    /// Source metadata
    pub metadata: RecordMetadata,
}

/// Source metadata carried by every [`ChunkRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMetadata {
    /// Document identifier
    pub doc_id: String,
    /// Original document key
    pub source: String,
    /// Document URL, anchored to the start page for text chunks
    pub source_url: String,
    /// Zero-based position in the document output
    pub chunk_index: usize,
    /// Number of records produced for the document
    pub total_chunks: usize,
    /// Caller-supplied identifier
    pub source_id: String,
}

impl ChunkRecord {
    /// Whether this record came from a flowchart figure.
    pub fn is_flowchart(&self) -> bool {
        self.chunk_id
            .strip_prefix(&self.metadata.doc_id)
            .is_some_and(|rest| rest.starts_with("_flowchart_"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(chunk_id: &str) -> ChunkRecord {
        ChunkRecord {
            chunk_id: chunk_id.to_string(),
            text: String::new(),
            metadata: RecordMetadata {
                doc_id: "doc.pdf".to_string(),
                source: "docs/doc.pdf".to_string(),
                source_url: NOT_AVAILABLE.to_string(),
                chunk_index: 0,
                total_chunks: 1,
                source_id: NOT_AVAILABLE.to_string(),
            },
        }
    }

    #[test]
    fn test_is_flowchart() {
        assert!(record("doc.pdf_flowchart_3").is_flowchart());
        assert!(!record("doc.pdf_final_0").is_flowchart());
    }
}
