//! Final record assembly: kept text chunks followed by flowchart chunks.

use crate::model::{Chunk, ChunkRecord, KeptChunk, RecordMetadata, SourceInfo, NOT_AVAILABLE};

/// Build the ordered record list for a document.
///
/// Text records come first, in filter order, with `source_url` anchored to
/// the start page of the raw chunk they came from. Flowchart records follow
/// with their numbering continuing after the text records. Every record
/// carries the same `total_chunks`.
pub fn assemble(
    source: &SourceInfo,
    raw: &[Chunk],
    kept: &[KeptChunk],
    flowcharts: &[Chunk],
) -> Vec<ChunkRecord> {
    let doc_id = source.doc_id();
    let total = kept.len() + flowcharts.len();
    let source_id = source.source_id.as_deref().unwrap_or(NOT_AVAILABLE);

    let metadata = |index: usize, source_url: String| RecordMetadata {
        doc_id: doc_id.clone(),
        source: source.key.clone(),
        source_url,
        chunk_index: index,
        total_chunks: total,
        source_id: source_id.to_string(),
    };

    let mut records = Vec::with_capacity(total);

    for (index, chunk) in kept.iter().enumerate() {
        let start_page = raw.get(chunk.index).map_or(1, Chunk::start_page);
        let source_url = match source.url.as_deref() {
            Some(url) => format!("{url}#page={start_page}"),
            None => NOT_AVAILABLE.to_string(),
        };
        records.push(ChunkRecord {
            chunk_id: format!("{doc_id}_final_{index}"),
            text: chunk.text.clone(),
            metadata: metadata(index, source_url),
        });
    }

    for (offset, chunk) in flowcharts.iter().enumerate() {
        let index = kept.len() + offset;
        let source_url = source.url.as_deref().unwrap_or(NOT_AVAILABLE).to_string();
        records.push(ChunkRecord {
            chunk_id: format!("{doc_id}_flowchart_{index}"),
            text: chunk.text.clone(),
            metadata: metadata(index, source_url),
        });
    }

    records
}
