//! End-to-end processing of one layout document.

use std::path::PathBuf;
use std::sync::Arc;

use crate::assemble::assemble;
use crate::detect::{detect_strategy, Strategy};
use crate::error::Result;
use crate::export::ChunkLog;
use crate::figure::{FigureExtractor, VisionModel};
use crate::filter::{CleanTextFilter, FilterOutcome};
use crate::model::{Chunk, ChunkRecord, Document, RemovedChunk, SourceInfo};
use crate::options::ChunkOptions;
use crate::structure::Structurer;

/// Everything produced for one document.
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    /// Strategy chosen from the document identifier
    pub strategy: Strategy,
    /// Chunker output before filtering
    pub raw_chunks: Vec<Chunk>,
    /// Chunks dropped by the filter
    pub removed: Vec<RemovedChunk>,
    /// Final records: kept text chunks, then flowcharts
    pub records: Vec<ChunkRecord>,
}

impl ProcessedDocument {
    /// Number of flowchart records.
    pub fn flowchart_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_flowchart()).count()
    }

    /// Number of text records.
    pub fn text_count(&self) -> usize {
        self.records.len() - self.flowchart_count()
    }
}

/// Structurer, chunker, filter, figure pass and assembler wired together.
///
/// A pipeline holds no per-document state and can be shared across threads.
///
/// # Example
///
/// ```
/// use lexchunk::{Document, Page, Pipeline, SourceInfo};
///
/// let mut doc = Document::new();
/// doc.add_page(Page::from_text(1, "Tax 1.01 Scope.\nThis chapter applies to every return filed."));
///
/// let processed = Pipeline::new()
///     .process(&doc, &SourceInfo::new("wi-admin-tax-1.pdf"))
///     .unwrap();
/// assert_eq!(processed.records[0].chunk_id, "wi-admin-tax-1.pdf_final_0");
/// ```
#[derive(Clone, Default)]
pub struct Pipeline {
    options: ChunkOptions,
    vision: Option<Arc<dyn VisionModel>>,
    chunk_log: Option<ChunkLog>,
}

impl Pipeline {
    /// Create a pipeline with default options and no vision model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set chunking options.
    pub fn with_options(mut self, options: ChunkOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the vision model used for figures.
    pub fn with_vision(mut self, vision: Arc<dyn VisionModel>) -> Self {
        self.vision = Some(vision);
        self
    }

    /// Write per-stage chunk logs under `dir`.
    pub fn with_chunk_log(mut self, dir: impl Into<PathBuf>) -> Self {
        self.chunk_log = Some(ChunkLog::new(dir));
        self
    }

    /// Options in use.
    pub fn options(&self) -> &ChunkOptions {
        &self.options
    }

    /// Process one document.
    pub fn process(&self, doc: &Document, source: &SourceInfo) -> Result<ProcessedDocument> {
        let doc_id = source.doc_id();
        let strategy = detect_strategy(&doc_id, &self.options);
        log::debug!("{}: {} pages, {} strategy", doc_id, doc.page_count(), strategy);

        let structured = Structurer::new(strategy.is_statute())
            .with_unicode_normalization(self.options.normalize_unicode)
            .structure(doc);

        let raw_chunks = strategy.chunk(&doc_id, &structured, &self.options);
        self.log_stage(|chunk_log| chunk_log.write_raw(&doc_id, &raw_chunks));

        let FilterOutcome { kept, removed } =
            CleanTextFilter::new(self.options.filter).filter(&raw_chunks);
        self.log_stage(|chunk_log| chunk_log.write_removed(&doc_id, &removed));

        let flowcharts = self.extract_flowcharts(doc, &doc_id)?;

        let records = assemble(source, &raw_chunks, &kept, &flowcharts);
        self.log_stage(|chunk_log| chunk_log.write_final(&doc_id, &records));

        log::info!(
            "{}: {} records ({} text, {} flowchart), {} removed",
            doc_id,
            records.len(),
            kept.len(),
            flowcharts.len(),
            removed.len()
        );

        Ok(ProcessedDocument {
            strategy,
            raw_chunks,
            removed,
            records,
        })
    }

    fn extract_flowcharts(&self, doc: &Document, doc_id: &str) -> Result<Vec<Chunk>> {
        let vision = match &self.vision {
            Some(vision) if self.options.extract_figures => vision,
            _ => return Ok(Vec::new()),
        };

        FigureExtractor::new(Arc::clone(vision))
            .with_min_px(self.options.min_figure_px)
            .with_error_mode(self.options.figure_error_mode)
            .extract(doc, doc_id)
    }

    fn log_stage<F>(&self, write: F)
    where
        F: FnOnce(&ChunkLog) -> Result<PathBuf>,
    {
        if let Some(chunk_log) = &self.chunk_log {
            if let Err(e) = write(chunk_log) {
                log::warn!(
                    "Failed to write chunk log under {}: {}",
                    chunk_log.dir().display(),
                    e
                );
            }
        }
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("options", &self.options)
            .field("vision", &self.vision.as_ref().map(|v| v.name().to_string()))
            .field("chunk_log", &self.chunk_log)
            .finish()
    }
}
