//! Clean-text filter that drops index entries, TOC lines and other fragments.

use regex::Regex;
use std::sync::LazyLock;

use crate::chunk::text::clean_line;
use crate::model::{Chunk, KeptChunk, RemovalReason, RemovedChunk};
use crate::options::FilterOptions;

static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[IVXLCDM]+\.)|^[A-Z]\.|^Tax\s\d+\.\d+").expect("heading regex")
});

/// Result of filtering a document's raw chunks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    /// Surviving chunks in input order, tagged with their input position
    pub kept: Vec<KeptChunk>,
    /// Dropped chunks with the reason they were dropped
    pub removed: Vec<RemovedChunk>,
}

/// Line statistics used to classify a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TextStats {
    words: usize,
    sentences: usize,
}

impl TextStats {
    fn of(lines: &[String]) -> Self {
        Self {
            words: lines.iter().map(|l| l.split_whitespace().count()).sum(),
            sentences: lines
                .iter()
                .filter(|l| l.ends_with(['.', '?', '!']))
                .count(),
        }
    }
}

/// Clean-text filter.
///
/// Each chunk is stripped of tags line by line, re-joined with blank lines
/// and classified. Heading-led chunks are always kept.
#[derive(Debug, Clone, Default)]
pub struct CleanTextFilter {
    options: FilterOptions,
}

impl CleanTextFilter {
    /// Create a filter with the given thresholds.
    pub fn new(options: FilterOptions) -> Self {
        Self { options }
    }

    /// Filter chunks, preserving input order among the kept ones.
    pub fn filter(&self, chunks: &[Chunk]) -> FilterOutcome {
        let mut outcome = FilterOutcome::default();

        for (index, chunk) in chunks.iter().enumerate() {
            match self.classify(&chunk.text) {
                Ok(text) => outcome.kept.push(KeptChunk { index, text }),
                Err(removed) => outcome.removed.push(removed),
            }
        }

        log::debug!(
            "Filter kept {} of {} chunks",
            outcome.kept.len(),
            chunks.len()
        );
        outcome
    }

    /// Classify one chunk text. `Ok` carries the normalized text.
    pub fn classify(&self, raw: &str) -> Result<String, RemovedChunk> {
        let lines: Vec<String> = raw
            .split('\n')
            .map(clean_line)
            .filter(|l| !l.is_empty())
            .collect();

        let Some(first) = lines.first() else {
            return Err(RemovedChunk {
                text: raw.to_string(),
                reason: RemovalReason::Empty,
            });
        };

        let heading_led = HEADING.is_match(first);
        let text = lines.join("\n\n");
        if heading_led {
            return Ok(text);
        }

        let stats = TextStats::of(&lines);
        if stats.words < self.options.min_words
            && stats.sentences <= self.options.max_short_sentences
        {
            return Err(RemovedChunk {
                text,
                reason: RemovalReason::TooShort {
                    words: stats.words,
                    sentences: stats.sentences,
                },
            });
        }

        if stats.words < self.options.min_index_words {
            return Err(RemovedChunk {
                text,
                reason: RemovalReason::IndexOrTitle,
            });
        }

        Ok(text)
    }
}
