//! Chapter/section chunker for property-assessment manuals.

use regex::Regex;
use std::sync::LazyLock;

use super::pages::PageResolver;
use super::text::{clean_line, count_words, count_words_in, split_segments};
use super::Chunker;
use crate::model::Chunk;
use crate::structure::StructuredDocument;

static CHAPTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Chapter\s+\d+").expect("chapter regex"));
static CHAPTER_EXACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Chapter\s+\d+").expect("chapter regex"));
static SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Za-z\s]{3,}$").expect("section regex"));
static PAGE_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d+-\d+\b").expect("page ref regex"));

const TOC_MARKERS: [&str; 4] = ["table of contents", "appendix", "glossary", "revisions"];
const UNTITLED: &str = "Untitled";
const MAX_SECTION_WORDS: usize = 8;

/// Whether a piece of text looks like a table of contents or a mini-TOC.
///
/// ```
/// use lexchunk::chunk::is_probably_toc;
///
/// assert!(is_probably_toc("Chapter 3\n3-1\n3-2\n3-3"));
/// assert!(!is_probably_toc("Chapter 3\nLand is valued at market value."));
/// ```
pub fn is_probably_toc(text: &str) -> bool {
    let lowered = text.to_lowercase();
    if TOC_MARKERS.iter().any(|m| lowered.contains(m)) {
        return true;
    }

    let lines: Vec<&str> = text.lines().collect();
    if lines.len() < 2 {
        return false;
    }

    let refs = lines.iter().filter(|l| PAGE_REF.is_match(l)).count();
    if refs as f64 / lines.len() as f64 > 0.3 {
        return true;
    }

    CHAPTER_EXACT.is_match(text) && PAGE_REF.is_match(text)
}

/// Groups manual content by chapter and section, dropping TOC fragments
/// and merging small neighbouring chunks.
pub struct ManualChunker {
    doc_id: String,
    max_words: usize,
    min_merge_words: usize,
    max_merge_words: usize,
}

impl ManualChunker {
    /// Create a chunker with the default merge limits (80 / 500 words).
    pub fn new(doc_id: impl Into<String>, max_words: usize) -> Self {
        Self {
            doc_id: doc_id.into(),
            max_words,
            min_merge_words: 80,
            max_merge_words: 500,
        }
    }

    /// Set the small-chunk merge limits.
    pub fn with_merge_limits(mut self, min_words: usize, max_total: usize) -> Self {
        self.min_merge_words = min_words;
        self.max_merge_words = max_total;
        self
    }

    fn merge_small(&self, chunks: Vec<Chunk>) -> Vec<Chunk> {
        let mut merged = Vec::with_capacity(chunks.len());
        let mut iter = chunks.into_iter().peekable();

        while let Some(mut chunk) = iter.next() {
            if count_words(&chunk.text) < self.min_merge_words {
                if let Some(next) = iter.peek() {
                    let combined = format!("{}\n\n{}", chunk.text.trim(), next.text.trim());
                    if chunk.heading() == next.heading()
                        && count_words(&combined) <= self.max_merge_words
                    {
                        chunk.metadata.pages = chunk.metadata.pages.extend_to(next.end_page());
                        chunk.text = combined;
                        iter.next();
                    }
                }
            }
            merged.push(chunk);
        }

        merged
    }
}

impl Chunker for ManualChunker {
    fn chunk(&self, doc: &StructuredDocument) -> Vec<Chunk> {
        let resolver = PageResolver::new(&doc.lines);
        let mut fold = ChapterFold::new(&self.doc_id, &resolver, self.max_words);

        for block in &doc.header_split {
            for raw in split_segments(block) {
                let line = clean_line(&raw);
                if !line.is_empty() {
                    fold.push(line);
                }
            }
        }

        let chunks = fold.finish();
        log::debug!("{}: {} manual chunks before merging", self.doc_id, chunks.len());
        self.merge_small(chunks)
    }
}

/// Chapter and section state carried across lines.
struct ChapterFold<'a> {
    doc_id: &'a str,
    resolver: &'a PageResolver,
    max_words: usize,
    chapter: Option<String>,
    section: Option<String>,
    buffer: Vec<String>,
    chunks: Vec<Chunk>,
    skipped_toc: usize,
}

impl<'a> ChapterFold<'a> {
    fn new(doc_id: &'a str, resolver: &'a PageResolver, max_words: usize) -> Self {
        Self {
            doc_id,
            resolver,
            max_words,
            chapter: None,
            section: None,
            buffer: Vec::new(),
            chunks: Vec::new(),
            skipped_toc: 0,
        }
    }

    fn push(&mut self, line: String) {
        if CHAPTER.is_match(&line) {
            self.flush();
            self.chapter = Some(line);
            self.section = None;
            return;
        }

        if SECTION.is_match(&line) && line.split_whitespace().count() < MAX_SECTION_WORDS {
            self.flush();
            self.section = Some(line);
            return;
        }

        self.buffer.push(line);
        if count_words_in(&self.buffer) > self.max_words {
            self.flush();
        }
    }

    fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let body = std::mem::take(&mut self.buffer);

        let chapter = self.chapter.as_deref().unwrap_or("");
        let section = self.section.as_deref().unwrap_or("");
        let heading = format!("{chapter}\n{section}");
        let heading = heading.trim();

        let mut parts: Vec<&str> = Vec::with_capacity(body.len() + 1);
        if !heading.is_empty() {
            parts.push(heading);
        }
        parts.extend(body.iter().map(String::as_str));
        let text = parts.join("\n");
        let text = text.trim();

        if text.is_empty() {
            return;
        }
        if is_probably_toc(text) {
            self.skipped_toc += 1;
            return;
        }

        let pages = self.resolver.resolve(&body);
        let heading = if chapter.is_empty() { UNTITLED } else { chapter };
        self.chunks.push(Chunk::new(
            text,
            self.doc_id,
            heading,
            self.section.clone(),
            pages,
        ));
    }

    fn finish(mut self) -> Vec<Chunk> {
        self.flush();
        if self.skipped_toc > 0 {
            log::debug!("{}: skipped {} TOC fragments", self.doc_id, self.skipped_toc);
        }
        self.chunks
    }
}
