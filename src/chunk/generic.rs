//! Roman-numeral / capital-letter heading chunker for general publications.

use regex::Regex;
use std::sync::LazyLock;

use super::pages::PageResolver;
use super::text::{clean_line, count_words_in, split_segments};
use super::Chunker;
use crate::model::Chunk;
use crate::structure::StructuredDocument;

static ROMAN_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[IVXLCDM]+\s*[.\-–:]").expect("roman heading regex"));
static LETTER_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]\s*[.\-–:]").expect("letter heading regex"));

/// Splits on `I.`, `II.`, … sections and `A.`, `B.`, … subsections.
pub struct GenericChunker {
    doc_id: String,
    max_words: usize,
}

impl GenericChunker {
    /// Create a chunker for one document.
    pub fn new(doc_id: impl Into<String>, max_words: usize) -> Self {
        Self {
            doc_id: doc_id.into(),
            max_words,
        }
    }
}

impl Chunker for GenericChunker {
    fn chunk(&self, doc: &StructuredDocument) -> Vec<Chunk> {
        let resolver = PageResolver::new(&doc.lines);
        let mut fold = HeadingFold::new(&self.doc_id, &resolver, self.max_words);

        for block in &doc.header_split {
            for raw in split_segments(block) {
                let line = clean_line(&raw);
                if !line.is_empty() {
                    fold.push(line);
                }
            }
        }

        fold.finish()
    }
}

/// Heading state carried across lines.
struct HeadingFold<'a> {
    doc_id: &'a str,
    resolver: &'a PageResolver,
    max_words: usize,
    roman_heading: String,
    sub_heading: String,
    buffer: Vec<String>,
    chunks: Vec<Chunk>,
}

impl<'a> HeadingFold<'a> {
    fn new(doc_id: &'a str, resolver: &'a PageResolver, max_words: usize) -> Self {
        Self {
            doc_id,
            resolver,
            max_words,
            roman_heading: String::new(),
            sub_heading: String::new(),
            buffer: Vec::new(),
            chunks: Vec::new(),
        }
    }

    fn push(&mut self, line: String) {
        if ROMAN_HEADING.is_match(&line) {
            self.flush();
            self.roman_heading = line;
            self.sub_heading.clear();
            return;
        }

        // A lone "A." is a list marker, not a subsection.
        if LETTER_HEADING.is_match(&line) && line.split_whitespace().count() > 1 {
            self.flush();
            self.sub_heading = line;
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
        let pages = self.resolver.resolve(&body);

        let mut parts: Vec<&str> = Vec::with_capacity(body.len() + 2);
        if !self.roman_heading.is_empty() {
            parts.push(&self.roman_heading);
        }
        if !self.sub_heading.is_empty() {
            parts.push(&self.sub_heading);
        }
        parts.extend(body.iter().map(String::as_str));

        self.chunks.push(Chunk::new(
            parts.join("\n").trim(),
            self.doc_id,
            self.roman_heading.as_str(),
            Some(self.sub_heading.clone()),
            pages,
        ));
    }

    fn finish(mut self) -> Vec<Chunk> {
        self.flush();
        self.chunks
    }
}
