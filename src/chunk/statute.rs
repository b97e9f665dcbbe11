//! Rule-per-chunk chunker for statutes and administrative code.

use regex::Regex;
use std::sync::LazyLock;

use super::Chunker;
use crate::model::{Chunk, PageRange};
use crate::structure::StructuredDocument;

static TAX_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Tax\s\d+\.\d+[^ \n]*").expect("tax rule regex"));
static BARE_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+[A-Za-z\-]*").expect("bare rule regex"));

/// Emits one chunk per `Tax N.NN` (or bare `N.NN`) rule.
///
/// Works directly on the line index: the rule line becomes the heading and
/// the page range covers the rule's body lines. Consecutive chunks under the
/// same rule number, as produced by running headers, are merged.
pub struct StatuteChunker {
    doc_id: String,
    bare_numbers: bool,
}

impl StatuteChunker {
    /// Create a chunker. `bare_numbers` selects the `N.NN` rule pattern.
    pub fn new(doc_id: impl Into<String>, bare_numbers: bool) -> Self {
        Self {
            doc_id: doc_id.into(),
            bare_numbers,
        }
    }

    fn rule_pattern(&self) -> &'static Regex {
        if self.bare_numbers {
            &*BARE_RULE
        } else {
            &*TAX_RULE
        }
    }
}

impl Chunker for StatuteChunker {
    fn chunk(&self, doc: &StructuredDocument) -> Vec<Chunk> {
        let pattern = self.rule_pattern();
        let mut rules = Vec::new();
        let mut current: Option<Rule> = None;

        for line in &doc.lines {
            let text = line.text.trim();
            if text.is_empty() {
                continue;
            }

            if pattern.is_match(text) {
                rules.extend(current.take().and_then(Rule::finish));
                current = Some(Rule::new(text));
            } else if let Some(rule) = current.as_mut() {
                rule.push(text, line.page);
            }
        }
        rules.extend(current.and_then(Rule::finish));

        merge_consecutive(rules)
            .into_iter()
            .map(|rule| rule.into_chunk(&self.doc_id))
            .collect()
    }
}

/// A rule being accumulated.
struct Rule {
    heading: String,
    body: Vec<String>,
    pages: Option<PageRange>,
}

/// A rule with at least one body line.
struct FinishedRule {
    heading: String,
    body: Vec<String>,
    pages: PageRange,
}

impl Rule {
    fn new(heading: &str) -> Self {
        Self {
            heading: heading.to_string(),
            body: Vec::new(),
            pages: None,
        }
    }

    fn push(&mut self, text: &str, page: u32) {
        self.body.push(text.to_string());
        self.pages = Some(match self.pages {
            None => PageRange::single(page),
            Some(range) => PageRange::new(range.start.min(page), range.end.max(page)),
        });
    }

    fn finish(self) -> Option<FinishedRule> {
        let pages = self.pages?;
        Some(FinishedRule {
            heading: self.heading,
            body: self.body,
            pages,
        })
    }
}

impl FinishedRule {
    fn into_chunk(self, doc_id: &str) -> Chunk {
        let text = format!("{}\n{}", self.heading, self.body.join("\n").trim());
        Chunk::new(text, doc_id, self.heading, None, self.pages)
    }
}

fn merge_consecutive(rules: Vec<FinishedRule>) -> Vec<FinishedRule> {
    let mut merged: Vec<FinishedRule> = Vec::with_capacity(rules.len());
    for rule in rules {
        match merged.last_mut() {
            Some(last) if last.heading == rule.heading => {
                last.body.extend(rule.body);
                last.pages = last.pages.extend_to(rule.pages.end);
            }
            _ => merged.push(rule),
        }
    }
    merged
}
