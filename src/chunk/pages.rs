//! Page-range resolution shared by the heading-based chunkers.

use std::collections::HashSet;

use super::text::clean_line;
use crate::model::PageRange;
use crate::structure::LineIndex;

/// Maps a chunk's lines back to the pages they came from.
///
/// Matching is textual: every index line whose cleaned text equals a cleaned
/// chunk line contributes its page, and the result spans the smallest and
/// largest of those pages. Boilerplate repeated across pages therefore widens
/// the range. Chunks with no match fall back to `(1, 1)`.
pub struct PageResolver {
    cleaned: Vec<(String, u32)>,
}

impl PageResolver {
    /// Build a resolver over a line index.
    pub fn new(index: &LineIndex) -> Self {
        Self {
            cleaned: index
                .iter()
                .map(|line| (clean_line(&line.text), line.page))
                .collect(),
        }
    }

    /// Resolve the page range of a set of chunk lines.
    pub fn resolve<S: AsRef<str>>(&self, lines: &[S]) -> PageRange {
        let wanted: HashSet<String> = lines
            .iter()
            .map(|l| l.as_ref())
            .filter(|l| !l.trim().is_empty())
            .map(clean_line)
            .collect();

        let pages = self
            .cleaned
            .iter()
            .filter(|(text, _)| wanted.contains(text))
            .map(|(_, page)| *page);

        PageRange::covering(pages).unwrap_or_default()
    }
}
