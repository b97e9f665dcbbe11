//! Chunking options and configuration.

/// Options for chunking a document.
#[derive(Debug, Clone)]
pub struct ChunkOptions {
    /// Word count above which a heading buffer is flushed early
    pub max_words: usize,

    /// Manual chunks below this word count try to merge with the next chunk
    pub min_merge_words: usize,

    /// Upper word bound for a merged manual chunk
    pub max_merge_words: usize,

    /// Minimum figure width and height in pixels sent to the vision model
    pub min_figure_px: u32,

    /// Identifier substrings that select the statute rule chunker
    pub statute_markers: Vec<String>,

    /// Identifier substrings that select the manual chunker
    pub manual_markers: Vec<String>,

    /// Identifier substring that switches statute rules to bare `N.N` numbers
    pub bare_rule_marker: String,

    /// Normalize block text to Unicode NFC before linearization
    pub normalize_unicode: bool,

    /// Whether to run the figure pass when a vision model is configured
    pub extract_figures: bool,

    /// How a bad vision reply is handled
    pub figure_error_mode: ErrorMode,

    /// Clean-text filter thresholds
    pub filter: FilterOptions,
}

impl ChunkOptions {
    /// Create new chunk options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flush threshold in words.
    pub fn with_max_words(mut self, words: usize) -> Self {
        self.max_words = words.max(1);
        self
    }

    /// Set the small-chunk merge thresholds for manuals.
    pub fn with_merge_limits(mut self, min_words: usize, max_total: usize) -> Self {
        self.min_merge_words = min_words;
        self.max_merge_words = max_total;
        self
    }

    /// Set the minimum figure size in pixels.
    pub fn with_min_figure_px(mut self, px: u32) -> Self {
        self.min_figure_px = px;
        self
    }

    /// Add an identifier marker for statute / administrative code documents.
    pub fn with_statute_marker(mut self, marker: impl Into<String>) -> Self {
        self.statute_markers.push(marker.into().to_lowercase());
        self
    }

    /// Add an identifier marker for manuals.
    pub fn with_manual_marker(mut self, marker: impl Into<String>) -> Self {
        self.manual_markers.push(marker.into().to_lowercase());
        self
    }

    /// Enable or disable Unicode normalization.
    pub fn with_unicode_normalization(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }

    /// Enable or disable the figure pass.
    pub fn with_figures(mut self, extract: bool) -> Self {
        self.extract_figures = extract;
        self
    }

    /// Set the figure error mode.
    pub fn with_figure_error_mode(mut self, mode: ErrorMode) -> Self {
        self.figure_error_mode = mode;
        self
    }

    /// Skip figures whose vision reply is unusable instead of failing the document.
    pub fn lenient_figures(mut self) -> Self {
        self.figure_error_mode = ErrorMode::Lenient;
        self
    }

    /// Set filter options.
    pub fn with_filter(mut self, filter: FilterOptions) -> Self {
        self.filter = filter;
        self
    }
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            max_words: 1200,
            min_merge_words: 80,
            max_merge_words: 500,
            min_figure_px: 300,
            statute_markers: vec!["wi-admin".to_string(), "wi-statute".to_string()],
            manual_markers: vec!["wpam".to_string()],
            bare_rule_marker: "statute".to_string(),
            normalize_unicode: true,
            extract_figures: true,
            figure_error_mode: ErrorMode::Strict,
            filter: FilterOptions::default(),
        }
    }
}

/// Thresholds for the clean-text filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOptions {
    /// Chunks below this word count look like index entries
    pub min_index_words: usize,

    /// Chunks below this word count are short
    pub min_words: usize,

    /// A short chunk with at most this many sentence lines is dropped
    pub max_short_sentences: usize,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            min_index_words: 15,
            min_words: 50,
            max_short_sentences: 1,
        }
    }
}

/// Error handling mode for the figure pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail the document on the first bad vision reply
    #[default]
    Strict,
    /// Log and skip the offending figure
    Lenient,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_options_builder() {
        let options = ChunkOptions::new()
            .with_max_words(400)
            .with_merge_limits(40, 200)
            .with_statute_marker("MN-Rules")
            .lenient_figures()
            .with_figures(false);

        assert_eq!(options.max_words, 400);
        assert_eq!(options.min_merge_words, 40);
        assert_eq!(options.max_merge_words, 200);
        assert!(options.statute_markers.contains(&"mn-rules".to_string()));
        assert_eq!(options.figure_error_mode, ErrorMode::Lenient);
        assert!(!options.extract_figures);
    }

    #[test]
    fn test_default_options() {
        let options = ChunkOptions::default();
        assert_eq!(options.max_words, 1200);
        assert_eq!(options.min_figure_px, 300);
        assert_eq!(options.figure_error_mode, ErrorMode::Strict);
        assert_eq!(options.filter.min_words, 50);
        assert!(options.normalize_unicode);
    }

    #[test]
    fn test_max_words_never_zero() {
        assert_eq!(ChunkOptions::new().with_max_words(0).max_words, 1);
    }
}
