//! Chunking strategy detection from the document identifier.

use crate::options::ChunkOptions;

/// Chunking strategy for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Roman-numeral sections with capital-letter subsections
    Generic,
    /// One chunk per numbered rule
    Statute {
        /// Rules are bare `N.N` numbers rather than `Tax N.N`
        bare_numbers: bool,
    },
    /// Chapters with short title-case sections
    Manual,
}

impl Strategy {
    /// Whether the document keeps every layout element as visible text.
    pub fn is_statute(&self) -> bool {
        matches!(self, Strategy::Statute { .. })
    }

    /// Short name for logs and CLI output.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Generic => "generic",
            Strategy::Statute { .. } => "statute",
            Strategy::Manual => "manual",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Statute { bare_numbers: true } => f.write_str("statute (bare rule numbers)"),
            other => f.write_str(other.name()),
        }
    }
}

/// Detect the chunking strategy for a document identifier.
///
/// Matching is a case-insensitive substring test against the markers in
/// `options`. Identifiers that match nothing fall back to [`Strategy::Generic`].
///
/// # Example
/// ```
/// use lexchunk::{detect_strategy, ChunkOptions, Strategy};
///
/// let options = ChunkOptions::default();
/// assert_eq!(detect_strategy("WPAM-2024.pdf", &options), Strategy::Manual);
/// assert_eq!(detect_strategy("guide.pdf", &options), Strategy::Generic);
/// ```
pub fn detect_strategy(doc_id: &str, options: &ChunkOptions) -> Strategy {
    let lowered = doc_id.to_lowercase();

    if contains_any(&lowered, &options.statute_markers) {
        return Strategy::Statute {
            bare_numbers: lowered.contains(&options.bare_rule_marker.to_lowercase()),
        };
    }

    if contains_any(&lowered, &options.manual_markers) {
        return Strategy::Manual;
    }

    Strategy::Generic
}

fn contains_any(haystack: &str, markers: &[String]) -> bool {
    markers
        .iter()
        .filter(|m| !m.is_empty())
        .any(|m| haystack.contains(&m.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(doc_id: &str) -> Strategy {
        detect_strategy(doc_id, &ChunkOptions::default())
    }

    #[test]
    fn test_admin_code_uses_tax_rules() {
        assert_eq!(
            detect("wi-admin-tax-18.pdf"),
            Strategy::Statute {
                bare_numbers: false
            }
        );
    }

    #[test]
    fn test_statute_uses_bare_numbers() {
        assert_eq!(
            detect("WI-Statute-ch70.pdf"),
            Strategy::Statute { bare_numbers: true }
        );
    }

    #[test]
    fn test_manual() {
        assert_eq!(detect("2024_WPAM_Chapter_07.pdf"), Strategy::Manual);
    }

    #[test]
    fn test_unknown_falls_back_to_generic() {
        assert_eq!(detect("pb-060-publication.pdf"), Strategy::Generic);
        assert_eq!(detect(""), Strategy::Generic);
    }

    #[test]
    fn test_is_statute() {
        assert!(detect("wi-admin.pdf").is_statute());
        assert!(!detect("wpam.pdf").is_statute());
    }

    #[test]
    fn test_custom_markers() {
        let options = ChunkOptions::new().with_manual_marker("Handbook");
        assert_eq!(
            detect_strategy("assessor-handbook.pdf", &options),
            Strategy::Manual
        );
    }
}
