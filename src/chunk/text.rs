//! Line-level text helpers shared by the chunkers and the filter.

use regex::Regex;
use std::sync::LazyLock;

// Matches `<tag>` as well as the doubled `<<tag>>` segment markers.
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<<?[^<>]+>>?").expect("tag regex"));
static SEGMENT_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<<[^>]+>>").expect("segment regex"));
static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("word regex"));

/// Segments containing one of these stay whole instead of being split into lines.
const WHOLE_SEGMENT_TAGS: [&str; 3] = ["<header>", "<list>", "<table>"];

/// Strip structural tags and surrounding whitespace.
pub fn clean_line(line: &str) -> String {
    TAG.replace_all(line, "").trim().to_string()
}

/// Count `\w+` runs in a piece of text.
pub fn count_words(text: &str) -> usize {
    WORD.find_iter(text).count()
}

/// Count `\w+` runs across lines.
pub fn count_words_in<S: AsRef<str>>(lines: &[S]) -> usize {
    lines.iter().map(|l| count_words(l.as_ref())).sum()
}

/// Split a title block on `<<…>>` markers.
///
/// Header, list and table segments are kept whole; other segments are split
/// into trimmed non-empty lines.
pub fn split_segments(block: &str) -> Vec<String> {
    let mut items = Vec::new();
    for segment in SEGMENT_MARKER.split(block) {
        if segment.trim().is_empty() {
            continue;
        }
        if WHOLE_SEGMENT_TAGS.iter().any(|tag| segment.contains(tag)) {
            items.push(segment.to_string());
        } else {
            items.extend(
                segment
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(str::to_string),
            );
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_line_strips_tags() {
        assert_eq!(
            clean_line("<<header>><header> A. Filing </header><</header>>"),
            "A. Filing"
        );
        assert_eq!(clean_line("  plain  "), "plain");
        assert_eq!(clean_line("<titles>"), "");
        assert_eq!(
            clean_line("<titles><<title>><title>Part One</title><</title>>"),
            "Part One"
        );
    }

    #[test]
    fn test_count_words() {
        assert_eq!(count_words("Tax 16.01 applies, see sec. 70.11."), 8);
        assert_eq!(count_words_in(&["one two", "three"]), 3);
        assert_eq!(count_words(""), 0);
    }

    #[test]
    fn test_split_segments() {
        let block = "<<title>><title>Part One</title><</title>>\nI. Overview\nbody text\n\
                     <headers><<header>><header>A. Scope</header><</header>>\nmore";
        let items: Vec<String> = split_segments(block)
            .into_iter()
            .map(|s| clean_line(&s))
            .filter(|s| !s.is_empty())
            .collect();
        assert_eq!(
            items,
            vec!["Part One", "I. Overview", "body text", "A. Scope", "more"]
        );
    }

    #[test]
    fn test_list_segment_kept_whole() {
        let block = "intro\n<<list>><list>first item\nsecond item</list><</list>>\nafter";
        let items = split_segments(block);
        assert_eq!(items[0], "intro");
        assert_eq!(items[1], "<list>first item\nsecond item</list>");
        assert_eq!(items[2], "after");
    }
}
