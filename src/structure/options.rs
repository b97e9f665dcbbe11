//! Linearization configuration: how layout blocks become tagged text.

use crate::model::{LayoutBlock, LayoutKind};

/// Marker that opens every title block in tagged output.
pub const TITLE_MARKER: &str = "<titles>";

/// Prefix/suffix pair wrapped around a block's text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup {
    /// Text inserted before the block
    pub prefix: String,
    /// Text inserted after the block
    pub suffix: String,
}

impl Markup {
    /// Create a markup pair.
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// No markup.
    pub fn none() -> Self {
        Self::default()
    }

    fn wrap(&self, text: &str) -> String {
        format!("{}{}{}", self.prefix, text, self.suffix)
    }
}

/// Controls which layout kinds are visible and how they are tagged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearizationConfig {
    /// Drop running page headers
    pub hide_headers: bool,
    /// Drop running page footers
    pub hide_footers: bool,
    /// Drop page numbers
    pub hide_page_numbers: bool,
    /// Drop text found inside figures
    pub hide_figures: bool,
    /// Drop tables
    pub hide_tables: bool,
    /// Markup around titles
    pub title: Markup,
    /// Markup around section headers
    pub section_header: Markup,
    /// Markup around tables
    pub table: Markup,
    /// Markup around lists
    pub list: Markup,
}

impl LinearizationConfig {
    /// Keep every layout element as plain visible text.
    ///
    /// Statutes and administrative code carry their structure in numbered
    /// rule headings, so nothing is tagged or hidden.
    pub fn preserve_all() -> Self {
        Self {
            hide_headers: false,
            hide_footers: false,
            hide_page_numbers: false,
            hide_figures: false,
            hide_tables: false,
            title: Markup::none(),
            section_header: Markup::none(),
            table: Markup::none(),
            list: Markup::none(),
        }
    }

    /// Wrap titles, section headers, tables and lists in private tags and
    /// suppress running headers, footers and page numbers.
    pub fn tagged() -> Self {
        Self {
            hide_headers: true,
            hide_footers: true,
            hide_page_numbers: true,
            hide_figures: false,
            hide_tables: false,
            title: Markup::new("<titles><<title>><title>", "</title><</title>>"),
            section_header: Markup::new("<headers><<header>><header>", "</header><</header>>"),
            table: Markup::new("<tables><table>", "</table>"),
            list: Markup::new("<<list>><list>", "</list><</list>>"),
        }
    }

    /// Pick the configuration for a document class.
    pub fn for_statute(is_statute: bool) -> Self {
        if is_statute {
            Self::preserve_all()
        } else {
            Self::tagged()
        }
    }

    /// Render one block, or `None` if its kind is hidden.
    pub fn render(&self, block: &LayoutBlock, text: &str) -> Option<String> {
        let rendered = match block.kind {
            LayoutKind::Header if self.hide_headers => return None,
            LayoutKind::Footer if self.hide_footers => return None,
            LayoutKind::PageNumber if self.hide_page_numbers => return None,
            LayoutKind::Figure if self.hide_figures => return None,
            LayoutKind::Table if self.hide_tables => return None,
            LayoutKind::Title => self.title.wrap(text),
            LayoutKind::SectionHeader => self.section_header.wrap(text),
            LayoutKind::Table => self.table.wrap(text),
            LayoutKind::List => self.list.wrap(text),
            _ => text.to_string(),
        };
        Some(rendered)
    }
}

impl Default for LinearizationConfig {
    fn default() -> Self {
        Self::tagged()
    }
}
