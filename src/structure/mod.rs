//! Line/page structuring of layout-analyzed documents.
//!
//! The structurer linearizes each page's layout blocks with one of two
//! configurations (tagged, or preserve-all for statutes), splits the result
//! into trimmed lines, and records the page of every line. Later stages rely
//! on the line index alone for page attribution.

mod options;
mod structurer;

pub use options::{LinearizationConfig, Markup, TITLE_MARKER};
pub use structurer::{LineIndex, StructuredDocument, StructuredLine, Structurer};
