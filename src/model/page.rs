//! Page-level types.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single layout-analyzed page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Layout blocks in reading order
    #[serde(default)]
    pub blocks: Vec<LayoutBlock>,

    /// Rendered raster of the page, if the layout service kept one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<PageImage>,

    /// Detected figure regions, normalized to the page
    #[serde(default)]
    pub figures: Vec<BoundingBox>,
}

impl Page {
    /// Create an empty page.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            blocks: Vec::new(),
            image: None,
            figures: Vec::new(),
        }
    }

    /// Create a page whose every line is a plain text block.
    pub fn from_text(number: u32, text: &str) -> Self {
        let mut page = Self::new(number);
        for line in text.lines() {
            page.add_block(LayoutBlock::text(line));
        }
        page
    }

    /// Add a layout block to the page.
    pub fn add_block(&mut self, block: LayoutBlock) {
        self.blocks.push(block);
    }

    /// Builder-style variant of [`Page::add_block`].
    pub fn with_block(mut self, block: LayoutBlock) -> Self {
        self.add_block(block);
        self
    }

    /// Attach the page raster.
    pub fn with_image(mut self, data: Vec<u8>) -> Self {
        self.image = Some(PageImage::new(data));
        self
    }

    /// Add a detected figure region.
    pub fn with_figure(mut self, bbox: BoundingBox) -> Self {
        self.figures.push(bbox);
        self
    }

    /// Whether figure extraction has anything to work with on this page.
    pub fn has_figures(&self) -> bool {
        self.image.is_some() && !self.figures.is_empty()
    }

    /// Check if the page has no layout blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// A block of text with the structural kind the layout service assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutBlock {
    /// Structural kind
    pub kind: LayoutKind,
    /// Block text; may span several lines
    pub text: String,
}

impl LayoutBlock {
    /// Create a block of the given kind.
    pub fn new(kind: LayoutKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Create a plain text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(LayoutKind::Text, text)
    }

    /// Create a title block.
    pub fn title(text: impl Into<String>) -> Self {
        Self::new(LayoutKind::Title, text)
    }

    /// Create a section header block.
    pub fn section_header(text: impl Into<String>) -> Self {
        Self::new(LayoutKind::SectionHeader, text)
    }
}

/// Structural kinds produced by the layout extraction service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    /// Document or part title
    Title,
    /// Section header
    SectionHeader,
    /// Body text
    #[default]
    Text,
    /// Linearized table
    Table,
    /// List
    List,
    /// Text found inside a figure
    Figure,
    /// Running page header
    Header,
    /// Running page footer
    Footer,
    /// Page number
    PageNumber,
}

/// Encoded raster image of a page (PNG or JPEG bytes).
///
/// Serialized as a base64 string so layout documents stay plain JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageImage {
    /// Encoded image bytes
    pub data: Vec<u8>,
}

impl PageImage {
    /// Wrap encoded image bytes.
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl Serialize for PageImage {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(&self.data))
    }
}

impl<'de> Deserialize<'de> for PageImage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        BASE64
            .decode(encoded.trim())
            .map(PageImage::new)
            .map_err(serde::de::Error::custom)
    }
}

/// A figure region with coordinates normalized to [0, 1] of the page size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl BoundingBox {
    /// Create a bounding box.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}
