//! Flowchart extraction from figure regions.
//!
//! Every sufficiently large figure on a page raster is cropped, encoded as
//! PNG and shown to a [`VisionModel`] with [`FLOWCHART_PROMPT`]. Replies
//! that identify a flowchart become chunks under the `Flowchart` heading.
//!
//! # Example
//!
//! ```no_run
//! use lexchunk::figure::FigureExtractor;
//! use lexchunk::{Document, ErrorMode};
//! use std::sync::Arc;
//!
//! fn main() -> lexchunk::Result<()> {
//!     let vision = Arc::new(|_png: &[u8], _prompt: &str| -> lexchunk::Result<String> {
//!         Ok(r#"{"flowchart": false, "text": ""}"#.to_string())
//!     });
//!     let extractor = FigureExtractor::new(vision).with_error_mode(ErrorMode::Lenient);
//!     let chunks = extractor.extract(&Document::new(), "manual.pdf")?;
//!     assert!(chunks.is_empty());
//!     Ok(())
//! }
//! ```

mod crop;
mod vision;

pub use crop::{crop_png, decode_page, PixelRect};
pub use vision::VisionModel;

use serde::Deserialize;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::model::{Chunk, Document, Page};
use crate::options::ErrorMode;

/// Instruction sent with every figure crop.
pub const FLOWCHART_PROMPT: &str = r#"You are given an image.

1. Read all text from the flowchart, including decision diamonds, process steps, and stop points.
2. Convert the flowchart into a step-by-step text description of the process.
3. Use the format:
- Start
- Step X → Next Step [condition if any]
- Stop / Exemptions
4. Preserve statutory references (e.g., sec. 70.111(19)(a), Wis. Stats.) exactly as written.
5. Be concise but complete, so that the text can be stored as a knowledge base chunk for retrieval.

Output your answer in strict JSON format only:

{
"flowchart": true,
"text": "step-by-step process here"
}

If the image is NOT a flowchart, respond in the following JSON format:

{
"flowchart": false,
"text": ""
}

Do not add any explanations, commentary, or text outside the JSON."#;

/// Minimum figure side in pixels.
pub const DEFAULT_MIN_FIGURE_PX: u32 = 300;

/// The JSON object a vision reply must consist of.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FigureVerdict {
    /// Whether the figure is a flowchart
    pub flowchart: bool,
    /// Step-by-step description (empty for non-flowcharts)
    #[serde(default)]
    pub text: String,
}

impl FigureVerdict {
    /// Parse a raw vision reply.
    pub fn parse(reply: &str, page: u32, region: usize) -> Result<Self> {
        serde_json::from_str(reply.trim()).map_err(|e| Error::VisionContract {
            page,
            region,
            message: e.to_string(),
        })
    }
}

/// Figure pass over a layout document.
#[derive(Clone)]
pub struct FigureExtractor {
    vision: Arc<dyn VisionModel>,
    min_px: u32,
    error_mode: ErrorMode,
}

impl FigureExtractor {
    /// Create an extractor with strict error handling and a 300 px minimum.
    pub fn new(vision: Arc<dyn VisionModel>) -> Self {
        Self {
            vision,
            min_px: DEFAULT_MIN_FIGURE_PX,
            error_mode: ErrorMode::Strict,
        }
    }

    /// Set the minimum figure side in pixels.
    pub fn with_min_px(mut self, min_px: u32) -> Self {
        self.min_px = min_px;
        self
    }

    /// Set how per-figure failures are handled.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Extract flowchart chunks from every page, in page then region order.
    pub fn extract(&self, doc: &Document, doc_id: &str) -> Result<Vec<Chunk>> {
        let mut chunks = Vec::new();

        for page in doc.pages.iter().filter(|p| !p.figures.is_empty()) {
            chunks.extend(self.extract_page(page, doc_id)?);
        }

        log::debug!(
            "{}: {} flowcharts from {} figures ({})",
            doc_id,
            chunks.len(),
            doc.figure_count(),
            self.vision.name()
        );
        Ok(chunks)
    }

    fn extract_page(&self, page: &Page, doc_id: &str) -> Result<Vec<Chunk>> {
        let Some(raster) = page.image.as_ref() else {
            log::warn!("No image for page {}, skipping flowchart detection", page.number);
            return Ok(Vec::new());
        };

        let image = match decode_page(&raster.data) {
            Ok(image) => image,
            Err(e) => {
                log::warn!("Cannot decode image for page {}: {}", page.number, e);
                return Ok(Vec::new());
            }
        };

        let mut chunks = Vec::new();
        for (region, bbox) in page.figures.iter().enumerate() {
            let rect = PixelRect::from_bbox(bbox, image.width(), image.height());
            if !rect.is_at_least(self.min_px) {
                continue;
            }

            match self.describe(&image, rect, page.number, region) {
                Ok(Some(text)) => chunks.push(Chunk::flowchart(text, doc_id, page.number)),
                Ok(None) => {}
                Err(e) => match self.error_mode {
                    ErrorMode::Strict => return Err(e),
                    ErrorMode::Lenient => {
                        log::warn!("Skipping figure {} on page {}: {}", region, page.number, e)
                    }
                },
            }
        }
        Ok(chunks)
    }

    fn describe(
        &self,
        image: &image::DynamicImage,
        rect: PixelRect,
        page: u32,
        region: usize,
    ) -> Result<Option<String>> {
        let png = crop_png(image, rect)?;
        let reply = self.vision.describe(&png, FLOWCHART_PROMPT)?;
        let verdict = FigureVerdict::parse(&reply, page, region)?;
        Ok(verdict.flowchart.then_some(verdict.text))
    }
}

impl std::fmt::Debug for FigureExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FigureExtractor")
            .field("vision", &self.vision.name())
            .field("min_px", &self.min_px)
            .field("error_mode", &self.error_mode)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn png_page(number: u32, side: u32) -> Page {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::new(side, side))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        Page::new(number).with_image(bytes)
    }

    fn replying(reply: &'static str) -> Arc<dyn VisionModel> {
        Arc::new(move |_png: &[u8], prompt: &str| -> Result<String> {
            assert!(prompt.contains("strict JSON"));
            Ok(reply.to_string())
        })
    }

    fn doc_with(page: Page) -> Document {
        let mut doc = Document::new();
        doc.add_page(page);
        doc
    }

    #[test]
    fn test_flowchart_reply_becomes_chunk() {
        let doc = doc_with(png_page(7, 1000).with_figure(BoundingBox::new(0.1, 0.1, 0.6, 0.6)));
        let extractor = FigureExtractor::new(replying(
            r#"{"flowchart": true, "text": "- Start\n- Stop"}"#,
        ));

        let chunks = extractor.extract(&doc, "wpam.pdf").unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "- Start\n- Stop");
        assert_eq!(chunks[0].heading(), "Flowchart");
        assert_eq!((chunks[0].start_page(), chunks[0].end_page()), (7, 7));
    }

    #[test]
    fn test_non_flowchart_ignored() {
        let doc = doc_with(png_page(1, 1000).with_figure(BoundingBox::new(0.0, 0.0, 0.5, 0.5)));
        let extractor = FigureExtractor::new(replying(r#"{"flowchart": false, "text": ""}"#));
        assert!(extractor.extract(&doc, "d.pdf").unwrap().is_empty());
    }

    #[test]
    fn test_small_figures_not_sent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let vision: Arc<dyn VisionModel> =
            Arc::new(move |_png: &[u8], _prompt: &str| -> Result<String> {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(r#"{"flowchart": true, "text": "x"}"#.to_string())
            });

        // 0.25 * 1000 = 250 px, below the 300 px minimum.
        let doc = doc_with(png_page(1, 1000).with_figure(BoundingBox::new(0.0, 0.0, 0.25, 0.9)));
        let chunks = FigureExtractor::new(vision.clone()).extract(&doc, "d.pdf").unwrap();
        assert!(chunks.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let chunks = FigureExtractor::new(vision)
            .with_min_px(200)
            .extract(&doc, "d.pdf")
            .unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_malformed_reply_is_retryable_contract_error() {
        let doc = doc_with(png_page(3, 800).with_figure(BoundingBox::new(0.0, 0.0, 1.0, 1.0)));
        let extractor = FigureExtractor::new(replying("Sure! Here is the flowchart: ..."));

        let err = extractor.extract(&doc, "d.pdf").unwrap_err();
        assert!(err.is_retryable());
        assert!(matches!(
            err,
            Error::VisionContract {
                page: 3,
                region: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_lenient_mode_skips_bad_region() {
        let doc = doc_with(
            png_page(2, 800)
                .with_figure(BoundingBox::new(0.0, 0.0, 1.0, 1.0))
                .with_figure(BoundingBox::new(0.0, 0.0, 0.5, 0.5)),
        );
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let vision: Arc<dyn VisionModel> =
            Arc::new(move |_png: &[u8], _prompt: &str| -> Result<String> {
                match counter.fetch_add(1, Ordering::SeqCst) {
                    0 => Ok("not json".to_string()),
                    _ => Ok(r#"{"flowchart": true, "text": "- Start"}"#.to_string()),
                }
            });

        let chunks = FigureExtractor::new(vision)
            .with_error_mode(ErrorMode::Lenient)
            .extract(&doc, "d.pdf")
            .unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_pages_without_usable_image_skipped() {
        let mut doc = Document::new();
        doc.add_page(Page::new(1).with_figure(BoundingBox::new(0.0, 0.0, 1.0, 1.0)));
        doc.add_page(
            Page::new(2)
                .with_image(b"garbage".to_vec())
                .with_figure(BoundingBox::new(0.0, 0.0, 1.0, 1.0)),
        );
        let extractor = FigureExtractor::new(replying(r#"{"flowchart": true, "text": "x"}"#));
        assert!(extractor.extract(&doc, "d.pdf").unwrap().is_empty());
    }

    #[test]
    fn test_figures_without_image_never_reach_vision() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let vision: Arc<dyn VisionModel> =
            Arc::new(move |_png: &[u8], _prompt: &str| -> Result<String> {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(r#"{"flowchart": true, "text": "x"}"#.to_string())
            });

        let doc = doc_with(Page::new(5).with_figure(BoundingBox::new(0.0, 0.0, 1.0, 1.0)));
        let chunks = FigureExtractor::new(vision).extract(&doc, "d.pdf").unwrap();
        assert!(chunks.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_verdict_text_defaults_to_empty() {
        let verdict = FigureVerdict::parse(r#" {"flowchart": false} "#, 1, 0).unwrap();
        assert!(!verdict.flowchart);
        assert!(verdict.text.is_empty());
        assert!(FigureVerdict::parse(r#"{"text": "x"}"#, 1, 0).is_err());
    }
}
