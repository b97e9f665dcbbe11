//! Integration tests for the figure pass.

use std::io::Cursor;
use std::sync::{Arc, Mutex};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use image::{DynamicImage, GenericImageView, ImageFormat, RgbImage};
use lexchunk::figure::{FigureExtractor, FLOWCHART_PROMPT};
use lexchunk::{parse_document, BoundingBox, Document, Page, Result, VisionModel};

/// Records the size of every crop it is shown and replies with a flowchart
/// naming the crop's position in the call sequence.
#[derive(Default)]
struct RecordingVision {
    seen: Mutex<Vec<(u32, u32)>>,
}

impl VisionModel for RecordingVision {
    fn name(&self) -> &str {
        "recording"
    }

    fn describe(&self, png: &[u8], prompt: &str) -> Result<String> {
        assert_eq!(prompt, FLOWCHART_PROMPT);
        let crop = image::load_from_memory(png)?;
        let mut seen = self.seen.lock().unwrap();
        seen.push(crop.dimensions());
        Ok(format!(
            r#"{{"flowchart": true, "text": "- Step {}"}}"#,
            seen.len()
        ))
    }
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(RgbImage::new(width, height))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

#[test]
fn test_crops_follow_page_and_region_order() {
    let mut doc = Document::new();
    doc.add_page(
        Page::new(4)
            .with_image(png(1000, 1000))
            .with_figure(BoundingBox::new(0.0, 0.0, 0.5, 0.4))
            .with_figure(BoundingBox::new(0.5, 0.5, 0.5, 0.5)),
    );
    doc.add_page(
        Page::new(9)
            .with_image(png(800, 600))
            .with_figure(BoundingBox::new(0.0, 0.0, 1.0, 1.0)),
    );

    let vision = Arc::new(RecordingVision::default());
    let chunks = FigureExtractor::new(vision.clone())
        .extract(&doc, "wpam.pdf")
        .unwrap();

    assert_eq!(
        *vision.seen.lock().unwrap(),
        vec![(500, 400), (500, 500), (800, 600)]
    );
    let summary: Vec<(&str, u32)> = chunks
        .iter()
        .map(|c| (c.text.as_str(), c.start_page()))
        .collect();
    assert_eq!(
        summary,
        vec![("- Step 1", 4), ("- Step 2", 4), ("- Step 3", 9)]
    );
}

#[test]
fn test_figure_page_from_json() {
    let json = format!(
        r#"{{"pages": [{{"number": 2, "image": "{}", "figures": [{{"x": 0.1, "y": 0.1, "width": 0.8, "height": 0.8}}]}}]}}"#,
        BASE64.encode(png(500, 500))
    );
    let doc = parse_document(&json).unwrap();
    assert_eq!(doc.figure_count(), 1);

    let vision = Arc::new(RecordingVision::default());
    let chunks = FigureExtractor::new(vision.clone())
        .extract(&doc, "wpam.pdf")
        .unwrap();

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].heading(), "Flowchart");
    assert_eq!(*vision.seen.lock().unwrap(), vec![(400, 400)]);
}

#[test]
fn test_figure_boxes_clamped_to_page() {
    let mut doc = Document::new();
    doc.add_page(
        Page::new(1)
            .with_image(png(600, 600))
            .with_figure(BoundingBox::new(0.25, 0.25, 1.0, 1.0)),
    );

    let vision = Arc::new(RecordingVision::default());
    FigureExtractor::new(vision.clone())
        .with_min_px(100)
        .extract(&doc, "wpam.pdf")
        .unwrap();
    assert_eq!(*vision.seen.lock().unwrap(), vec![(450, 450)]);
}
