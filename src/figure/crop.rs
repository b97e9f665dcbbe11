//! Figure region cropping and PNG encoding.

use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

use crate::error::Result;
use crate::model::BoundingBox;

/// A pixel rectangle inside a page raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    /// Left edge
    pub left: u32,
    /// Top edge
    pub top: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl PixelRect {
    /// Map a normalized bounding box onto an image of `width` x `height`
    /// pixels. Coordinates are truncated and clamped to the image.
    pub fn from_bbox(bbox: &BoundingBox, width: u32, height: u32) -> Self {
        let scale = |v: f32, size: u32| -> u32 {
            let px = (f64::from(v) * f64::from(size)).trunc();
            px.clamp(0.0, f64::from(size)) as u32
        };

        let left = scale(bbox.x, width);
        let top = scale(bbox.y, height);
        let right = scale(bbox.x + bbox.width, width).max(left);
        let bottom = scale(bbox.y + bbox.height, height).max(top);

        Self {
            left,
            top,
            width: right - left,
            height: bottom - top,
        }
    }

    /// Whether both sides are at least `min_px`.
    pub fn is_at_least(&self, min_px: u32) -> bool {
        self.width >= min_px && self.height >= min_px
    }
}

/// Decode a page raster.
pub fn decode_page(data: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(data)?)
}

/// Crop a region and encode it as PNG.
pub fn crop_png(image: &DynamicImage, rect: PixelRect) -> Result<Vec<u8>> {
    let (w, h) = image.dimensions();
    debug_assert!(rect.left + rect.width <= w && rect.top + rect.height <= h);

    let cropped = image.crop_imm(rect.left, rect.top, rect.width, rect.height);
    let mut bytes = Vec::new();
    cropped.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}
