//! Vision model seam used by the figure pass.

use crate::error::Result;

/// A multimodal model that can describe an image.
///
/// Implement this trait to plug in a hosted or local model. The figure
/// pass sends one PNG per figure region together with a fixed instruction
/// prompt and expects the raw model reply back.
pub trait VisionModel: Send + Sync {
    /// Model name for logs.
    fn name(&self) -> &str;

    /// Describe a PNG-encoded image according to `prompt`.
    ///
    /// Transport failures should be reported as [`crate::Error::Vision`].
    fn describe(&self, png: &[u8], prompt: &str) -> Result<String>;
}

impl<F> VisionModel for F
where
    F: Fn(&[u8], &str) -> Result<String> + Send + Sync,
{
    fn name(&self) -> &str {
        "closure"
    }

    fn describe(&self, png: &[u8], prompt: &str) -> Result<String> {
        self(png, prompt)
    }
}
