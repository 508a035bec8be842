//! Chroma-key foreground masks for rendered templates.

use crate::image::{ColorImage, OwnedImage};
use crate::util::{PoseMatchError, PoseMatchResult};

/// Mask value for foreground pixels.
pub const MASK_FOREGROUND: u8 = 255;
/// Mask value for background (key colour) pixels.
pub const MASK_BACKGROUND: u8 = 0;

/// Inclusive per-channel colour range reserved as template background.
///
/// Bounds are given in stored channel order. The default range
/// `[0, 0, 244] ..= [1, 1, 255]` keys out a saturated third channel, which is
/// pure blue for RGB-ordered pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChromaKey {
    /// Lower bound per channel (inclusive).
    pub lower: [u8; 3],
    /// Upper bound per channel (inclusive).
    pub upper: [u8; 3],
}

impl Default for ChromaKey {
    fn default() -> Self {
        Self {
            lower: [0, 0, 244],
            upper: [1, 1, 255],
        }
    }
}

impl ChromaKey {
    /// Returns `true` when the first three channels of `px` fall in the range.
    pub fn contains(&self, px: &[u8]) -> bool {
        px.iter()
            .take(3)
            .zip(self.lower.iter().zip(self.upper.iter()))
            .all(|(&v, (&lo, &hi))| lo <= v && v <= hi)
    }
}

/// Computes a foreground mask marking every pixel outside the key range.
///
/// Key-coloured pixels become [`MASK_BACKGROUND`], all others
/// [`MASK_FOREGROUND`]. The image needs at least three channels; a fourth
/// channel is ignored.
pub fn foreground_mask(image: &ColorImage, key: &ChromaKey) -> PoseMatchResult<OwnedImage> {
    let channels = image.channels();
    if channels < 3 {
        return Err(PoseMatchError::UnsupportedChannels {
            expected: "3 or 4",
            got: channels,
        });
    }

    let mask = image
        .data()
        .chunks_exact(channels)
        .map(|px| {
            if key.contains(px) {
                MASK_BACKGROUND
            } else {
                MASK_FOREGROUND
            }
        })
        .collect();
    OwnedImage::new(mask, image.width(), image.height())
}
