//! Image pyramid construction for single-channel `u8` images.
//!
//! Intensity levels use a 2x2 box filter with integer rounding:
//! `dst = ((a + b + c + d) + 2) / 4`. Mask levels keep a pixel as foreground
//! only when all four parents are foreground, so a coarse mask never covers
//! pixels that were background at full resolution.

use crate::image::{ImageView, OwnedImage};
use crate::util::{PoseMatchError, PoseMatchResult};

/// Owned image pyramid built from a base level.
pub struct ImagePyramid {
    levels: Vec<OwnedImage>,
}

impl ImagePyramid {
    /// Builds an intensity pyramid from a base grayscale view.
    ///
    /// `max_levels` is clamped to at least 1 so the base level is always present.
    pub fn build_u8(base: ImageView<'_, u8>, max_levels: usize) -> PoseMatchResult<Self> {
        Self::build_with(base, max_levels, |a, b, c, d| {
            let sum = u16::from(a) + u16::from(b) + u16::from(c) + u16::from(d);
            ((sum + 2) / 4) as u8
        })
    }

    /// Builds a mask pyramid where a coarse pixel is set only if all parents are.
    pub fn build_mask(base: ImageView<'_, u8>, max_levels: usize) -> PoseMatchResult<Self> {
        Self::build_with(base, max_levels, |a, b, c, d| {
            if a != 0 && b != 0 && c != 0 && d != 0 {
                255
            } else {
                0
            }
        })
    }

    fn build_with(
        base: ImageView<'_, u8>,
        max_levels: usize,
        reduce: impl Fn(u8, u8, u8, u8) -> u8,
    ) -> PoseMatchResult<Self> {
        let max_levels = max_levels.max(1);
        let mut levels = vec![OwnedImage::from_view(base)?];

        while levels.len() < max_levels {
            let src = match levels.last() {
                Some(prev) => prev.view(),
                None => break,
            };
            if src.width() < 2 || src.height() < 2 {
                break;
            }

            let dst_width = src.width() / 2;
            let dst_height = src.height() / 2;
            let mut dst = vec![0u8; dst_width * dst_height];

            for y in 0..dst_height {
                let row0 = src.row(y * 2).ok_or(PoseMatchError::BufferTooSmall {
                    needed: (y * 2 + 1) * src.stride(),
                    got: src.as_slice().len(),
                })?;
                let row1 = src.row(y * 2 + 1).ok_or(PoseMatchError::BufferTooSmall {
                    needed: (y * 2 + 2) * src.stride(),
                    got: src.as_slice().len(),
                })?;

                for x in 0..dst_width {
                    dst[y * dst_width + x] =
                        reduce(row0[2 * x], row0[2 * x + 1], row1[2 * x], row1[2 * x + 1]);
                }
            }

            levels.push(OwnedImage::new(dst, dst_width, dst_height)?);
        }

        Ok(Self { levels })
    }

    /// Returns all pyramid levels (level 0 is the base resolution).
    pub fn levels(&self) -> &[OwnedImage] {
        &self.levels
    }

    /// Returns a view for a specific pyramid level.
    pub fn level(&self, index: usize) -> Option<ImageView<'_, u8>> {
        self.levels.get(index).map(|level| level.view())
    }

    /// Consumes the pyramid and returns its levels.
    pub fn into_levels(self) -> Vec<OwnedImage> {
        self.levels
    }
}
