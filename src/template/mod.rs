//! Engine-side template storage and planning utilities.

use crate::image::{ImageView, OwnedImage};
use crate::util::{PoseMatchError, PoseMatchResult};

mod plan;

pub use plan::MaskedTemplatePlan;

/// Grayscale template paired with its foreground mask.
pub struct Template {
    img: OwnedImage,
    mask: OwnedImage,
}

impl Template {
    /// Pairs an intensity image with a mask of identical size.
    pub fn new(img: OwnedImage, mask: OwnedImage) -> PoseMatchResult<Self> {
        if img.width() != mask.width() || img.height() != mask.height() {
            return Err(PoseMatchError::MaskMismatch {
                width: img.width(),
                height: img.height(),
                mask_width: mask.width(),
                mask_height: mask.height(),
            });
        }
        Ok(Self { img, mask })
    }

    /// Creates a template whose every pixel is foreground.
    pub fn unmasked(img: OwnedImage) -> PoseMatchResult<Self> {
        let mask = OwnedImage::new(vec![255; img.width() * img.height()], img.width(), img.height())?;
        Self::new(img, mask)
    }

    /// Returns a borrowed view of the template intensities.
    pub fn view(&self) -> ImageView<'_, u8> {
        self.img.view()
    }

    /// Returns a borrowed view of the mask.
    pub fn mask_view(&self) -> ImageView<'_, u8> {
        self.mask.view()
    }
}
