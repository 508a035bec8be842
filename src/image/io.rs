//! Convenience helpers for loading and saving images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled. Channel counts are
//! preserved on load: grayscale stays single-channel, alpha stays attached.

use crate::image::{ColorImage, OwnedImage};
use crate::util::{PoseMatchError, PoseMatchResult};
use std::path::Path;

/// Creates a color image from a decoded dynamic image, keeping its channels.
///
/// Images with 16-bit or floating point samples are reduced to 8 bits.
pub fn color_from_dynamic_image(img: &image::DynamicImage) -> PoseMatchResult<ColorImage> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    match img.color().channel_count() {
        1 => ColorImage::new(img.to_luma8().into_raw(), width, height, 1),
        2 => ColorImage::new(img.to_luma_alpha8().into_raw(), width, height, 2),
        3 => ColorImage::new(img.to_rgb8().into_raw(), width, height, 3),
        _ => ColorImage::new(img.to_rgba8().into_raw(), width, height, 4),
    }
}

/// Converts a color image back into a dynamic image for encoding.
pub fn dynamic_from_color_image(img: &ColorImage) -> PoseMatchResult<image::DynamicImage> {
    let width = img.width() as u32;
    let height = img.height() as u32;
    let data = img.data().to_vec();
    let invalid = PoseMatchError::InvalidDimensions {
        width: img.width(),
        height: img.height(),
    };
    let dynamic = match img.channels() {
        1 => image::GrayImage::from_raw(width, height, data).map(image::DynamicImage::ImageLuma8),
        2 => image::GrayAlphaImage::from_raw(width, height, data)
            .map(image::DynamicImage::ImageLumaA8),
        3 => image::RgbImage::from_raw(width, height, data).map(image::DynamicImage::ImageRgb8),
        _ => image::RgbaImage::from_raw(width, height, data).map(image::DynamicImage::ImageRgba8),
    };
    dynamic.ok_or(invalid)
}

/// Loads an image from disk without altering its channel layout.
pub fn load_color_image<P: AsRef<Path>>(path: P) -> PoseMatchResult<ColorImage> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|err| PoseMatchError::ImageIo {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    color_from_dynamic_image(&img)
}

/// Encodes an image to disk; the format follows the file extension.
pub fn save_color_image<P: AsRef<Path>>(img: &ColorImage, path: P) -> PoseMatchResult<()> {
    let path = path.as_ref();
    dynamic_from_color_image(img)?
        .save(path)
        .map_err(|err| PoseMatchError::ImageIo {
            path: path.display().to_string(),
            reason: err.to_string(),
        })
}

/// Encodes a single-channel image (for example a mask) to disk.
pub fn save_gray_image<P: AsRef<Path>>(img: &OwnedImage, path: P) -> PoseMatchResult<()> {
    let path = path.as_ref();
    let gray = image::GrayImage::from_raw(img.width() as u32, img.height() as u32, img.data().to_vec())
        .ok_or(PoseMatchError::InvalidDimensions {
            width: img.width(),
            height: img.height(),
        })?;
    gray.save(path).map_err(|err| PoseMatchError::ImageIo {
        path: path.display().to_string(),
        reason: err.to_string(),
    })
}
