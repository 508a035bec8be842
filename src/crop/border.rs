//! Uniform border strip detection.

use crate::image::{ColorImage, Rect};

/// Returns `true` when every pixel of `strip` equals `color` exactly.
///
/// Comparison is channel-wise over the first three channels with no
/// tolerance. An empty strip is vacuously a border. The strip must lie inside
/// the image; pixels outside it are treated as non-border.
pub fn is_border_strip(image: &ColorImage, strip: Rect, color: [u8; 3]) -> bool {
    if strip.is_empty() {
        return true;
    }
    if !strip.fits_within(image.width(), image.height()) {
        return false;
    }

    let x0 = strip.x as usize;
    let y0 = strip.y as usize;
    let x1 = x0 + strip.width as usize;
    let y1 = y0 + strip.height as usize;
    (y0..y1).all(|y| {
        (x0..x1).all(|x| {
            image
                .pixel(x, y)
                .is_some_and(|px| px.len() >= 3 && px[..3] == color)
        })
    })
}
