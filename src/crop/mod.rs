//! Automatic removal of uniform background padding around a template.
//!
//! The background colour is taken from pixel `(0, 0)`. Cropping only happens
//! when all four sampled edge strips are pure background; the window is then
//! shrunk from the bottom, right, top and left in that order. The bottom and
//! right passes read the window size left by the previous pass, so the order
//! is part of the result.

mod border;

pub use border::is_border_strip;

use crate::image::{ColorImage, Rect};
use crate::trace::trace_event;
use crate::util::{PoseMatchError, PoseMatchResult};

/// Distance from the far edge at which bottom and right strips are sampled.
///
/// Rendered template sets may carry a one pixel artifact on their last row
/// and column, so the far strips are read at `dimension - 2` instead of
/// `dimension - 1`. Existing template sets were tuned against this offset and
/// crop differently if it changes.
pub const EDGE_SAMPLE_INSET: i32 = 2;

/// Returns the minimal window excluding uniform border padding.
///
/// The image must have exactly three channels. Images with no complete
/// background border, or smaller than two pixels in either direction, are
/// returned as a full-image window. A uniformly coloured image collapses to
/// `Rect(1, 1, 0, 0)`.
pub fn autocrop(image: &ColorImage) -> PoseMatchResult<Rect> {
    if image.channels() != 3 {
        return Err(PoseMatchError::UnsupportedChannels {
            expected: "3",
            got: image.channels(),
        });
    }

    let full = Rect::full(image.width(), image.height());
    if full.width < EDGE_SAMPLE_INSET || full.height < EDGE_SAMPLE_INSET {
        return Ok(full);
    }
    let color = background_color(image)?;

    let cols = full.width;
    let rows = full.height;
    let edges = [
        Rect::new(0, 0, cols, 1),
        Rect::new(cols - EDGE_SAMPLE_INSET, 0, 1, rows),
        Rect::new(0, rows - EDGE_SAMPLE_INSET, cols, 1),
        Rect::new(0, 0, 1, rows),
    ];
    let nborder = edges
        .iter()
        .filter(|edge| is_border_strip(image, **edge, color))
        .count();
    if nborder < edges.len() {
        return Ok(full);
    }

    let win = shrink_bottom(image, full, color);
    let win = shrink_right(image, win, color);
    let win = shrink_top(image, win, color);
    let win = shrink_left(image, win, color);

    trace_event!(
        "autocrop",
        x = win.x,
        y = win.y,
        width = win.width,
        height = win.height
    );
    Ok(win)
}

fn background_color(image: &ColorImage) -> PoseMatchResult<[u8; 3]> {
    match image.pixel(0, 0) {
        Some(&[r, g, b]) => Ok([r, g, b]),
        _ => Err(PoseMatchError::InvalidDimensions {
            width: image.width(),
            height: image.height(),
        }),
    }
}

fn shrink_bottom(image: &ColorImage, mut win: Rect, color: [u8; 3]) -> Rect {
    while win.height > 0 {
        let row = win.y + win.height - EDGE_SAMPLE_INSET;
        if row < win.y || !is_border_strip(image, Rect::new(win.x, row, win.width, 1), color) {
            break;
        }
        win.height -= 1;
    }
    win
}

fn shrink_right(image: &ColorImage, mut win: Rect, color: [u8; 3]) -> Rect {
    while win.width > 0 {
        let col = win.x + win.width - EDGE_SAMPLE_INSET;
        if col < win.x || !is_border_strip(image, Rect::new(col, win.y, 1, win.height), color) {
            break;
        }
        win.width -= 1;
    }
    win
}

fn shrink_top(image: &ColorImage, mut win: Rect, color: [u8; 3]) -> Rect {
    while win.height > 0 {
        if !is_border_strip(image, Rect::new(win.x, win.y, win.width, 1), color) {
            break;
        }
        win.y += 1;
        win.height -= 1;
    }
    win
}

fn shrink_left(image: &ColorImage, mut win: Rect, color: [u8; 3]) -> Rect {
    while win.width > 0 {
        if !is_border_strip(image, Rect::new(win.x, win.y, 1, win.height), color) {
            break;
        }
        win.x += 1;
        win.width -= 1;
    }
    win
}
