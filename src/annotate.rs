//! Drawing helpers for visualising detections.

use crate::image::{ColorImage, Rect};

/// Radius of the filled marker drawn at a detection.
pub const MARKER_RADIUS: usize = 8;
/// Marker colour (green in RGB order).
pub const MARKER_COLOR: [u8; 3] = [0, 255, 0];

/// Draws a filled disc of `radius` centred on `(cx, cy)`, clipped to the image.
pub fn mark_match(image: &mut ColorImage, cx: usize, cy: usize, radius: usize, color: [u8; 3]) {
    let r2 = radius * radius;
    let y0 = cy.saturating_sub(radius);
    let x0 = cx.saturating_sub(radius);
    let y1 = (cy + radius).min(image.height().saturating_sub(1));
    let x1 = (cx + radius).min(image.width().saturating_sub(1));
    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x.abs_diff(cx);
            let dy = y.abs_diff(cy);
            if dx * dx + dy * dy <= r2 {
                image.put_pixel(x, y, &color);
            }
        }
    }
}

/// Draws the one pixel outline of `rect`, clipped to the image.
pub fn outline_rect(image: &mut ColorImage, rect: Rect, color: [u8; 3]) {
    if rect.is_empty() {
        return;
    }
    let x0 = i64::from(rect.x);
    let y0 = i64::from(rect.y);
    let x1 = x0 + i64::from(rect.width) - 1;
    let y1 = y0 + i64::from(rect.height) - 1;
    let mut put = |x: i64, y: i64| {
        if x >= 0 && y >= 0 {
            image.put_pixel(x as usize, y as usize, &color);
        }
    };
    for x in x0..=x1 {
        put(x, y0);
        put(x, y1);
    }
    for y in y0..=y1 {
        put(x0, y);
        put(x1, y);
    }
}
