/// Axis-aligned integer rectangle in pixel coordinates.
///
/// Coordinates are signed so that padded windows may temporarily extend past
/// the image origin; [`Rect::fits_within`] tells whether a window can be used
/// to index an image of a given size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left column.
    pub x: i32,
    /// Top row.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// Creates a rectangle from its origin and size.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns the rectangle covering a whole `width x height` image.
    pub fn full(width: usize, height: usize) -> Self {
        Self::new(0, 0, clamp_i32(width), clamp_i32(height))
    }

    /// Grows the rectangle by `margin` pixels on every side without clamping.
    pub fn padded(self, margin: i32) -> Self {
        Self {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + 2 * margin,
            height: self.height + 2 * margin,
        }
    }

    /// Returns `width * height`, or zero for degenerate rectangles.
    pub fn area(&self) -> usize {
        if self.width <= 0 || self.height <= 0 {
            return 0;
        }
        self.width as usize * self.height as usize
    }

    /// Returns `true` when the rectangle has no pixels.
    pub fn is_empty(&self) -> bool {
        self.area() == 0
    }

    /// Returns `true` when the rectangle lies inside a `width x height` image.
    pub fn fits_within(&self, width: usize, height: usize) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.width >= 0
            && self.height >= 0
            && i64::from(self.x) + i64::from(self.width) <= width as i64
            && i64::from(self.y) + i64::from(self.height) <= height as i64
    }
}

fn clamp_i32(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
