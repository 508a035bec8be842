use crate::image::{OwnedImage, Rect};
use crate::util::{PoseMatchError, PoseMatchResult};

/// Owned interleaved `u8` image with 1 to 4 channels per pixel.
///
/// Channels are stored in the order the decoder produced them; no
/// reordering is applied after loading.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
    channels: usize,
}

impl ColorImage {
    /// Creates an image from an interleaved row-major buffer.
    pub fn new(data: Vec<u8>, width: usize, height: usize, channels: usize) -> PoseMatchResult<Self> {
        if !(1..=4).contains(&channels) {
            return Err(PoseMatchError::UnsupportedChannels {
                expected: "1..=4",
                got: channels,
            });
        }
        if width == 0 || height == 0 {
            return Err(PoseMatchError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(channels))
            .ok_or(PoseMatchError::InvalidDimensions { width, height })?;
        if data.len() != needed {
            return Err(PoseMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Creates an image with every pixel set to `color`.
    pub fn filled(width: usize, height: usize, color: &[u8]) -> PoseMatchResult<Self> {
        let count = width
            .checked_mul(height)
            .ok_or(PoseMatchError::InvalidDimensions { width, height })?;
        let data = color.repeat(count);
        Self::new(data, width, height, color.len())
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of interleaved channels.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Returns the interleaved pixel buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns `true` when the image holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the channel values of pixel `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (y * self.width + x) * self.channels;
        self.data.get(start..start + self.channels)
    }

    /// Overwrites pixel `(x, y)`; out-of-bounds writes are ignored.
    ///
    /// Only the first `min(channels, color.len())` channels are written.
    pub fn put_pixel(&mut self, x: usize, y: usize, color: &[u8]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let start = (y * self.width + x) * self.channels;
        let n = self.channels.min(color.len());
        self.data[start..start + n].copy_from_slice(&color[..n]);
    }

    /// Returns the interleaved pixels of row `y`.
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let stride = self.width * self.channels;
        self.data.get(y * stride..(y + 1) * stride)
    }

    /// Copies the pixels inside `win` into a new image.
    ///
    /// The window is not clamped; any part outside the image is an error.
    pub fn crop(&self, win: &Rect) -> PoseMatchResult<ColorImage> {
        if !win.fits_within(self.width, self.height) || win.is_empty() {
            return Err(PoseMatchError::RoiOutOfBounds {
                x: i64::from(win.x),
                y: i64::from(win.y),
                width: i64::from(win.width),
                height: i64::from(win.height),
                img_width: self.width,
                img_height: self.height,
            });
        }
        let x0 = win.x as usize;
        let y0 = win.y as usize;
        let width = win.width as usize;
        let height = win.height as usize;
        let mut data = Vec::with_capacity(width * height * self.channels);
        for y in y0..y0 + height {
            let start = (y * self.width + x0) * self.channels;
            data.extend_from_slice(&self.data[start..start + width * self.channels]);
        }
        ColorImage::new(data, width, height, self.channels)
    }

    /// Converts to a single-channel intensity image.
    ///
    /// Images with three or more channels use ITU-R 601 luma weights over the
    /// first three channels; any fourth channel is ignored. One- and
    /// two-channel images keep their first channel.
    pub fn to_luma(&self) -> OwnedImage {
        let mut out = Vec::with_capacity(self.width * self.height);
        for px in self.data.chunks_exact(self.channels) {
            let value = if self.channels >= 3 {
                let sum = 299 * u32::from(px[0]) + 587 * u32::from(px[1]) + 114 * u32::from(px[2]);
                ((sum + 500) / 1000) as u8
            } else {
                px[0]
            };
            out.push(value);
        }
        OwnedImage {
            data: out,
            width: self.width,
            height: self.height,
        }
    }
}
