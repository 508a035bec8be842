//! Error types for posematch.

use thiserror::Error;

/// Result alias for posematch operations.
pub type PoseMatchResult<T> = std::result::Result<T, PoseMatchError>;

/// Errors that can occur while cropping, registering, or matching templates.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PoseMatchError {
    /// Width or height is zero, or the pixel count overflows.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Stride is smaller than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// The backing buffer is shorter than the declared geometry requires.
    #[error("buffer too small: needed {needed} elements, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A region of interest does not fit inside the image.
    #[error(
        "roi ({x}, {y}, {width}x{height}) out of bounds for image {img_width}x{img_height}"
    )]
    RoiOutOfBounds {
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        img_width: usize,
        img_height: usize,
    },
    /// The image has a channel count the operation cannot handle.
    #[error("unsupported channel count: expected {expected}, got {got}")]
    UnsupportedChannels { expected: &'static str, got: usize },
    /// A template has no usable foreground or no intensity variance.
    #[error("degenerate template: {reason}")]
    DegenerateTemplate { reason: &'static str },
    /// A mask does not have the same size as its template.
    #[error("mask {mask_width}x{mask_height} does not match template {width}x{height}")]
    MaskMismatch {
        width: usize,
        height: usize,
        mask_width: usize,
        mask_height: usize,
    },
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Decoding or encoding an image file failed.
    #[error("image i/o failed for {path}: {reason}")]
    ImageIo { path: String, reason: String },
    /// A test image could not be loaded.
    #[error("cannot read test image {path}: {reason}")]
    TestImageLoad { path: String, reason: String },
    /// A pose file could not be read.
    #[error("cannot read pose file {path}: {reason}")]
    PoseIo { path: String, reason: String },
    /// A pose file was read but does not hold a 4x4 matrix.
    #[error("malformed pose: {reason}")]
    PoseParse { reason: String },
    /// A match identifier is not a template sequence number.
    #[error("invalid template id {0:?}")]
    InvalidTemplateId(String),
    /// A match identifier does not correspond to any ingested template.
    #[error("template {0} is not registered")]
    TemplateNotFound(String),
    /// The engine returned no match for a test image.
    #[error("no match found above threshold {threshold}")]
    NoMatchFound { threshold: f32 },
}
