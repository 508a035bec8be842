//! Placement scoring kernels.
//!
//! A kernel scores a compiled template at top-left placements of a luma
//! image. Placements whose image window is too flat to normalise are
//! skipped instead of scored.

use crate::candidate::topk::Peak;
use crate::util::PoseMatchResult;
use crate::ImageView;

pub mod scalar;

/// Limits applied while collecting peaks from a scan.
#[derive(Clone, Copy, Debug)]
pub struct ScanParams {
    /// Peaks retained per scan.
    pub topk: usize,
    /// Windows with masked intensity variance at or below this are skipped.
    pub min_var_i: f32,
    /// Peaks scoring below this are dropped.
    pub min_score: f32,
}

/// Inclusive rectangle of top-left placements.
///
/// Bounds past the last valid placement are clipped by the kernel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScanRoi {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl ScanRoi {
    /// Every placement of the image.
    pub const FULL: ScanRoi = ScanRoi {
        x0: 0,
        y0: 0,
        x1: usize::MAX,
        y1: usize::MAX,
    };
}

pub trait Kernel {
    type Plan;

    /// Score at one placement, or `-inf` when it is invalid or too flat.
    fn score_at(
        image: ImageView<'_, u8>,
        plan: &Self::Plan,
        x: usize,
        y: usize,
        min_var_i: f32,
    ) -> f32;

    /// Best peaks inside `roi`, best first.
    fn scan_roi(
        image: ImageView<'_, u8>,
        plan: &Self::Plan,
        template_idx: usize,
        roi: ScanRoi,
        params: ScanParams,
    ) -> PoseMatchResult<Vec<Peak>>;

    /// Best peaks over all placements, best first.
    fn scan_full(
        image: ImageView<'_, u8>,
        plan: &Self::Plan,
        template_idx: usize,
        params: ScanParams,
    ) -> PoseMatchResult<Vec<Peak>> {
        Self::scan_roi(image, plan, template_idx, ScanRoi::FULL, params)
    }
}
