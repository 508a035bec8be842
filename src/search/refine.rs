//! Refinement search around coarse candidates.
//!
//! Refinement upsamples candidates to the next finer level and rescans a
//! local ROI to recover full-resolution positions.

use crate::bank::CompiledTemplate;
use crate::candidate::nms::nms_2d;
use crate::candidate::topk::Peak;
use crate::kernel::scalar::ZnccMaskedScalar;
use crate::kernel::{Kernel, ScanParams, ScanRoi};
use crate::search::DetectorConfig;
use crate::util::PoseMatchResult;
use crate::ImageView;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Candidate {
    pub(crate) level: usize,
    pub(crate) x: usize,
    pub(crate) y: usize,
    pub(crate) template_idx: usize,
    pub(crate) score: f32,
}

impl Candidate {
    pub(crate) fn from_peak(level: usize, peak: Peak) -> Self {
        Self {
            level,
            x: peak.x,
            y: peak.y,
            template_idx: peak.template_idx,
            score: peak.score,
        }
    }
}

fn upscale_pos(x: usize, y: usize) -> (usize, usize) {
    (x.saturating_mul(2), y.saturating_mul(2))
}

fn roi_bounds(x: usize, y: usize, radius: usize, max_x: usize, max_y: usize) -> Option<ScanRoi> {
    let x0 = x.saturating_sub(radius);
    let y0 = y.saturating_sub(radius);
    if x0 > max_x || y0 > max_y {
        return None;
    }
    Some(ScanRoi {
        x0,
        y0,
        x1: x.saturating_add(radius).min(max_x),
        y1: y.saturating_add(radius).min(max_y),
    })
}

/// Keeps the strongest spatially distinct candidates, at most `beam_width`.
pub(crate) fn prune(peaks: &mut [Peak], level: usize, cfg: &DetectorConfig) -> Vec<Candidate> {
    let mut kept = nms_2d(peaks, cfg.nms_radius);
    kept.truncate(cfg.beam_width);
    kept.into_iter()
        .map(|peak| Candidate::from_peak(level, peak))
        .collect()
}

pub(crate) fn refine_to_finer_level(
    image: ImageView<'_, u8>,
    compiled: &CompiledTemplate,
    finer_level: usize,
    prev: &[Candidate],
    cfg: &DetectorConfig,
) -> PoseMatchResult<Vec<Candidate>> {
    if prev.is_empty() {
        return Ok(Vec::new());
    }

    let plan = compiled.plan(finer_level)?;
    if image.width() < plan.width() || image.height() < plan.height() {
        return Ok(Vec::new());
    }
    let max_x = image.width() - plan.width();
    let max_y = image.height() - plan.height();

    let params = ScanParams {
        topk: cfg.per_template_topk,
        min_var_i: cfg.min_var_i,
        min_score: f32::NEG_INFINITY,
    };
    let mut all_peaks = Vec::new();
    for cand in prev.iter().copied() {
        debug_assert!(cand.level > finer_level);
        let (x_up, y_up) = upscale_pos(cand.x, cand.y);
        let Some(roi) = roi_bounds(x_up, y_up, cfg.roi_radius, max_x, max_y) else {
            continue;
        };
        let peaks = <ZnccMaskedScalar as Kernel>::scan_roi(
            image,
            plan,
            cand.template_idx,
            roi,
            params,
        )?;
        all_peaks.extend(peaks);
    }

    if all_peaks.is_empty() {
        return Ok(Vec::new());
    }
    Ok(prune(&mut all_peaks, finer_level, cfg))
}
