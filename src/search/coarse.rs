//! Coarse search at the top of the pyramid.
//!
//! Coarse search evaluates the full translation range for one template at
//! the coarsest level both the template and the test image provide, then
//! prunes the peaks to a beam.

use crate::bank::CompiledTemplate;
use crate::kernel::scalar::ZnccMaskedScalar;
use crate::kernel::{Kernel, ScanParams};
use crate::search::refine::{prune, Candidate};
use crate::search::DetectorConfig;
use crate::trace::{trace_event, trace_span};
use crate::util::PoseMatchResult;
use crate::ImageView;

/// Picks the coarsest level at which the template fits inside the image.
pub(crate) fn start_level(
    images: &[ImageView<'_, u8>],
    compiled: &CompiledTemplate,
) -> Option<usize> {
    let top = images.len().min(compiled.num_levels()).checked_sub(1)?;
    (0..=top).rev().find(|&level| {
        let (w, h) = compiled.level_size(level).unwrap_or((usize::MAX, usize::MAX));
        images[level].width() >= w && images[level].height() >= h
    })
}

pub(crate) fn coarse_search_level(
    image: ImageView<'_, u8>,
    compiled: &CompiledTemplate,
    template_idx: usize,
    level: usize,
    cfg: &DetectorConfig,
) -> PoseMatchResult<Vec<Candidate>> {
    let _span = trace_span!("coarse_search", level = level, template = template_idx).entered();

    let params = ScanParams {
        topk: cfg.per_template_topk,
        min_var_i: cfg.min_var_i,
        min_score: f32::NEG_INFINITY,
    };
    let plan = compiled.plan(level)?;
    let mut peaks = <ZnccMaskedScalar as Kernel>::scan_full(image, plan, template_idx, params)?;
    if peaks.is_empty() {
        return Ok(Vec::new());
    }

    let out = prune(&mut peaks, level, cfg);
    trace_event!("coarse_candidates", count = out.len());
    Ok(out)
}
