//! Scalar reference kernel for masked ZNCC.

use crate::candidate::topk::{Peak, TopK};
use crate::kernel::{Kernel, ScanParams, ScanRoi};
use crate::template::MaskedTemplatePlan;
use crate::util::{PoseMatchError, PoseMatchResult};
use crate::ImageView;

/// Scalar masked ZNCC kernel.
pub struct ZnccMaskedScalar;

impl ZnccMaskedScalar {
    fn score_unchecked(
        image: ImageView<'_, u8>,
        tpl: &MaskedTemplatePlan,
        x: usize,
        y: usize,
        min_var_i: f32,
    ) -> Option<f32> {
        let tpl_width = tpl.width();
        let t_prime = tpl.t_prime();
        let mask = tpl.mask();

        let mut dot = 0.0f64;
        let mut sum_i = 0.0f64;
        let mut sum_i2 = 0.0f64;
        for ty in 0..tpl.height() {
            let img_row = image.row(y + ty)?;
            let base = ty * tpl_width;
            for tx in 0..tpl_width {
                let idx = base + tx;
                if mask[idx] == 0 {
                    continue;
                }
                let value = f64::from(img_row[x + tx]);
                dot += f64::from(t_prime[idx]) * value;
                sum_i += value;
                sum_i2 += value * value;
            }
        }

        let var_i = sum_i2 - (sum_i * sum_i) / tpl.sum_w();
        if var_i <= f64::from(min_var_i) {
            return None;
        }
        let score = (dot / (tpl.var_t() * var_i).sqrt()) as f32;
        score.is_finite().then_some(score)
    }

    fn scan_range(
        image: ImageView<'_, u8>,
        tpl: &MaskedTemplatePlan,
        template_idx: usize,
        roi: ScanRoi,
        params: ScanParams,
    ) -> PoseMatchResult<Vec<Peak>> {
        if params.topk == 0 {
            return Ok(Vec::new());
        }

        let img_width = image.width();
        let img_height = image.height();
        let tpl_width = tpl.width();
        let tpl_height = tpl.height();
        if img_width < tpl_width || img_height < tpl_height {
            return Err(PoseMatchError::RoiOutOfBounds {
                x: 0,
                y: 0,
                width: tpl_width as i64,
                height: tpl_height as i64,
                img_width,
                img_height,
            });
        }

        let max_x = img_width - tpl_width;
        let max_y = img_height - tpl_height;
        if roi.x0 > max_x || roi.y0 > max_y {
            return Ok(Vec::new());
        }
        let x1 = roi.x1.min(max_x);
        let y1 = roi.y1.min(max_y);
        if roi.x0 > x1 || roi.y0 > y1 {
            return Ok(Vec::new());
        }

        let mut topk_buf = TopK::new(params.topk);
        for y in roi.y0..=y1 {
            for x in roi.x0..=x1 {
                let Some(score) = Self::score_unchecked(image, tpl, x, y, params.min_var_i) else {
                    continue;
                };
                if score >= params.min_score {
                    topk_buf.push(Peak {
                        x,
                        y,
                        score,
                        template_idx,
                    });
                }
            }
        }

        Ok(topk_buf.into_sorted_desc())
    }
}

impl Kernel for ZnccMaskedScalar {
    type Plan = MaskedTemplatePlan;

    fn score_at(
        image: ImageView<'_, u8>,
        tpl: &Self::Plan,
        x: usize,
        y: usize,
        min_var_i: f32,
    ) -> f32 {
        if image.width() < tpl.width() || image.height() < tpl.height() {
            return f32::NEG_INFINITY;
        }
        if x > image.width() - tpl.width() || y > image.height() - tpl.height() {
            return f32::NEG_INFINITY;
        }
        Self::score_unchecked(image, tpl, x, y, min_var_i).unwrap_or(f32::NEG_INFINITY)
    }

    fn scan_roi(
        image: ImageView<'_, u8>,
        tpl: &Self::Plan,
        template_idx: usize,
        roi: ScanRoi,
        params: ScanParams,
    ) -> PoseMatchResult<Vec<Peak>> {
        Self::scan_range(image, tpl, template_idx, roi, params)
    }
}
