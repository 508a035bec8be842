//! Masked ZNCC plan precomputation.

use crate::image::ImageView;
use crate::util::{PoseMatchError, PoseMatchResult};

/// Minimum number of foreground pixels for a usable plan.
const MIN_FOREGROUND: usize = 2;

/// Precomputed masked statistics for ZNCC scoring.
///
/// `t_prime` holds `t - mean_t` for foreground pixels and zero elsewhere, so
/// the correlation numerator reduces to `sum(t_prime * image)`.
pub struct MaskedTemplatePlan {
    width: usize,
    height: usize,
    mask: Vec<u8>,
    t_prime: Vec<f32>,
    sum_w: f64,
    var_t: f64,
}

impl MaskedTemplatePlan {
    /// Builds a plan from a template view and a same-sized mask view.
    pub fn from_views(tpl: ImageView<'_, u8>, mask: ImageView<'_, u8>) -> PoseMatchResult<Self> {
        let width = tpl.width();
        let height = tpl.height();
        if mask.width() != width || mask.height() != height {
            return Err(PoseMatchError::MaskMismatch {
                width,
                height,
                mask_width: mask.width(),
                mask_height: mask.height(),
            });
        }

        let mut flags = Vec::with_capacity(width * height);
        let mut values = Vec::with_capacity(width * height);
        let mut count = 0usize;
        let mut sum = 0.0f64;
        for y in 0..height {
            let (Some(t_row), Some(m_row)) = (tpl.row(y), mask.row(y)) else {
                return Err(PoseMatchError::BufferTooSmall {
                    needed: (y + 1) * tpl.stride(),
                    got: tpl.as_slice().len(),
                });
            };
            for (&t, &m) in t_row.iter().zip(m_row) {
                let on = u8::from(m != 0);
                flags.push(on);
                values.push(t);
                if on == 1 {
                    count += 1;
                    sum += f64::from(t);
                }
            }
        }

        if count < MIN_FOREGROUND {
            return Err(PoseMatchError::DegenerateTemplate {
                reason: "empty mask",
            });
        }

        let mean = sum / count as f64;
        let mut var_t = 0.0f64;
        let t_prime = values
            .iter()
            .zip(&flags)
            .map(|(&t, &on)| {
                if on == 0 {
                    return 0.0;
                }
                let d = f64::from(t) - mean;
                var_t += d * d;
                d as f32
            })
            .collect();
        if var_t <= 1e-8 {
            return Err(PoseMatchError::DegenerateTemplate {
                reason: "zero variance",
            });
        }

        Ok(Self {
            width,
            height,
            mask: flags,
            t_prime,
            sum_w: count as f64,
            var_t,
        })
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the 0/1 foreground flags in row-major order.
    pub fn mask(&self) -> &[u8] {
        &self.mask
    }

    /// Returns the zero-mean foreground values in row-major order.
    pub fn t_prime(&self) -> &[f32] {
        &self.t_prime
    }

    /// Returns the number of foreground pixels.
    pub fn sum_w(&self) -> f64 {
        self.sum_w
    }

    /// Returns the sum of squared deviations over the foreground.
    pub fn var_t(&self) -> f64 {
        self.var_t
    }
}
