//! Precomputed template assets for coarse-to-fine search.
//!
//! Compiling a template once builds its intensity and mask pyramids and a
//! masked ZNCC plan per level, so repeated match calls only pay for scanning.
//! Coarse levels whose mask erodes away or whose foreground loses all
//! variance are trimmed; only the full-resolution level is mandatory.

use crate::image::pyramid::ImagePyramid;
use crate::template::{MaskedTemplatePlan, Template};
use crate::trace::trace_event;
use crate::util::{PoseMatchError, PoseMatchResult};

/// Configuration for compiling template assets.
#[derive(Clone, Debug)]
pub struct CompileConfig {
    /// Maximum pyramid levels to build.
    pub max_levels: usize,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self { max_levels: 3 }
    }
}

/// Compiled template assets with one masked plan per pyramid level.
pub struct CompiledTemplate {
    plans: Vec<MaskedTemplatePlan>,
}

impl CompiledTemplate {
    /// Compiles template assets for matching.
    pub fn compile(tpl: &Template, cfg: &CompileConfig) -> PoseMatchResult<Self> {
        let levels = ImagePyramid::build_u8(tpl.view(), cfg.max_levels)?.into_levels();
        let masks = ImagePyramid::build_mask(tpl.mask_view(), cfg.max_levels)?.into_levels();

        let mut plans = Vec::with_capacity(levels.len());
        for (level, (img, mask)) in levels.iter().zip(masks.iter()).enumerate() {
            match MaskedTemplatePlan::from_views(img.view(), mask.view()) {
                Ok(plan) => plans.push(plan),
                Err(err) if level == 0 => return Err(err),
                Err(_) => break,
            }
        }

        trace_event!("template_compiled", levels = plans.len());
        Ok(Self { plans })
    }

    /// Returns the number of usable pyramid levels.
    pub fn num_levels(&self) -> usize {
        self.plans.len()
    }

    /// Returns the width and height for a pyramid level.
    pub fn level_size(&self, level: usize) -> Option<(usize, usize)> {
        self.plans
            .get(level)
            .map(|plan| (plan.width(), plan.height()))
    }

    /// Returns the masked plan for a pyramid level.
    pub fn plan(&self, level: usize) -> PoseMatchResult<&MaskedTemplatePlan> {
        self.plans
            .get(level)
            .ok_or(PoseMatchError::InvalidInput("pyramid level out of range"))
    }
}
