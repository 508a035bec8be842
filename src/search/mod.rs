//! Template matching engine.
//!
//! [`MatchingEngine`] is the seam between the detection pipeline and the
//! matcher: templates are registered under a string class id and test images
//! return matches ordered best-first. [`Detector`] is the bundled engine. It
//! scores masked ZNCC on luma, searching coarse-to-fine over image pyramids.

pub(crate) mod coarse;
pub(crate) mod refine;

use crate::bank::{CompileConfig, CompiledTemplate};
use crate::image::pyramid::ImagePyramid;
use crate::image::{ColorImage, ImageView, OwnedImage};
use crate::search::coarse::{coarse_search_level, start_level};
use crate::search::refine::{refine_to_finer_level, Candidate};
use crate::template::Template;
use crate::trace::{trace_event, trace_span};
use crate::util::{PoseMatchError, PoseMatchResult};
use std::cmp::Ordering;

/// A template placement accepted by the engine.
#[derive(Clone, Debug, PartialEq)]
pub struct Match {
    /// Class id the template was registered under.
    pub class_id: String,
    /// Registration order of the template inside the engine.
    pub template_index: usize,
    /// Column of the template's top-left corner in the test image.
    pub x: usize,
    /// Row of the template's top-left corner in the test image.
    pub y: usize,
    /// Similarity in percent, `100 * ZNCC` clamped at zero.
    pub similarity: f32,
}

/// Template store and matcher consumed by ingestion and orchestration.
pub trait MatchingEngine {
    /// Registers a template built from `sources` and its foreground mask.
    ///
    /// Returns the registration index of the new template.
    fn add_template(
        &mut self,
        sources: &[ColorImage],
        class_id: &str,
        mask: &OwnedImage,
    ) -> PoseMatchResult<usize>;

    /// Returns all placements with similarity at or above `threshold`,
    /// best match first.
    fn match_sources(&self, sources: &[ColorImage], threshold: f32)
        -> PoseMatchResult<Vec<Match>>;

    /// Returns the number of registered templates.
    fn num_templates(&self) -> usize;
}

/// Configuration for the bundled detector.
#[derive(Clone, Debug)]
pub struct DetectorConfig {
    /// Maximum pyramid levels for templates and test images.
    pub pyramid_levels: usize,
    /// Peaks kept per template and scan.
    pub per_template_topk: usize,
    /// Chebyshev radius for non-maximum suppression.
    pub nms_radius: usize,
    /// Candidates carried to the next finer level per template.
    pub beam_width: usize,
    /// Search radius around an upsampled candidate.
    pub roi_radius: usize,
    /// Minimum intensity variance of an image window to be scored.
    pub min_var_i: f32,
    /// Scan templates in parallel (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            pyramid_levels: 3,
            per_template_topk: 8,
            nms_radius: 4,
            beam_width: 8,
            roi_radius: 3,
            min_var_i: 1e-3,
            parallel: false,
        }
    }
}

struct Registered {
    class_id: String,
    compiled: CompiledTemplate,
}

/// Masked ZNCC detector with coarse-to-fine search.
pub struct Detector {
    cfg: DetectorConfig,
    templates: Vec<Registered>,
}

impl Default for Detector {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}

impl Detector {
    /// Creates an empty detector.
    pub fn new(cfg: DetectorConfig) -> Self {
        Self {
            cfg,
            templates: Vec::new(),
        }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &DetectorConfig {
        &self.cfg
    }

    /// Returns the class ids in registration order.
    pub fn class_ids(&self) -> impl Iterator<Item = &str> {
        self.templates.iter().map(|t| t.class_id.as_str())
    }

    fn search_template(
        &self,
        levels: &[ImageView<'_, u8>],
        template_idx: usize,
    ) -> PoseMatchResult<Vec<Candidate>> {
        let compiled = &self.templates[template_idx].compiled;
        let Some(top) = start_level(levels, compiled) else {
            return Ok(Vec::new());
        };

        let mut cands = coarse_search_level(levels[top], compiled, template_idx, top, &self.cfg)?;
        for level in (0..top).rev() {
            cands = refine_to_finer_level(levels[level], compiled, level, &cands, &self.cfg)?;
        }
        Ok(cands)
    }

    #[cfg(feature = "rayon")]
    fn search_all(&self, levels: &[ImageView<'_, u8>]) -> PoseMatchResult<Vec<Candidate>> {
        use rayon::prelude::*;

        if !self.cfg.parallel {
            return self.search_all_seq(levels);
        }
        let results: Vec<_> = (0..self.templates.len())
            .into_par_iter()
            .map(|idx| self.search_template(levels, idx))
            .collect();
        let mut out = Vec::new();
        for result in results {
            out.extend(result?);
        }
        Ok(out)
    }

    #[cfg(not(feature = "rayon"))]
    fn search_all(&self, levels: &[ImageView<'_, u8>]) -> PoseMatchResult<Vec<Candidate>> {
        self.search_all_seq(levels)
    }

    fn search_all_seq(&self, levels: &[ImageView<'_, u8>]) -> PoseMatchResult<Vec<Candidate>> {
        let mut out = Vec::new();
        for idx in 0..self.templates.len() {
            out.extend(self.search_template(levels, idx)?);
        }
        Ok(out)
    }
}

fn single_source(sources: &[ColorImage]) -> PoseMatchResult<&ColorImage> {
    match sources {
        [source] => Ok(source),
        [] => Err(PoseMatchError::InvalidInput("no source image")),
        _ => Err(PoseMatchError::InvalidInput(
            "only a single color source is supported",
        )),
    }
}

fn similarity(score: f32) -> f32 {
    (score * 100.0).clamp(0.0, 100.0)
}

fn match_cmp_desc(a: &Match, b: &Match) -> Ordering {
    b.similarity
        .total_cmp(&a.similarity)
        .then_with(|| a.template_index.cmp(&b.template_index))
        .then_with(|| a.y.cmp(&b.y))
        .then_with(|| a.x.cmp(&b.x))
}

impl MatchingEngine for Detector {
    fn add_template(
        &mut self,
        sources: &[ColorImage],
        class_id: &str,
        mask: &OwnedImage,
    ) -> PoseMatchResult<usize> {
        let source = single_source(sources)?;
        let template = Template::new(source.to_luma(), mask.clone())?;
        let compiled = CompiledTemplate::compile(
            &template,
            &CompileConfig {
                max_levels: self.cfg.pyramid_levels,
            },
        )?;
        self.templates.push(Registered {
            class_id: class_id.to_string(),
            compiled,
        });
        Ok(self.templates.len() - 1)
    }

    fn match_sources(
        &self,
        sources: &[ColorImage],
        threshold: f32,
    ) -> PoseMatchResult<Vec<Match>> {
        if !threshold.is_finite() {
            return Err(PoseMatchError::InvalidInput("threshold must be finite"));
        }
        let source = single_source(sources)?;
        let _span = trace_span!("match", templates = self.templates.len()).entered();

        let luma = source.to_luma();
        let pyramid = ImagePyramid::build_u8(luma.view(), self.cfg.pyramid_levels)?;
        let levels: Vec<ImageView<'_, u8>> = pyramid.levels().iter().map(|l| l.view()).collect();

        let mut matches: Vec<Match> = self
            .search_all(&levels)?
            .into_iter()
            .map(|cand| Match {
                class_id: self.templates[cand.template_idx].class_id.clone(),
                template_index: cand.template_idx,
                x: cand.x,
                y: cand.y,
                similarity: similarity(cand.score),
            })
            .filter(|m| m.similarity >= threshold)
            .collect();
        matches.sort_by(match_cmp_desc);

        trace_event!("matches", count = matches.len());
        Ok(matches)
    }

    fn num_templates(&self) -> usize {
        self.templates.len()
    }
}
