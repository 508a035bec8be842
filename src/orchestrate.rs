//! Detection of ingested templates in test images.
//!
//! For each test image the engine's best-ranked match is taken as the
//! detection, its class id is resolved back to the template record, and the
//! template's pose is read from disk. No re-ranking or extra score filtering
//! happens here; the engine threshold is the only acceptance test.

use crate::image::ColorImage;
use crate::ingest::{TemplateId, TemplateRecord, TemplateStore};
use crate::pose::{load_pose, Pose};
use crate::search::MatchingEngine;
use crate::trace::{trace_event, trace_span};
use crate::util::{PoseMatchError, PoseMatchResult};
#[cfg(feature = "image-io")]
use std::path::Path;

/// Default acceptance threshold in percent similarity.
pub const DEFAULT_THRESHOLD: f32 = 50.0;

/// Best detection in a test image.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub template_id: TemplateId,
    /// Column of the matched template's top-left corner.
    pub x: usize,
    /// Row of the matched template's top-left corner.
    pub y: usize,
    pub similarity: f32,
    /// Number of matches the engine accepted for this image.
    pub match_count: usize,
    /// Pose stored with the matched template.
    pub pose: Pose,
}

/// Runs the registered templates against test images.
pub struct MatchOrchestrator<E> {
    engine: E,
    store: TemplateStore,
    threshold: f32,
}

impl<E: MatchingEngine> MatchOrchestrator<E> {
    /// Pairs a populated engine with the store produced by ingestion.
    pub fn new(engine: E, store: TemplateStore) -> Self {
        Self {
            engine,
            store,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    /// Sets the similarity threshold forwarded to the engine.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = threshold;
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    /// Returns the record a detection refers to.
    pub fn record(&self, detection: &Detection) -> PoseMatchResult<&TemplateRecord> {
        self.store
            .get(detection.template_id)
            .ok_or_else(|| PoseMatchError::TemplateNotFound(detection.template_id.class_id()))
    }

    /// Detects the best matching template in an already loaded image.
    pub fn detect_image(&self, image: &ColorImage) -> PoseMatchResult<Detection> {
        let _span = trace_span!("detect", threshold = self.threshold).entered();

        let matches = self
            .engine
            .match_sources(std::slice::from_ref(image), self.threshold)?;
        let best = matches.first().ok_or(PoseMatchError::NoMatchFound {
            threshold: self.threshold,
        })?;
        let record = self.store.resolve(&best.class_id)?;
        let pose = load_pose(&record.pose_path)?;

        trace_event!(
            "detection",
            template = record.id.0,
            x = best.x,
            y = best.y,
            similarity = best.similarity,
            matches = matches.len()
        );
        Ok(Detection {
            template_id: record.id,
            x: best.x,
            y: best.y,
            similarity: best.similarity,
            match_count: matches.len(),
            pose,
        })
    }

    /// Loads a test image and detects the best matching template in it.
    #[cfg(feature = "image-io")]
    pub fn detect_path(&self, path: &Path) -> PoseMatchResult<Detection> {
        let image = load_test_image(path)?;
        self.detect_image(&image)
    }
}

/// Loads a test image; failure is reported as [`PoseMatchError::TestImageLoad`].
#[cfg(feature = "image-io")]
pub fn load_test_image(path: &Path) -> PoseMatchResult<ColorImage> {
    crate::image::io::load_color_image(path).map_err(|err| {
        let reason = match err {
            PoseMatchError::ImageIo { reason, .. } => reason,
            other => other.to_string(),
        };
        PoseMatchError::TestImageLoad {
            path: path.display().to_string(),
            reason,
        }
    })
}
