//! PoseMatch detects rendered object templates in images and recovers the
//! pose each template was rendered with.
//!
//! Template renders are autocropped to their content, masked by a chroma
//! key, and registered with a matching engine. Test images are then matched
//! against all templates and the best match is resolved back to the pose
//! file stored next to its template. The bundled engine scores masked ZNCC
//! coarse-to-fine, with optional parallelism via the `rayon` feature.

pub mod annotate;
pub mod bank;
mod candidate;
pub mod chroma;
pub mod crop;
pub mod image;
pub mod ingest;
pub mod kernel;
pub mod orchestrate;
pub mod pose;
pub mod search;
pub mod template;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use image::io;
pub use image::pyramid::ImagePyramid;
pub use image::{ColorImage, ImageView, OwnedImage, Rect};

pub use chroma::{foreground_mask, ChromaKey};
pub use crop::{autocrop, is_border_strip, EDGE_SAMPLE_INSET};
#[cfg(feature = "image-io")]
pub use ingest::ingest_templates;
pub use ingest::{
    ingest_with_loader, prepare_template, template_image_path, template_pose_path, IngestConfig,
    PreparedTemplate, TemplateId, TemplateRecord, TemplateStore,
};
#[cfg(feature = "image-io")]
pub use orchestrate::load_test_image;
pub use orchestrate::{Detection, MatchOrchestrator, DEFAULT_THRESHOLD};
pub use pose::{load_pose, Pose};
pub use search::{Detector, DetectorConfig, Match, MatchingEngine};
pub use util::{PoseMatchError, PoseMatchResult};

pub use candidate::nms::nms_2d;
pub use candidate::topk::{Peak, TopK};
