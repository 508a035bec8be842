//! Template set ingestion.
//!
//! A template set is a directory of `template%04d.png` images, each with a
//! `template%04d_pose.txt` pose file. Indices start at zero and must be
//! contiguous: the first index whose image cannot be loaded ends the set.
//! Each image is autocropped, padded by a small background margin, masked
//! by its chroma key, and registered with a [`MatchingEngine`].

use crate::chroma::{foreground_mask, ChromaKey};
use crate::crop::autocrop;
use crate::image::{ColorImage, OwnedImage, Rect};
use crate::search::MatchingEngine;
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::{PoseMatchError, PoseMatchResult};
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Sequence number of a template inside its set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TemplateId(pub u32);

impl TemplateId {
    /// Returns the engine class id, the zero-padded sequence number.
    pub fn class_id(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

impl FromStr for TemplateId {
    type Err = PoseMatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PoseMatchError::InvalidTemplateId(s.to_string()));
        }
        s.parse()
            .map(TemplateId)
            .map_err(|_| PoseMatchError::InvalidTemplateId(s.to_string()))
    }
}

/// Path of the template image with sequence number `id`.
pub fn template_image_path(root: &Path, id: TemplateId) -> PathBuf {
    root.join(format!("template{id}.png"))
}

/// Path of the pose file belonging to template `id`.
pub fn template_pose_path(root: &Path, id: TemplateId) -> PathBuf {
    root.join(format!("template{id}_pose.txt"))
}

/// Settings for turning raw template renders into engine templates.
#[derive(Clone, Debug, PartialEq)]
pub struct IngestConfig {
    /// Background colour range excluded from the mask.
    pub chroma_key: ChromaKey,
    /// Pixels of background kept around the autocrop window on every side.
    pub crop_margin: i32,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            chroma_key: ChromaKey::default(),
            crop_margin: 2,
        }
    }
}

/// A cropped template together with its mask and crop window.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedTemplate {
    /// Padded crop window in source image coordinates.
    pub window: Rect,
    /// Source pixels inside `window`.
    pub cropped: ColorImage,
    /// Foreground mask of `cropped`.
    pub mask: OwnedImage,
}

/// Autocrops, pads, crops and masks one template render.
///
/// The padded window is not clamped, so renders need at least `crop_margin`
/// pixels of background around their content.
pub fn prepare_template(image: &ColorImage, cfg: &IngestConfig) -> PoseMatchResult<PreparedTemplate> {
    let window = autocrop(image)?.padded(cfg.crop_margin);
    let cropped = image.crop(&window)?;
    let mask = foreground_mask(&cropped, &cfg.chroma_key)?;
    Ok(PreparedTemplate {
        window,
        cropped,
        mask,
    })
}

/// Everything known about one registered template.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateRecord {
    pub id: TemplateId,
    /// Uncropped render as loaded from disk.
    pub original: ColorImage,
    pub cropped: ColorImage,
    pub mask: OwnedImage,
    /// Padded crop window in `original` coordinates.
    pub window: Rect,
    pub pose_path: PathBuf,
    /// Index returned by the engine at registration.
    pub engine_index: usize,
}

/// Ingested templates ordered by sequence number.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TemplateStore {
    records: BTreeMap<TemplateId, TemplateRecord>,
}

impl TemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: TemplateRecord) -> Option<TemplateRecord> {
        self.records.insert(record.id, record)
    }

    pub fn get(&self, id: TemplateId) -> Option<&TemplateRecord> {
        self.records.get(&id)
    }

    /// Resolves an engine class id back to its record.
    pub fn resolve(&self, class_id: &str) -> PoseMatchResult<&TemplateRecord> {
        let id: TemplateId = class_id.parse()?;
        self.get(id)
            .ok_or_else(|| PoseMatchError::TemplateNotFound(class_id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> btree_map::Values<'_, TemplateId, TemplateRecord> {
        self.records.values()
    }
}

/// Ingests a template set, loading images with `load`.
///
/// Ingestion stops at the first index for which `load` fails or returns an
/// empty image. Any failure after a successful load (cropping, masking,
/// registration) is returned as an error.
pub fn ingest_with_loader<E, L>(
    root: &Path,
    engine: &mut E,
    cfg: &IngestConfig,
    mut load: L,
) -> PoseMatchResult<TemplateStore>
where
    E: MatchingEngine + ?Sized,
    L: FnMut(&Path) -> PoseMatchResult<ColorImage>,
{
    let _span = trace_span!("ingest", root = %root.display()).entered();

    let mut store = TemplateStore::new();
    for index in 0u32.. {
        let id = TemplateId(index);
        let path = template_image_path(root, id);
        let original = match load(&path) {
            Ok(img) if !img.is_empty() => img,
            Ok(_) => break,
            Err(err) => {
                if path.exists() {
                    trace_warn!(
                        "template_unreadable",
                        format!("{err}; ending template sequence at {id}")
                    );
                }
                break;
            }
        };

        let prepared = prepare_template(&original, cfg)?;
        let engine_index = engine.add_template(
            std::slice::from_ref(&prepared.cropped),
            &id.class_id(),
            &prepared.mask,
        )?;
        trace_event!(
            "template_registered",
            id = index,
            width = prepared.cropped.width(),
            height = prepared.cropped.height()
        );

        store.insert(TemplateRecord {
            id,
            original,
            cropped: prepared.cropped,
            mask: prepared.mask,
            window: prepared.window,
            pose_path: template_pose_path(root, id),
            engine_index,
        });
    }

    Ok(store)
}

/// Ingests a template set from disk.
#[cfg(feature = "image-io")]
pub fn ingest_templates<E>(
    root: &Path,
    engine: &mut E,
    cfg: &IngestConfig,
) -> PoseMatchResult<TemplateStore>
where
    E: MatchingEngine + ?Sized,
{
    ingest_with_loader(root, engine, cfg, |path: &Path| {
        crate::image::io::load_color_image(path)
    })
}

#[cfg(test)]
mod tests {
    use super::{template_image_path, template_pose_path, TemplateId};
    use crate::util::PoseMatchError;
    use std::path::Path;

    #[test]
    fn ids_format_and_parse_zero_padded() {
        assert_eq!(TemplateId(7).class_id(), "0007");
        assert_eq!(TemplateId(12345).to_string(), "12345");
        assert_eq!("0042".parse::<TemplateId>().unwrap(), TemplateId(42));
        assert_eq!(
            "+1".parse::<TemplateId>().err().unwrap(),
            PoseMatchError::InvalidTemplateId("+1".to_string())
        );
        assert!("".parse::<TemplateId>().is_err());
        assert!("99999999999".parse::<TemplateId>().is_err());
    }

    #[test]
    fn file_names_follow_sequence_convention() {
        let root = Path::new("/data/set");
        assert_eq!(
            template_image_path(root, TemplateId(3)),
            Path::new("/data/set/template0003.png")
        );
        assert_eq!(
            template_pose_path(root, TemplateId(3)),
            Path::new("/data/set/template0003_pose.txt")
        );
    }
}
