//! Spatial non-maximum suppression of placement peaks.

use crate::candidate::topk::{sort_peaks_desc, Peak};
use std::collections::HashMap;

/// Suppresses peaks near a stronger peak of the same template.
///
/// Peaks are visited best first; a peak survives when its Chebyshev distance
/// to every surviving peak of the same template exceeds `radius`. Peaks of
/// different templates never suppress each other. The result is best first.
pub fn nms_2d(peaks: &mut [Peak], radius: usize) -> Vec<Peak> {
    sort_peaks_desc(peaks);
    if radius == 0 {
        return peaks.to_vec();
    }

    let mut survivors: HashMap<usize, Vec<(usize, usize)>> = HashMap::new();
    let mut kept = Vec::with_capacity(peaks.len());
    for &peak in peaks.iter() {
        let seen = survivors.entry(peak.template_idx).or_default();
        let suppressed = seen
            .iter()
            .any(|&(x, y)| peak.x.abs_diff(x).max(peak.y.abs_diff(y)) <= radius);
        if !suppressed {
            seen.push((peak.x, peak.y));
            kept.push(peak);
        }
    }
    kept
}
