//! Bounded best-first collection of placement peaks.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Scored placement of one registered template.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    /// Column of the template's top-left corner.
    pub x: usize,
    /// Row of the template's top-left corner.
    pub y: usize,
    /// Masked ZNCC score.
    pub score: f32,
    /// Registration index of the template that produced the peak.
    pub template_idx: usize,
}

/// Best-first order: higher score, then lower template index, row, column.
fn rank(a: &Peak, b: &Peak) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.template_idx.cmp(&b.template_idx))
        .then_with(|| a.y.cmp(&b.y))
        .then_with(|| a.x.cmp(&b.x))
}

pub(crate) fn sort_peaks_desc(peaks: &mut [Peak]) {
    peaks.sort_by(rank);
}

/// Heap entry whose maximum is the worst-ranked peak.
struct Worst(Peak);

impl PartialEq for Worst {
    fn eq(&self, other: &Self) -> bool {
        rank(&self.0, &other.0).is_eq()
    }
}

impl Eq for Worst {}

impl PartialOrd for Worst {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Worst {
    fn cmp(&self, other: &Self) -> Ordering {
        rank(&self.0, &other.0)
    }
}

/// Keeps the `k` best peaks pushed into it.
///
/// Ties are broken deterministically, so the retained set does not depend on
/// push order.
pub struct TopK {
    k: usize,
    heap: BinaryHeap<Worst>,
}

impl TopK {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            heap: BinaryHeap::with_capacity(k.saturating_add(1)),
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Offers a peak; once full, it replaces the current worst if it ranks higher.
    pub fn push(&mut self, peak: Peak) {
        if self.k == 0 {
            return;
        }
        if self.heap.len() < self.k {
            self.heap.push(Worst(peak));
            return;
        }
        if let Some(mut worst) = self.heap.peek_mut() {
            if rank(&peak, &worst.0).is_lt() {
                *worst = Worst(peak);
            }
        }
    }

    /// Returns the retained peaks, best first.
    pub fn into_sorted_desc(self) -> Vec<Peak> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|Worst(peak)| peak)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{Peak, TopK};

    fn peak(x: usize, score: f32) -> Peak {
        Peak {
            x,
            y: 0,
            score,
            template_idx: 0,
        }
    }

    #[test]
    fn keeps_best_scores_in_order() {
        let mut topk = TopK::new(3);
        for (x, score) in [(0, 0.1), (1, 0.9), (2, 0.5), (3, 0.7), (4, 0.2)] {
            topk.push(peak(x, score));
        }
        assert_eq!(topk.len(), 3);
        let xs: Vec<usize> = topk.into_sorted_desc().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![1, 3, 2]);
    }

    #[test]
    fn ties_prefer_earlier_placements() {
        let mut topk = TopK::new(1);
        topk.push(peak(5, 0.5));
        topk.push(peak(2, 0.5));
        topk.push(peak(7, 0.5));
        assert_eq!(topk.into_sorted_desc()[0].x, 2);
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut topk = TopK::new(0);
        topk.push(peak(0, 1.0));
        assert!(topk.is_empty());
    }
}
