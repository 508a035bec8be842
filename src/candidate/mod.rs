//! Peak collection and pruning shared by the coarse and refine passes.

pub(crate) mod nms;
pub(crate) mod topk;
