//! Spatial grid for pruning IoU candidate pairs

use std::collections::HashMap;

use crate::bbox::BBox;

/// Uniform hash grid over pixel space.
///
/// Two boxes that overlap always share at least one cell, so a grid
/// query never misses a pair with non-zero IoU; it only skips pairs
/// that cannot intersect.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell: i32,
    buckets: HashMap<(i32, i32), Vec<usize>>,
}

impl SpatialGrid {
    /// `cell` is the edge length of a grid cell in pixels, roughly the
    /// size of a typical object.
    pub fn new(cell: i32) -> Self {
        debug_assert!(cell > 0);
        Self {
            cell,
            buckets: HashMap::new(),
        }
    }

    fn cell_span(&self, lo: i32, hi: i32) -> std::ops::RangeInclusive<i32> {
        lo.div_euclid(self.cell)..=hi.div_euclid(self.cell)
    }

    /// Register a box under `idx` in every cell it touches.
    pub fn insert(&mut self, bbox: &BBox, idx: usize) {
        for cx in self.cell_span(bbox.x, bbox.right()) {
            for cy in self.cell_span(bbox.y, bbox.bottom()) {
                self.buckets.entry((cx, cy)).or_default().push(idx);
            }
        }
    }

    /// Indices of boxes that might overlap `bbox`, sorted and deduplicated.
    pub fn query(&self, bbox: &BBox) -> Vec<usize> {
        let mut candidates = Vec::new();
        for cx in self.cell_span(bbox.x, bbox.right()) {
            for cy in self.cell_span(bbox.y, bbox.bottom()) {
                if let Some(ids) = self.buckets.get(&(cx, cy)) {
                    candidates.extend_from_slice(ids);
                }
            }
        }

        candidates.sort_unstable();
        candidates.dedup();
        candidates
    }
}
