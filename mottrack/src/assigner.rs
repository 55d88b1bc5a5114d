//! Class-aware cost-matrix construction and gated assignment

use ndarray::Array2;

use crate::bbox;
use crate::detection::Detection;
use crate::hungarian::HungarianSolver;
use crate::spatial::SpatialGrid;
use crate::track::Track;

/// Grid cell edge used when pruning IoU candidates, in pixels.
const GRID_CELL: i32 = 128;

/// Solver used for the frame's assignment problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssignmentStrategy {
    /// Row/column reduction followed by greedy zero assignment.
    #[default]
    Greedy,
    /// Optimal Kuhn-Munkres assignment.
    KuhnMunkres,
}

/// Disjoint outcome sets of one frame's association step.
#[derive(Debug, Clone, Default)]
pub struct AssignmentResult {
    /// Accepted `(track_idx, detection_idx)` pairs.
    pub matches: Vec<(usize, usize)>,
    pub unmatched_tracks: Vec<usize>,
    pub unmatched_detections: Vec<usize>,
}

/// Associates detections to tracks under a class-consistent IoU cost.
#[derive(Debug, Clone)]
pub struct Assigner {
    max_iou_distance: f32,
    strategy: AssignmentStrategy,
}

impl Assigner {
    pub fn new(max_iou_distance: f32, strategy: AssignmentStrategy) -> Self {
        Self {
            max_iou_distance,
            strategy,
        }
    }

    /// Match each track's predicted box against the frame's detections.
    ///
    /// An assigned pair is accepted only if its cost stays below
    /// `max_iou_distance`; rejected pairs leave both sides unmatched.
    pub fn associate(&self, tracks: &[Track], detections: &[Detection]) -> AssignmentResult {
        if tracks.is_empty() || detections.is_empty() {
            return AssignmentResult {
                matches: Vec::new(),
                unmatched_tracks: (0..tracks.len()).collect(),
                unmatched_detections: (0..detections.len()).collect(),
            };
        }

        let cost = cost_matrix(tracks, detections);
        let assignment = match self.strategy {
            AssignmentStrategy::Greedy => HungarianSolver::solve(cost.view()),
            AssignmentStrategy::KuhnMunkres => HungarianSolver::solve_optimal(cost.view()),
        };

        let mut result = AssignmentResult::default();
        let mut detection_matched = vec![false; detections.len()];

        for (i, assigned) in assignment.iter().enumerate() {
            match *assigned {
                Some(j) if cost[[i, j]] < self.max_iou_distance => {
                    result.matches.push((i, j));
                    detection_matched[j] = true;
                }
                _ => result.unmatched_tracks.push(i),
            }
        }

        result.unmatched_detections = detection_matched
            .iter()
            .enumerate()
            .filter(|(_, matched)| !**matched)
            .map(|(j, _)| j)
            .collect();

        result
    }
}

/// Cost matrix over `tracks × detections`: `1 − IoU` of the track's
/// predicted box, pinned to the maximum cost 1.0 on class mismatch.
///
/// Pairs pruned by the spatial grid have IoU 0, so leaving them at the
/// 1.0 fill value is exact, not an approximation.
pub(crate) fn cost_matrix(tracks: &[Track], detections: &[Detection]) -> Array2<f32> {
    let mut grid = SpatialGrid::new(GRID_CELL);
    for (j, det) in detections.iter().enumerate() {
        grid.insert(&det.bbox, j);
    }

    let mut cost = Array2::from_elem((tracks.len(), detections.len()), 1.0f32);
    for (i, track) in tracks.iter().enumerate() {
        let predicted = track.predicted_bbox();
        for j in grid.query(&predicted) {
            if track.class_id != detections[j].class_id {
                continue;
            }
            cost[[i, j]] = (1.0 - bbox::iou(&predicted, &detections[j].bbox)).clamp(0.0, 1.0);
        }
    }
    cost
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbox::BBox;
    use approx::assert_abs_diff_eq;

    fn track_at(x: i32, y: i32, class_id: u32, id: u32) -> Track {
        Track::new(
            &Detection::new(BBox::new(x, y, 50, 50), 0.9, class_id, ""),
            id,
        )
    }

    fn det_at(x: i32, y: i32, class_id: u32) -> Detection {
        Detection::new(BBox::new(x, y, 50, 50), 0.9, class_id, "")
    }

    #[test]
    fn test_cost_matrix_values() {
        let tracks = vec![track_at(0, 0, 0, 1), track_at(200, 200, 1, 2)];
        let detections = vec![det_at(0, 0, 0), det_at(200, 200, 0)];

        let cost = cost_matrix(&tracks, &detections);
        assert_abs_diff_eq!(cost[[0, 0]], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(cost[[0, 1]], 1.0, epsilon = 1e-6);
        // overlapping but wrong class: pinned to the maximum cost
        assert_abs_diff_eq!(cost[[1, 1]], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_empty_tracks_leaves_all_detections_unmatched() {
        let assigner = Assigner::new(0.7, AssignmentStrategy::Greedy);
        let result = assigner.associate(&[], &[det_at(0, 0, 0), det_at(10, 10, 0)]);
        assert!(result.matches.is_empty());
        assert!(result.unmatched_tracks.is_empty());
        assert_eq!(result.unmatched_detections, vec![0, 1]);
    }

    #[test]
    fn test_empty_detections_leaves_all_tracks_unmatched() {
        let assigner = Assigner::new(0.7, AssignmentStrategy::Greedy);
        let tracks = vec![track_at(0, 0, 0, 1), track_at(100, 0, 0, 2)];
        let result = assigner.associate(&tracks, &[]);
        assert!(result.matches.is_empty());
        assert_eq!(result.unmatched_tracks, vec![0, 1]);
        assert!(result.unmatched_detections.is_empty());
    }

    #[test]
    fn test_class_mismatch_is_gated_out() {
        let assigner = Assigner::new(0.7, AssignmentStrategy::Greedy);
        let tracks = vec![track_at(100, 100, 0, 1)];
        let detections = vec![det_at(100, 100, 1)];

        let result = assigner.associate(&tracks, &detections);
        assert!(result.matches.is_empty());
        assert_eq!(result.unmatched_tracks, vec![0]);
        assert_eq!(result.unmatched_detections, vec![0]);
    }

    #[test]
    fn test_weak_overlap_is_gated_out() {
        // IoU just over the 0.3 floor passes, far less does not
        let assigner = Assigner::new(0.7, AssignmentStrategy::Greedy);
        let tracks = vec![track_at(0, 0, 0, 1)];

        let near = assigner.associate(&tracks, &[det_at(10, 0, 0)]);
        assert_eq!(near.matches, vec![(0, 0)]);

        let far = assigner.associate(&tracks, &[det_at(45, 0, 0)]);
        assert!(far.matches.is_empty());
        assert_eq!(far.unmatched_tracks, vec![0]);
        assert_eq!(far.unmatched_detections, vec![0]);
    }

    #[test]
    fn test_crossing_preference_keeps_identities() {
        let tracks = vec![track_at(100, 100, 0, 1), track_at(100, 120, 0, 2)];
        let detections = vec![det_at(102, 100, 0), det_at(98, 120, 0)];

        for strategy in [AssignmentStrategy::Greedy, AssignmentStrategy::KuhnMunkres] {
            let assigner = Assigner::new(0.7, strategy);
            let mut matches = assigner.associate(&tracks, &detections).matches;
            matches.sort_unstable();
            assert_eq!(matches, vec![(0, 0), (1, 1)], "strategy {strategy:?}");
        }
    }

    #[test]
    fn test_strategies_agree_on_gated_matches() {
        let tracks = vec![
            track_at(0, 0, 0, 1),
            track_at(300, 0, 0, 2),
            track_at(600, 0, 1, 3),
        ];
        let detections = vec![
            det_at(604, 0, 1),
            det_at(4, 0, 0),
            det_at(296, 0, 0),
            det_at(900, 0, 2),
        ];

        let greedy = Assigner::new(0.7, AssignmentStrategy::Greedy)
            .associate(&tracks, &detections);
        let optimal = Assigner::new(0.7, AssignmentStrategy::KuhnMunkres)
            .associate(&tracks, &detections);

        let sorted = |mut m: Vec<(usize, usize)>| {
            m.sort_unstable();
            m
        };
        assert_eq!(sorted(greedy.matches), sorted(optimal.matches));
        assert_eq!(greedy.unmatched_detections, vec![3]);
    }
}
