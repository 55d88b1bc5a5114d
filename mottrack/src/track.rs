//! A single tracked object: identity, motion estimate, life-cycle

use std::collections::VecDeque;

use crate::bbox::BBox;
use crate::detection::Detection;
use crate::error::Result;
use crate::kalman::MotionFilter;

/// Maximum number of centre points kept per trajectory.
pub const MAX_TRAJECTORY_LEN: usize = 30;

/// Consecutive hits at which a tentative track becomes confirmed.
const CONFIRM_STREAK: u32 = 3;

/// Life-cycle state gating whether a track is surfaced.
///
/// Expired tracks are removed from the collection outright, so there is
/// no separate deleted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    Tentative,
    Confirmed,
}

/// One hypothesised object identity.
///
/// Identity (`id`, `class_id`, `class_name`) is fixed at creation; the
/// tracker owns the track and drives all mutation.
#[derive(Debug, Clone)]
pub struct Track {
    pub id: u32,
    pub class_id: u32,
    pub class_name: String,
    pub state: TrackState,
    /// Consecutive frames with a matched detection; the spawning
    /// detection counts as the first.
    pub hit_streak: u32,
    /// Total frames with a matched detection.
    pub hits: u32,
    /// Frames since the last match; 0 on the frame of a match.
    pub time_since_update: u32,
    /// Frames since creation.
    pub age: u32,
    /// Confidence of the most recently matched detection.
    pub confidence: f32,
    filter: MotionFilter,
    trajectory: VecDeque<(i32, i32)>,
}

impl Track {
    pub fn new(det: &Detection, id: u32) -> Self {
        let mut filter = MotionFilter::new();
        filter.init(det.bbox);

        let mut trajectory = VecDeque::with_capacity(MAX_TRAJECTORY_LEN);
        trajectory.push_back(det.bbox.center());

        Self {
            id,
            class_id: det.class_id,
            class_name: det.class_name.clone(),
            state: TrackState::Tentative,
            hit_streak: 1,
            hits: 1,
            time_since_update: 0,
            age: 0,
            confidence: det.confidence,
            filter,
            trajectory,
        }
    }

    /// Advance the motion estimate one frame.
    pub fn predict(&mut self) -> BBox {
        let predicted = self.filter.predict();
        self.age += 1;
        self.time_since_update += 1;
        predicted
    }

    /// Fold a matched detection into the track.
    pub fn update(&mut self, det: &Detection) -> Result<()> {
        self.filter.update(det.bbox)?;
        self.time_since_update = 0;
        self.hit_streak += 1;
        self.hits += 1;
        self.confidence = det.confidence;

        self.trajectory.push_back(det.bbox.center());
        if self.trajectory.len() > MAX_TRAJECTORY_LEN {
            self.trajectory.pop_front();
        }

        if self.state == TrackState::Tentative && self.hit_streak >= CONFIRM_STREAK {
            self.state = TrackState::Confirmed;
        }

        Ok(())
    }

    /// The frame passed without a matching detection.
    ///
    /// `predict` already advanced `time_since_update` this frame; only
    /// the streak resets. Confirmed tracks are not demoted.
    pub fn mark_missed(&mut self) {
        self.hit_streak = 0;
    }

    /// Last predicted location, without advancing the filter.
    pub fn predicted_bbox(&self) -> BBox {
        self.filter.bbox()
    }

    /// Current location estimate; same projection as [`Track::predicted_bbox`].
    pub fn current_bbox(&self) -> BBox {
        self.filter.bbox()
    }

    pub fn is_confirmed(&self) -> bool {
        self.state == TrackState::Confirmed
    }

    /// Centre points of matched detections, oldest first.
    pub fn trajectory(&self) -> impl ExactSizeIterator<Item = (i32, i32)> + '_ {
        self.trajectory.iter().copied()
    }
}
