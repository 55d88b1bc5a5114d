//! Per-frame tracking orchestrator

use std::borrow::Cow;

use crate::assigner::{Assigner, AssignmentStrategy};
use crate::detection::Detection;
use crate::error::Result;
use crate::track::{Track, TrackState};

/// Tracker tuning knobs.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Maximum allowed `1 − IoU` for an accepted match.
    pub max_iou_distance: f32,
    /// Frames without association before a track is reaped.
    pub max_age: u32,
    /// Hit streak at which a not-yet-confirmed track is surfaced.
    pub min_hits: u32,
    /// Assignment solver used for data association.
    pub strategy: AssignmentStrategy,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_iou_distance: 0.7,
            max_age: 30,
            min_hits: 3,
            strategy: AssignmentStrategy::Greedy,
        }
    }
}

/// Owns the live track set and drives it frame by frame.
///
/// A tracker instance is single-threaded; run one instance per stream.
pub struct Tracker {
    config: TrackerConfig,
    assigner: Assigner,
    tracks: Vec<Track>,
    next_id: u32,
}

impl Tracker {
    pub fn new(config: TrackerConfig) -> Self {
        let assigner = Assigner::new(config.max_iou_distance, config.strategy);
        Self {
            config,
            assigner,
            tracks: Vec::new(),
            next_id: 1,
        }
    }

    /// Advance one frame and return the surfaced tracks.
    ///
    /// Fixed order: predict all, associate, update matched, mark
    /// missed, spawn from unmatched detections, reap expired, then
    /// surface every track that is confirmed or whose streak reaches
    /// `min_hits`. Returned borrows are valid until the next call.
    pub fn update(&mut self, detections: &[Detection]) -> Result<Vec<&Track>> {
        let detections: Cow<[Detection]> = if detections.iter().all(Detection::is_valid) {
            Cow::Borrowed(detections)
        } else {
            Cow::Owned(
                detections
                    .iter()
                    .filter(|det| {
                        let valid = det.is_valid();
                        if !valid {
                            log::warn!("dropping detection with negative extent: {}", det.bbox);
                        }
                        valid
                    })
                    .cloned()
                    .collect(),
            )
        };

        for track in &mut self.tracks {
            track.predict();
        }

        let result = self.assigner.associate(&self.tracks, &detections);
        log::trace!(
            "associated {} of {} detections against {} tracks",
            result.matches.len(),
            detections.len(),
            self.tracks.len()
        );

        for &(track_idx, det_idx) in &result.matches {
            self.tracks[track_idx].update(&detections[det_idx])?;
        }

        for &track_idx in &result.unmatched_tracks {
            self.tracks[track_idx].mark_missed();
        }

        for &det_idx in &result.unmatched_detections {
            let track = Track::new(&detections[det_idx], self.next_id);
            log::debug!("spawned track {} (class {})", track.id, track.class_id);
            self.next_id += 1;
            self.tracks.push(track);
        }

        let max_age = self.config.max_age;
        self.tracks.retain(|track| {
            let keep = track.time_since_update <= max_age;
            if !keep {
                log::debug!(
                    "reaped track {} after {} unmatched frames",
                    track.id,
                    track.time_since_update
                );
            }
            keep
        });

        let min_hits = self.config.min_hits;
        Ok(self
            .tracks
            .iter()
            .filter(|track| track.state == TrackState::Confirmed || track.hit_streak >= min_hits)
            .collect())
    }

    /// All live tracks, surfaced or not.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Number of live tracks.
    pub fn num_tracks(&self) -> usize {
        self.tracks.len()
    }

    /// Number of ids issued over the tracker's lifetime.
    pub fn total_tracks(&self) -> u32 {
        self.next_id - 1
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Drop all live tracks. Ids are never reused, so the counter
    /// keeps running.
    pub fn clear(&mut self) {
        self.tracks.clear();
    }
}
