//! Multi-object tracking core
//!
//! Maintains persistent object identities over a per-frame stream of
//! noisy detections: each track carries a constant-velocity Kalman
//! motion estimate, detections are associated to tracks under a
//! class-consistent IoU cost, and a small life-cycle state machine
//! promotes and retires tracks.
//!
//! Detection, video I/O and rendering are external collaborators; this
//! crate is pure in-memory compute and is deterministic given its
//! inputs.
//!
//! ```
//! use mottrack::{BBox, Detection, Tracker, TrackerConfig};
//!
//! let mut tracker = Tracker::new(TrackerConfig::default());
//!
//! let detections = vec![Detection::new(BBox::new(100, 100, 50, 50), 0.9, 0, "car")];
//! let confirmed = tracker.update(&detections).unwrap();
//!
//! // fresh tracks stay tentative until their hit streak builds up
//! assert!(confirmed.is_empty());
//! assert_eq!(tracker.total_tracks(), 1);
//! ```

pub mod assigner;
pub mod bbox;
pub mod detection;
pub mod error;
pub mod hungarian;
pub mod kalman;
pub mod spatial;
pub mod track;
pub mod tracker;

pub use assigner::{Assigner, AssignmentResult, AssignmentStrategy};
pub use bbox::BBox;
pub use detection::Detection;
pub use error::{Result, TrackError};
pub use kalman::MotionFilter;
pub use track::{Track, TrackState};
pub use tracker::{Tracker, TrackerConfig};
