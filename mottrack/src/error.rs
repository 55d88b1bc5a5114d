//! Error types for the tracking core

use thiserror::Error;

/// Result type alias for the tracking core.
pub type Result<T> = std::result::Result<T, TrackError>;

/// Errors that can occur while updating tracks.
#[derive(Error, Debug)]
pub enum TrackError {
    /// The innovation covariance of a Kalman correction was not
    /// invertible. With the fixed measurement noise this cannot happen
    /// for finite inputs, but the failure is propagated rather than
    /// unwrapped.
    #[error("innovation covariance is not invertible")]
    SingularInnovation,
}
