//! Constant-velocity Kalman filter over bounding-box centre and size

use nalgebra::{Matrix4, SMatrix, SVector, Vector4};

use crate::bbox::BBox;
use crate::error::{Result, TrackError};

/// State: `[cx, cy, w, h, vcx, vcy, vw, vh]`.
type State = SVector<f32, 8>;
type StateCov = SMatrix<f32, 8, 8>;
/// Measurement: `[cx, cy, w, h]`.
type Measurement = Vector4<f32>;

/// Per-track linear motion filter.
///
/// `predict` advances the state estimate one frame and is *not* a pure
/// query; use [`MotionFilter::bbox`] to observe the current estimate
/// without advancing it.
#[derive(Debug, Clone)]
pub struct MotionFilter {
    x: State,
    p: StateCov,
    f: StateCov,
    h: SMatrix<f32, 4, 8>,
    q: StateCov,
    r: Matrix4<f32>,
    initialized: bool,
}

impl MotionFilter {
    pub fn new() -> Self {
        // position += velocity per tick
        let mut f = StateCov::identity();
        for i in 0..4 {
            f[(i, i + 4)] = 1.0;
        }

        // measurement observes the first four state entries
        let mut h = SMatrix::<f32, 4, 8>::zeros();
        for i in 0..4 {
            h[(i, i)] = 1.0;
        }

        Self {
            x: State::zeros(),
            p: StateCov::identity(),
            f,
            h,
            q: StateCov::identity() * 1e-2,
            r: Matrix4::identity() * 1e-1,
            initialized: false,
        }
    }

    /// Seed the state from a measured box, with zero velocities.
    pub fn init(&mut self, bbox: BBox) {
        self.x = State::zeros();
        self.x[0] = bbox.x as f32 + bbox.w as f32 / 2.0;
        self.x[1] = bbox.y as f32 + bbox.h as f32 / 2.0;
        self.x[2] = bbox.w as f32;
        self.x[3] = bbox.h as f32;
        self.initialized = true;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Advance the estimate one frame and return the predicted box.
    ///
    /// An uninitialised filter returns the empty box and does not
    /// advance.
    pub fn predict(&mut self) -> BBox {
        if !self.initialized {
            return BBox::default();
        }

        // size velocity must not drive the size negative
        if self.x[2] + self.x[6] <= 0.0 {
            self.x[6] = 0.0;
        }
        if self.x[3] + self.x[7] <= 0.0 {
            self.x[7] = 0.0;
        }

        self.x = self.f * self.x;
        self.p = self.f * self.p * self.f.transpose() + self.q;

        self.bbox()
    }

    /// Fold a measured box into the estimate.
    ///
    /// The first update on an uninitialised filter seeds the state
    /// instead of running a correction.
    pub fn update(&mut self, bbox: BBox) -> Result<()> {
        if !self.initialized {
            self.init(bbox);
            return Ok(());
        }

        let z = Measurement::new(
            bbox.x as f32 + bbox.w as f32 / 2.0,
            bbox.y as f32 + bbox.h as f32 / 2.0,
            bbox.w as f32,
            bbox.h as f32,
        );

        let y = z - self.h * self.x;
        let s = self.h * self.p * self.h.transpose() + self.r;
        let s_inv = s.try_inverse().ok_or(TrackError::SingularInnovation)?;
        let k = self.p * self.h.transpose() * s_inv;

        self.x += k * y;
        self.p = (StateCov::identity() - k * self.h) * self.p;

        // posterior size stays strictly positive
        self.x[2] = self.x[2].max(1.0);
        self.x[3] = self.x[3].max(1.0);

        Ok(())
    }

    /// Current posterior estimate projected to a box, without advancing
    /// the filter. Empty until initialised.
    pub fn bbox(&self) -> BBox {
        if !self.initialized {
            return BBox::default();
        }

        let (cx, cy, w, h) = (self.x[0], self.x[1], self.x[2], self.x[3]);
        BBox::new(
            (cx - w / 2.0) as i32,
            (cy - h / 2.0) as i32,
            w as i32,
            h as i32,
        )
    }
}

impl Default for MotionFilter {
    fn default() -> Self {
        Self::new()
    }
}
