use crate::vehicle::autopilot::ReferenceFrame;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// A fixed latitude/longitude on the orbited body's surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetPoint {
    lat_deg: f64,
    lon_deg: f64,
}

impl TargetPoint {
    pub fn new(lat_deg: f64, lon_deg: f64) -> Self { Self { lat_deg, lon_deg } }

    pub fn lat_deg(&self) -> f64 { self.lat_deg }

    pub fn lon_deg(&self) -> f64 { self.lon_deg }

    pub fn is_finite(&self) -> bool { self.lat_deg.is_finite() && self.lon_deg.is_finite() }
}

impl std::fmt::Display for TargetPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}°, {:.6}°)", self.lat_deg, self.lon_deg)
    }
}

/// The orbited body, as far as guidance needs it: a surface to aim at and the
/// frame that surface is expressed in.
pub trait BodyView: Send + Sync {
    /// Cartesian position of a surface point in `frame`, m.
    fn surface_position(&self, target: TargetPoint, frame: ReferenceFrame) -> Vector3<f64>;

    /// The body-fixed frame positions default to.
    fn reference_frame(&self) -> ReferenceFrame { ReferenceFrame::BodyFixed }
}

/// An immutable view of one orbit, valid for the lifetime of a solver call.
///
/// Implementations must be pure: two calls to [`OrbitView::position_at`] with
/// the same arguments return the same point. Callers must not hand a view to
/// the solver and mutate the underlying orbit mid-search; they get that for
/// free by only ever obtaining views as per-call snapshots.
pub trait OrbitView: Send + Sync {
    /// Orbital period, seconds. Must be finite and positive.
    fn period(&self) -> f64;

    /// Cartesian position of the orbiting vehicle at universal time `ut` in `frame`, m.
    fn position_at(&self, ut: f64, frame: ReferenceFrame) -> Vector3<f64>;

    /// The orbited body.
    fn body(&self) -> &dyn BodyView;
}
