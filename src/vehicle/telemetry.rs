use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A point-in-time read of the vehicle and orbit state.
///
/// Snapshots are plain values. Nothing in here refreshes itself; a component
/// that wants newer data asks the [`TelemetrySource`] again, which keeps data
/// freshness visible at every call site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    /// Universal time of the snapshot, seconds.
    pub ut: f64,
    /// Altitude above the reference datum, m.
    pub mean_altitude: f64,
    /// Altitude above local terrain, m.
    pub terrain_altitude: f64,
    /// Signed vertical speed, m/s. Positive is ascending.
    pub vertical_speed: f64,
    /// Current orbital speed, m/s.
    pub orbital_speed: f64,
    /// Apoapsis altitude above the datum, m.
    pub apoapsis: f64,
    /// Periapsis altitude above the datum, m.
    pub periapsis: f64,
    /// Sub-vehicle latitude, degrees.
    pub latitude: f64,
    /// Sub-vehicle longitude, degrees.
    pub longitude: f64,
}

impl TelemetrySnapshot {
    /// Descent rate as a positive number, m/s. Zero while ascending.
    pub fn descent_speed(&self) -> f64 { (-self.vertical_speed).max(0.0) }
}

/// Provider of fresh [`TelemetrySnapshot`] values.
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    async fn snapshot(&self) -> TelemetrySnapshot;
}
