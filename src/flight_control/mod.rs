//! Guidance and control: the closest-approach solver, maneuver planning and
//! burn execution, the descent controller, and the [`FlightComputer`] that
//! owns the vehicle handles while any of them runs.

pub mod descent;
pub mod flight_computer;
pub mod maneuver;
pub mod orbit;
#[cfg(test)]
pub mod test_support;

pub use flight_computer::FlightComputer;

use crate::vehicle::NodeId;
use thiserror::Error;

/// Precondition violations at the guidance boundary.
///
/// Degenerate inputs are rejected here instead of leaking NaN into control
/// decisions. There is deliberately no retry-worthy variant: every control
/// decision is taken once per tick from fresh telemetry, so a bad reading
/// self-corrects on the next tick.
#[derive(Debug, Error)]
pub enum GuidanceError {
    #[error("orbital period must be finite and positive, got {0}")]
    InvalidPeriod(f64),
    #[error("solver tolerance must be finite and positive, got {0}")]
    InvalidTolerance(f64),
    #[error("coarse sample count must be at least 1")]
    NoCoarseSamples,
    #[error("target point is not finite")]
    InvalidTarget,
    #[error("non-finite distance sample at ut {0}")]
    NonFiniteSample(f64),
    #[error("burn magnitude must be finite, got {0}")]
    InvalidBurn(f64),
    #[error("maneuver node {0} vanished while in use")]
    NodeVanished(NodeId),
}
