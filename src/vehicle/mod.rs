//! The boundary to the simulated-vehicle API: telemetry snapshots, the
//! low-level command surface, the simulation clock and orbit views, plus the
//! bundled [`sim::SimVessel`] backing the binary.

pub mod autopilot;
pub mod bus;
pub mod clock;
pub mod orbit;
pub mod sim;
pub mod telemetry;

pub use autopilot::{AutopilotMode, ReferenceFrame};
pub use bus::{NodeId, VehicleBus};
pub use clock::TimeSource;
pub use orbit::{BodyView, OrbitView, TargetPoint};
pub use telemetry::{TelemetrySnapshot, TelemetrySource};
