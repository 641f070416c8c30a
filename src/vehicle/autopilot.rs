use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Attitude-hold modes the vehicle autopilot can be commanded into.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutopilotMode {
    Prograde,
    Retrograde,
    ManeuverHold,
    StabilityHold,
}

/// Reference frames the autopilot and position queries can be expressed in.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceFrame {
    /// Inertial frame aligned with the current orbit.
    Orbital,
    /// Frame following the local surface under the vehicle.
    Surface,
    /// Frame rotating with the orbited body.
    BodyFixed,
}
