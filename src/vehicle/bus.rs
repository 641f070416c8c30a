use crate::vehicle::{
    autopilot::{AutopilotMode, ReferenceFrame},
    orbit::OrbitView,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Identifier of a maneuver node held by the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "N{}", self.0)
    }
}

/// The low-level command surface of the vehicle.
///
/// This is the boundary to the simulated-vehicle API. Guidance never talks to
/// it directly; the flight computer wraps it, enforces the throttle clamp and
/// owns the actuator while a control loop is running.
#[async_trait]
pub trait VehicleBus: Send + Sync {
    /// Commands the main engine throttle. Callers pass values in `[0, 1]`;
    /// the flight computer clamps before this is reached.
    async fn set_throttle(&self, level: f64);

    async fn set_rcs(&self, enabled: bool);

    async fn set_autopilot_mode(&self, mode: AutopilotMode);

    async fn autopilot_mode(&self) -> AutopilotMode;

    /// Sets the reference frame the autopilot holds its mode against.
    async fn set_reference_frame(&self, frame: ReferenceFrame);

    /// Current vehicle mass, kg.
    async fn vessel_mass(&self) -> f64;

    /// Maximum thrust currently available from the engaged engines, N.
    /// Zero when no engine can fire.
    async fn available_thrust(&self) -> f64;

    /// Snapshot of the current orbit.
    async fn current_orbit(&self) -> Arc<dyn OrbitView>;

    /// All maneuver nodes currently attached to the vehicle.
    async fn pending_nodes(&self) -> Vec<NodeId>;

    /// Attaches a node at universal time `ut` with the given prograde Δv
    /// component, m/s. Negative values brake the vehicle.
    async fn add_node(&self, ut: f64, prograde_dv: f64) -> NodeId;

    /// Removes a node. Removing an unknown id is a no-op.
    async fn remove_node(&self, id: NodeId);

    /// Δv left to burn on a node, m/s, or `None` if the node is gone.
    async fn node_remaining_dv(&self, id: NodeId) -> Option<f64>;

    /// Seconds until a node's scheduled time, or `None` if the node is gone.
    /// Negative once the scheduled time has passed.
    async fn node_eta(&self, id: NodeId) -> Option<f64>;

    /// The orbit that results from executing a node as planned, or `None` if
    /// the node is gone.
    async fn node_orbit(&self, id: NodeId) -> Option<Arc<dyn OrbitView>>;
}
