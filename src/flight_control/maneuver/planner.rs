use crate::flight_control::{FlightComputer, GuidanceError};
use crate::log;
use crate::vehicle::NodeId;
use tokio::sync::RwLock;

/// A burn magnitude along the orbital velocity axis.
///
/// Sign convention, fixed here so it cannot silently invert: a **positive**
/// magnitude brakes the vehicle. The planner negates it into the prograde
/// component the vehicle API expects, so the stored node Δv for a positive
/// burn is negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurnMagnitude(f64);

impl BurnMagnitude {
    /// A braking burn of `mps` m/s. Negative values accelerate instead.
    pub fn retrograde(mps: f64) -> Self { Self(mps) }

    pub fn mps(&self) -> f64 { self.0 }

    /// The signed prograde Δv component handed to the vehicle.
    pub fn prograde_component(&self) -> f64 { -self.0 }
}

impl std::fmt::Display for BurnMagnitude {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1} m/s retrograde", self.0)
    }
}

/// A planned future burn attached to the vehicle.
#[derive(Debug, Clone, Copy)]
pub struct ManeuverNode {
    pub id: NodeId,
    /// Universal time of the scheduled burn, seconds.
    pub scheduled_ut: f64,
    /// Signed prograde Δv, m/s. Negative brakes, per [`BurnMagnitude`].
    pub delta_v: f64,
}

/// Plans a node at `scheduled_ut` for the given burn.
///
/// Removes every node currently pending first: the vehicle carries at most one
/// planned burn, and that invariant is enforced here, not assumed of callers.
pub async fn plan_node(
    f_cont: &RwLock<FlightComputer>,
    scheduled_ut: f64,
    burn: BurnMagnitude,
) -> Result<ManeuverNode, GuidanceError> {
    if !burn.mps().is_finite() {
        return Err(GuidanceError::InvalidBurn(burn.mps()));
    }
    let f_cont = f_cont.read().await;
    for stale in f_cont.pending_nodes().await {
        f_cont.remove_node(stale).await;
    }
    let delta_v = burn.prograde_component();
    let id = f_cont.add_node(scheduled_ut, delta_v).await;
    log!("Planned node {id}: {burn} at ut {scheduled_ut:.1}");
    Ok(ManeuverNode { id, scheduled_ut, delta_v })
}
