use super::ManeuverNode;
use crate::flight_control::{FlightComputer, GuidanceError};
use crate::vehicle::{AutopilotMode, ReferenceFrame};
use crate::{info, log};
use std::time::Duration;
use strum_macros::Display;
use tokio::sync::RwLock;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// How an [`execute_node`] call ended.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum BurnOutcome {
    /// Remaining Δv dropped below the cutoff and the node was deleted.
    Complete,
    /// The cancellation token fired; the throttle is cut, the node is kept.
    Cancelled,
}

/// Remaining-Δv threshold ending the burn, m/s. A fixed cutoff, not scaled to
/// the node's Δv, so small burns overshoot proportionally more.
const CUTOFF_DV: f64 = 10.0;
/// Poll interval while coasting to the ignition point.
const COAST_POLL: Duration = Duration::from_secs(1);
/// Poll interval while the engine is lit.
const BURN_POLL: Duration = Duration::from_millis(100);
/// Attitude settle time after cutoff, before the node is deleted.
const SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Burns a planned node to completion, blocking until the remaining Δv is
/// below the cutoff.
///
/// Ignition is timed from a constant-thrust burn estimate: the executor coasts
/// with the engine idle until the node is half the estimated burn time away,
/// then holds full throttle. With zero available thrust the estimate is
/// infinite and the executor never leaves the coast loop; there is no internal
/// retry or timeout, so `cancel` is the only way out of a thrust-starved call.
/// Nodes are single-use: on completion the node is deleted after a short
/// attitude settle in retrograde hold.
pub async fn execute_node(
    f_cont: &RwLock<FlightComputer>,
    node: ManeuverNode,
    cancel: &CancellationToken,
) -> Result<BurnOutcome, GuidanceError> {
    let (mass, thrust) = {
        let f_cont = f_cont.read().await;
        (f_cont.vessel_mass().await, f_cont.available_thrust().await)
    };
    let est_burn_s =
        if thrust > 0.0 { node.delta_v.abs() * mass / thrust } else { f64::INFINITY };
    let half_burn_s = est_burn_s * 0.5;
    info!("Executing node {}: {:.1} m/s, est. burn {est_burn_s:.1}s", node.id, node.delta_v);

    f_cont.write().await.engage(ReferenceFrame::Orbital, AutopilotMode::ManeuverHold).await;

    // Coast with the engine idle until ignition. An infinite estimate keeps
    // this loop idling until cancelled.
    loop {
        let eta = {
            let f_cont = f_cont.read().await;
            let eta = f_cont
                .node_eta(node.id)
                .await
                .ok_or(GuidanceError::NodeVanished(node.id))?;
            f_cont.cut_throttle().await;
            f_cont.reassert_frame().await;
            eta
        };
        if half_burn_s.is_finite() && eta <= half_burn_s {
            break;
        }
        tokio::select! {
            () = cancel.cancelled() => return Ok(BurnOutcome::Cancelled),
            () = sleep(COAST_POLL) => {}
        }
    }

    log!("Ignition for node {}", node.id);
    f_cont.read().await.set_throttle(1.0).await;

    loop {
        let remaining = {
            let f_cont = f_cont.read().await;
            match f_cont.node_remaining_dv(node.id).await {
                Some(dv) => dv,
                None => {
                    f_cont.cut_throttle().await;
                    return Err(GuidanceError::NodeVanished(node.id));
                }
            }
        };
        if remaining <= CUTOFF_DV {
            break;
        }
        tokio::select! {
            () = cancel.cancelled() => {
                f_cont.read().await.cut_throttle().await;
                return Ok(BurnOutcome::Cancelled);
            }
            () = sleep(BURN_POLL) => {}
        }
    }

    {
        let mut f_cont = f_cont.write().await;
        f_cont.cut_throttle().await;
        f_cont.engage(ReferenceFrame::Orbital, AutopilotMode::Retrograde).await;
    }
    sleep(SETTLE_DELAY).await;
    f_cont.read().await.remove_node(node.id).await;
    log!("Node {} executed and removed", node.id);
    Ok(BurnOutcome::Complete)
}
