use crate::config::GuidanceConfig;
use crate::console::{StatusSink, StatusUpdate};
use crate::flight_control::maneuver::{BurnMagnitude, BurnOutcome, execute_node, plan_node};
use crate::flight_control::orbit::{SolverParams, chord_distance_at, find_closest_approach};
use crate::flight_control::{FlightComputer, GuidanceError};
use crate::mission::PhaseOutcome;
use crate::vehicle::TargetPoint;
use crate::{info, log};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

/// De-orbit sequence: warp to the closest pass over the landing site, then
/// burn retrograde with a Δv scaled from the remaining chord distance.
pub struct DeOrbitPhase {
    f_cont: Arc<RwLock<FlightComputer>>,
    sink: Arc<dyn StatusSink>,
    target: TargetPoint,
    solver: SolverParams,
    dv_divisor: f64,
    lead_time_s: f64,
}

impl DeOrbitPhase {
    const PHASE_NAME: &'static str = "DeOrbitPhase";

    pub fn new(
        f_cont: Arc<RwLock<FlightComputer>>,
        cfg: &GuidanceConfig,
        sink: Arc<dyn StatusSink>,
    ) -> Self {
        Self {
            f_cont,
            sink,
            target: cfg.target,
            solver: SolverParams {
                coarse_samples: cfg.coarse_samples,
                tolerance_s: cfg.solver_tolerance_s,
            },
            dv_divisor: cfg.deorbit_dv_divisor,
            lead_time_s: cfg.deorbit_lead_time_s,
        }
    }

    pub async fn run(&self, cancel: &CancellationToken) -> Result<PhaseOutcome, GuidanceError> {
        self.sink.report(StatusUpdate::PhaseStarted { name: Self::PHASE_NAME });
        let (orbit, now) = {
            let f_cont = self.f_cont.read().await;
            (f_cont.current_orbit().await, f_cont.ut_now().await)
        };
        let pass = find_closest_approach(&*orbit, self.target, now, &self.solver)?;
        self.sink.report(StatusUpdate::ApproachSolved {
            target: self.target,
            distance: pass.distance,
            time_from_now: pass.time_from_now,
        });
        info!("Closest pass to {} at ut {:.2}", self.target, pass.ut);

        self.f_cont.read().await.warp_to(pass.ut).await;
        let now = self.f_cont.read().await.ut_now().await;
        let distance = chord_distance_at(&*orbit, self.target, now);
        log!("Current distance to target: {distance:.2} m");

        let burn = BurnMagnitude::retrograde(distance / self.dv_divisor);
        let node = plan_node(&self.f_cont, now + self.lead_time_s, burn).await?;
        let outcome = match execute_node(&self.f_cont, node, cancel).await? {
            BurnOutcome::Complete => PhaseOutcome::Complete,
            BurnOutcome::Cancelled => PhaseOutcome::Cancelled,
        };
        self.sink.report(StatusUpdate::PhaseEnded {
            name: Self::PHASE_NAME,
            rationale: format!("{outcome}"),
        });
        Ok(outcome)
    }
}
