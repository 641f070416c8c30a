use crate::config::GuidanceConfig;
use crate::console::{StatusSink, StatusUpdate};
use crate::flight_control::maneuver::{BurnMagnitude, BurnOutcome, execute_node, plan_node};
use crate::flight_control::orbit::{ClosestApproachResult, SolverParams, find_closest_approach};
use crate::flight_control::{FlightComputer, GuidanceError};
use crate::mission::PhaseOutcome;
use crate::vehicle::{AutopilotMode, OrbitView, ReferenceFrame, TargetPoint};
use crate::{info, log};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// Iterative along-track miss correction.
///
/// Each iteration proposes a monotonically growing trial burn, evaluates the
/// post-burn orbit's closest approach against the best miss so far and only
/// executes trials that improve it. The first non-improving trial ends the
/// loop on the spot; there is no patience window. Exiting without having
/// reached any particular miss distance is an accepted partial result.
pub struct CorrectionPhase {
    f_cont: Arc<RwLock<FlightComputer>>,
    sink: Arc<dyn StatusSink>,
    target: TargetPoint,
    solver: SolverParams,
    step_dv: f64,
    max_iterations: u32,
}

impl CorrectionPhase {
    const PHASE_NAME: &'static str = "CorrectionPhase";
    /// Attitude settle time after pointing at a freshly planned node.
    const MANEUVER_SETTLE: Duration = Duration::from_secs(2);

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
            step_dv: cfg.correction_step_dv,
            max_iterations: cfg.max_correction_iters,
        }
    }

    fn solve(
        &self,
        orbit: &dyn OrbitView,
        now: f64,
    ) -> Result<ClosestApproachResult, GuidanceError> {
        find_closest_approach(orbit, self.target, now, &self.solver)
    }

    pub async fn run(&self, cancel: &CancellationToken) -> Result<PhaseOutcome, GuidanceError> {
        self.sink.report(StatusUpdate::PhaseStarted { name: Self::PHASE_NAME });
        let (orbit, now) = {
            let f_cont = self.f_cont.read().await;
            (f_cont.current_orbit().await, f_cont.ut_now().await)
        };
        let mut best = self.solve(&*orbit, now)?;
        info!("Baseline miss distance: {:.0} m", best.distance);
        self.sink.report(StatusUpdate::ApproachSolved {
            target: self.target,
            distance: best.distance,
            time_from_now: best.time_from_now,
        });

        self.f_cont.read().await.set_rcs(true).await;
        let mut outcome = PhaseOutcome::Complete;

        for iteration in 1..=self.max_iterations {
            let trial = BurnMagnitude::retrograde(self.step_dv * f64::from(iteration));
            let now = self.f_cont.read().await.ut_now().await;
            let node = plan_node(&self.f_cont, now, trial).await?;
            self.f_cont
                .write()
                .await
                .engage(ReferenceFrame::Orbital, AutopilotMode::ManeuverHold)
                .await;
            tokio::select! {
                () = cancel.cancelled() => {
                    self.f_cont.read().await.remove_node(node.id).await;
                    outcome = PhaseOutcome::Cancelled;
                    break;
                }
                () = sleep(Self::MANEUVER_SETTLE) => {}
            }

            let post_orbit = self
                .f_cont
                .read()
                .await
                .node_orbit(node.id)
                .await
                .ok_or(GuidanceError::NodeVanished(node.id))?;
            let trial_pass = self.solve(&*post_orbit, now)?;
            let improved = trial_pass.distance < best.distance;
            self.sink.report(StatusUpdate::TrialEvaluated {
                iteration,
                trial_dv: trial.mps(),
                distance: trial_pass.distance,
                improved,
            });

            if improved {
                best = trial_pass;
                if execute_node(&self.f_cont, node, cancel).await? == BurnOutcome::Cancelled {
                    outcome = PhaseOutcome::Cancelled;
                    break;
                }
                // The executor leaves the vehicle in retrograde hold; keep
                // RCS up for the next trial's attitude work.
                self.f_cont.read().await.set_rcs(true).await;
            } else {
                self.f_cont.read().await.remove_node(node.id).await;
                log!("No improvement found after {iteration} iterations");
                break;
            }
        }

        self.f_cont.read().await.set_rcs(false).await;
        self.sink.report(StatusUpdate::PhaseEnded {
            name: Self::PHASE_NAME,
            rationale: format!("{outcome}, best miss {:.0} m", best.distance),
        });
        Ok(outcome)
    }
}
