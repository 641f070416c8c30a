use crate::config::GuidanceConfig;
use crate::console::{StatusSink, StatusUpdate};
use crate::flight_control::FlightComputer;
use crate::flight_control::descent::{DescentController, DescentOutcome};
use crate::info;
use crate::mission::PhaseOutcome;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

/// Landing phase: altitude hold and powered descent to touchdown.
pub struct LandingPhase {
    sink: Arc<dyn StatusSink>,
    controller: DescentController,
}

impl LandingPhase {
    const PHASE_NAME: &'static str = "LandingPhase";

    pub fn new(
        f_cont: Arc<RwLock<FlightComputer>>,
        cfg: &GuidanceConfig,
        sink: Arc<dyn StatusSink>,
    ) -> Self {
        let controller = DescentController::new(f_cont, cfg, Arc::clone(&sink));
        Self { sink, controller }
    }

    pub async fn run(&self, cancel: &CancellationToken) -> PhaseOutcome {
        self.sink.report(StatusUpdate::PhaseStarted { name: Self::PHASE_NAME });
        let outcome = match self.controller.run(cancel).await {
            DescentOutcome::Touchdown => {
                info!("Landing complete");
                PhaseOutcome::Complete
            }
            DescentOutcome::Cancelled => PhaseOutcome::Cancelled,
        };
        self.sink.report(StatusUpdate::PhaseEnded {
            name: Self::PHASE_NAME,
            rationale: format!("{outcome}"),
        });
        outcome
    }
}
