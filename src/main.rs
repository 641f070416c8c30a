#![allow(clippy::similar_names)]
#![warn(clippy::shadow_reuse, clippy::shadow_same, clippy::builtin_type_shadow)]
mod config;
mod console;
mod flight_control;
mod logger;
mod mission;
mod vehicle;

use crate::config::GuidanceConfig;
use crate::console::{ConsoleSink, StatusSink};
use crate::flight_control::{FlightComputer, GuidanceError};
use crate::mission::{
    PhaseOutcome, correction::CorrectionPhase, deorbit::DeOrbitPhase, landing::LandingPhase,
};
use crate::vehicle::sim::{SimVessel, SimVesselConfig};
use crate::vehicle::{TelemetrySource, TimeSource, VehicleBus};
use std::{env, sync::Arc};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() {
    let cfg = GuidanceConfig::from_env();
    let mission = env::var("MISSION").unwrap_or_else(|_| String::from("full"));
    info!("Target: {}", cfg.target);

    let vessel = SimVessel::spawn(SimVesselConfig::default());
    let telemetry = Arc::clone(&vessel) as Arc<dyn TelemetrySource>;
    let bus = Arc::clone(&vessel) as Arc<dyn VehicleBus>;
    let clock = vessel as Arc<dyn TimeSource>;
    let f_cont = Arc::new(RwLock::new(FlightComputer::new(telemetry, bus, clock).await));
    let sink: Arc<dyn StatusSink> = Arc::new(ConsoleSink);
    let cancel = CancellationToken::new();

    let outcome = match mission.as_str() {
        "deorbit" => run_deorbit(&f_cont, &cfg, &sink, &cancel).await,
        "correct" => run_correction(&f_cont, &cfg, &sink, &cancel).await,
        "land" => Ok(run_landing(&f_cont, &cfg, &sink, &cancel).await),
        "full" => run_full(&f_cont, &cfg, &sink, &cancel).await,
        other => fatal!("Unknown MISSION {other:?}, expected deorbit|correct|land|full"),
    };
    match outcome {
        Ok(PhaseOutcome::Complete) => info!("Mission {mission} complete"),
        Ok(PhaseOutcome::Cancelled) => warn!("Mission {mission} cancelled"),
        Err(e) => fatal!("Mission {mission} aborted: {e}"),
    }
}

async fn run_full(
    f_cont: &Arc<RwLock<FlightComputer>>,
    cfg: &GuidanceConfig,
    sink: &Arc<dyn StatusSink>,
    cancel: &CancellationToken,
) -> Result<PhaseOutcome, GuidanceError> {
    if run_deorbit(f_cont, cfg, sink, cancel).await? == PhaseOutcome::Cancelled {
        return Ok(PhaseOutcome::Cancelled);
    }
    if run_correction(f_cont, cfg, sink, cancel).await? == PhaseOutcome::Cancelled {
        return Ok(PhaseOutcome::Cancelled);
    }
    Ok(run_landing(f_cont, cfg, sink, cancel).await)
}

async fn run_deorbit(
    f_cont: &Arc<RwLock<FlightComputer>>,
    cfg: &GuidanceConfig,
    sink: &Arc<dyn StatusSink>,
    cancel: &CancellationToken,
) -> Result<PhaseOutcome, GuidanceError> {
    DeOrbitPhase::new(Arc::clone(f_cont), cfg, Arc::clone(sink)).run(cancel).await
}

async fn run_correction(
    f_cont: &Arc<RwLock<FlightComputer>>,
    cfg: &GuidanceConfig,
    sink: &Arc<dyn StatusSink>,
    cancel: &CancellationToken,
) -> Result<PhaseOutcome, GuidanceError> {
    CorrectionPhase::new(Arc::clone(f_cont), cfg, Arc::clone(sink)).run(cancel).await
}

async fn run_landing(
    f_cont: &Arc<RwLock<FlightComputer>>,
    cfg: &GuidanceConfig,
    sink: &Arc<dyn StatusSink>,
    cancel: &CancellationToken,
) -> PhaseOutcome {
    LandingPhase::new(Arc::clone(f_cont), cfg, Arc::clone(sink)).run(cancel).await
}
