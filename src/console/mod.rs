//! Optional status reporting. Core algorithms never depend on a sink being
//! present; phases receive one by injection and the no-op sink is always a
//! valid choice.

use crate::vehicle::TargetPoint;
use crate::{event, info, log};

/// One progress/status report from a mission phase.
#[derive(Debug, Clone)]
pub enum StatusUpdate {
    PhaseStarted { name: &'static str },
    PhaseEnded { name: &'static str, rationale: String },
    /// Periodic tick while holding above the descent gate.
    AltitudeHold { current_alt: f64, gate_alt: f64 },
    /// Per-tick descent tracking state.
    DescentTick { terrain_alt: f64, target_speed: f64, actual_speed: f64, throttle: f64 },
    /// A closest-approach solution against `target`.
    ApproachSolved { target: TargetPoint, distance: f64, time_from_now: f64 },
    /// Outcome of one correction trial.
    TrialEvaluated { iteration: u32, trial_dv: f64, distance: f64, improved: bool },
}

/// Receiver of [`StatusUpdate`]s.
pub trait StatusSink: Send + Sync {
    fn report(&self, update: StatusUpdate);
}

/// Sink that renders updates through the crate logger. Per-tick chatter is
/// routed through `event!`, so it only shows up with `LOG_GNC_EVENTS` set.
pub struct ConsoleSink;

impl StatusSink for ConsoleSink {
    fn report(&self, update: StatusUpdate) {
        match update {
            StatusUpdate::PhaseStarted { name } => info!("=== {name} ==="),
            StatusUpdate::PhaseEnded { name, rationale } => info!("=== {name}: {rationale} ==="),
            StatusUpdate::AltitudeHold { current_alt, gate_alt } => {
                event!("Holding: {current_alt:.0} m, gate at {gate_alt:.0} m");
            }
            StatusUpdate::DescentTick { terrain_alt, target_speed, actual_speed, throttle } => {
                event!(
                    "At {terrain_alt:5.0} m -> target {target_speed:7.2} m/s | actual {actual_speed:7.2} m/s | throttle {throttle:.2}"
                );
            }
            StatusUpdate::ApproachSolved { target, distance, time_from_now } => {
                log!("Closest pass to {target}: {distance:.0} m in {time_from_now:.0}s");
            }
            StatusUpdate::TrialEvaluated { iteration, trial_dv, distance, improved } => {
                log!(
                    "Trial {iteration} ({trial_dv:.0} m/s): miss {distance:.0} m, {}",
                    if improved { "improved" } else { "no improvement" }
                );
            }
        }
    }
}

/// Sink that drops every update.
pub struct NoopSink;

impl StatusSink for NoopSink {
    fn report(&self, _update: StatusUpdate) {}
}
