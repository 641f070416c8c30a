use super::profile::{DescentProfile, gain_for, throttle_command};
use crate::config::GuidanceConfig;
use crate::console::{StatusSink, StatusUpdate};
use crate::flight_control::FlightComputer;
use crate::vehicle::{AutopilotMode, ReferenceFrame};
use crate::{event, info};
use std::sync::Arc;
use std::time::Duration;
use strum_macros::Display;
use tokio::sync::RwLock;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// How a descent run ended.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum DescentOutcome {
    Touchdown,
    Cancelled,
}

/// Closed-loop powered-descent controller.
///
/// Holds retrograde above the altitude gate, then tracks a speed-vs-altitude
/// profile with a staged-gain proportional loop until touchdown. Every tick
/// works from a fresh telemetry snapshot; the controller keeps no state
/// between ticks beyond the captured profile and the one-shot terminal flag.
pub struct DescentController {
    f_cont: Arc<RwLock<FlightComputer>>,
    sink: Arc<dyn StatusSink>,
    hold_gate_alt: f64,
    profile_reference_alt: f64,
    profile_exponent: f64,
    stability_handoff_alt: f64,
    touchdown_alt: f64,
}

impl DescentController {
    /// Poll interval while holding above the gate.
    const HOLD_POLL: Duration = Duration::from_secs(1);
    /// Control tick during profile tracking. Loosening this destabilizes the
    /// proportional loop; tighten if anything.
    const TRACK_TICK: Duration = Duration::from_millis(10);

    pub fn new(
        f_cont: Arc<RwLock<FlightComputer>>,
        cfg: &GuidanceConfig,
        sink: Arc<dyn StatusSink>,
    ) -> Self {
        Self {
            f_cont,
            sink,
            hold_gate_alt: cfg.hold_gate_alt,
            profile_reference_alt: cfg.profile_reference_alt,
            profile_exponent: cfg.profile_exponent,
            stability_handoff_alt: cfg.stability_handoff_alt,
            touchdown_alt: cfg.touchdown_alt,
        }
    }

    /// Runs the descent to touchdown. Blocks until the terrain altitude
    /// condition is met or `cancel` fires; those are the only two exits.
    pub async fn run(&self, cancel: &CancellationToken) -> DescentOutcome {
        if !self.hold_until_gate(cancel).await {
            return DescentOutcome::Cancelled;
        }
        self.track_profile_to_touchdown(cancel).await
    }

    /// Retrograde hold until the vehicle sinks below the altitude gate;
    /// `false` when cancelled first. The orbital reference frame is
    /// re-asserted every tick since it can drift or be overridden externally.
    async fn hold_until_gate(&self, cancel: &CancellationToken) -> bool {
        self.f_cont
            .write()
            .await
            .engage(ReferenceFrame::Orbital, AutopilotMode::Retrograde)
            .await;
        info!("Holding retrograde until {:.0} m", self.hold_gate_alt);
        loop {
            let obs = {
                let mut f_cont = self.f_cont.write().await;
                f_cont.update_observation().await;
                f_cont.current()
            };
            if obs.mean_altitude <= self.hold_gate_alt {
                info!("Reached hold gate at {:.2} m", obs.mean_altitude);
                return true;
            }
            self.f_cont.read().await.reassert_frame().await;
            self.sink.report(StatusUpdate::AltitudeHold {
                current_alt: obs.mean_altitude,
                gate_alt: self.hold_gate_alt,
            });
            tokio::select! {
                () = cancel.cancelled() => return false,
                () = sleep(Self::HOLD_POLL) => {}
            }
        }
    }

    async fn track_profile_to_touchdown(&self, cancel: &CancellationToken) -> DescentOutcome {
        let profile = {
            let mut f_cont = self.f_cont.write().await;
            f_cont.engage(ReferenceFrame::Surface, AutopilotMode::Retrograde).await;
            f_cont.update_observation().await;
            DescentProfile::capture(
                f_cont.current().descent_speed(),
                self.profile_reference_alt,
                self.profile_exponent,
            )
        };
        info!(
            "Tracking descent profile: {:.2} m/s reference at {:.0} m",
            profile.reference_speed(),
            self.profile_reference_alt
        );

        let mut terminal_engaged = false;
        loop {
            let obs = {
                let mut f_cont = self.f_cont.write().await;
                f_cont.update_observation().await;
                f_cont.current()
            };
            let target_speed = profile.target_speed(obs.terrain_altitude);
            let throttle =
                throttle_command(gain_for(obs.terrain_altitude), obs.descent_speed(), target_speed);
            self.f_cont.read().await.set_throttle(throttle).await;
            self.sink.report(StatusUpdate::DescentTick {
                terrain_alt: obs.terrain_altitude,
                target_speed,
                actual_speed: obs.descent_speed(),
                throttle,
            });
            event!(
                "descent tick: {:.0} m, target {target_speed:.2} m/s, throttle {throttle:.2}",
                obs.terrain_altitude
            );

            if obs.terrain_altitude < self.stability_handoff_alt && !terminal_engaged {
                let f_cont = self.f_cont.read().await;
                if f_cont.autopilot_mode().await != AutopilotMode::StabilityHold {
                    f_cont.set_autopilot_mode(AutopilotMode::StabilityHold).await;
                    info!("Terminal handoff: stability hold engaged");
                }
                terminal_engaged = true;
            }

            if obs.terrain_altitude <= self.touchdown_alt {
                break;
            }
            tokio::select! {
                () = cancel.cancelled() => {
                    self.f_cont.read().await.cut_throttle().await;
                    return DescentOutcome::Cancelled;
                }
                () = sleep(Self::TRACK_TICK) => {}
            }
        }

        self.f_cont.read().await.cut_throttle().await;
        info!("Touchdown: target speed 0.00 m/s");
        DescentOutcome::Touchdown
    }
}
