use crate::info;
use crate::vehicle::{
    AutopilotMode, NodeId, OrbitView, ReferenceFrame, TelemetrySnapshot, TelemetrySource,
    TimeSource, VehicleBus,
};
use std::sync::Arc;

/// Owns the handles to the vehicle and mediates every command guidance issues.
///
/// The flight computer is the single owner of the throttle/attitude actuator:
/// whichever control loop currently holds it (through the usual
/// `Arc<RwLock<FlightComputer>>`) is the only writer. It also enforces the
/// throttle clamp, so the bus below never sees a raw controller output.
pub struct FlightComputer {
    telemetry: Arc<dyn TelemetrySource>,
    bus: Arc<dyn VehicleBus>,
    clock: Arc<dyn TimeSource>,
    current_obs: TelemetrySnapshot,
    held_frame: Option<ReferenceFrame>,
}

impl FlightComputer {
    pub async fn new(
        telemetry: Arc<dyn TelemetrySource>,
        bus: Arc<dyn VehicleBus>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        let current_obs = telemetry.snapshot().await;
        Self { telemetry, bus, clock, current_obs, held_frame: None }
    }

    /// Re-reads telemetry and caches the fresh snapshot.
    pub async fn update_observation(&mut self) {
        self.current_obs = self.telemetry.snapshot().await;
    }

    /// The last cached snapshot. Callers that need fresher data call
    /// [`Self::update_observation`] first; the snapshot never refreshes itself.
    pub fn current(&self) -> TelemetrySnapshot { self.current_obs }

    /// Commands the throttle, clamped to `[0, 1]`.
    pub async fn set_throttle(&self, raw: f64) {
        self.bus.set_throttle(raw.clamp(0.0, 1.0)).await;
    }

    pub async fn cut_throttle(&self) { self.bus.set_throttle(0.0).await; }

    /// Points the autopilot: selects `frame`, commands `mode`, and remembers
    /// the frame so control loops can re-assert it every tick.
    pub async fn engage(&mut self, frame: ReferenceFrame, mode: AutopilotMode) {
        self.bus.set_reference_frame(frame).await;
        self.bus.set_autopilot_mode(mode).await;
        self.held_frame = Some(frame);
        info!("Autopilot engaged: {mode} in {frame} frame");
    }

    /// Re-sends the held reference frame. The frame can drift or be overridden
    /// externally, so hold loops call this once per tick.
    pub async fn reassert_frame(&self) {
        if let Some(frame) = self.held_frame {
            self.bus.set_reference_frame(frame).await;
        }
    }

    pub async fn set_autopilot_mode(&self, mode: AutopilotMode) {
        self.bus.set_autopilot_mode(mode).await;
    }

    pub async fn autopilot_mode(&self) -> AutopilotMode { self.bus.autopilot_mode().await }

    pub async fn set_rcs(&self, enabled: bool) {
        self.bus.set_rcs(enabled).await;
        info!("RCS {}", if enabled { "enabled" } else { "disabled" });
    }

    pub async fn ut_now(&self) -> f64 { self.clock.ut_now().await }

    pub async fn warp_to(&self, ut: f64) { self.clock.warp_to(ut).await; }

    pub async fn vessel_mass(&self) -> f64 { self.bus.vessel_mass().await }

    pub async fn available_thrust(&self) -> f64 { self.bus.available_thrust().await }

    pub async fn current_orbit(&self) -> Arc<dyn OrbitView> { self.bus.current_orbit().await }

    pub async fn pending_nodes(&self) -> Vec<NodeId> { self.bus.pending_nodes().await }

    pub async fn add_node(&self, ut: f64, prograde_dv: f64) -> NodeId {
        self.bus.add_node(ut, prograde_dv).await
    }

    pub async fn remove_node(&self, id: NodeId) { self.bus.remove_node(id).await; }

    pub async fn node_remaining_dv(&self, id: NodeId) -> Option<f64> {
        self.bus.node_remaining_dv(id).await
    }

    pub async fn node_eta(&self, id: NodeId) -> Option<f64> { self.bus.node_eta(id).await }

    pub async fn node_orbit(&self, id: NodeId) -> Option<Arc<dyn OrbitView>> {
        self.bus.node_orbit(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight_control::test_support::{FakeClock, FakeTelemetry, RecordingBus};

    async fn computer(bus: Arc<RecordingBus>) -> FlightComputer {
        FlightComputer::new(
            Arc::new(FakeTelemetry::constant(FakeTelemetry::on_orbit())),
            bus,
            Arc::new(FakeClock::at(0.0)),
        )
        .await
    }

    #[tokio::test]
    async fn throttle_is_clamped_both_ways() {
        let bus = Arc::new(RecordingBus::new());
        let f_cont = computer(Arc::clone(&bus)).await;
        f_cont.set_throttle(4.2).await;
        f_cont.set_throttle(-1.7).await;
        f_cont.set_throttle(0.35).await;
        assert_eq!(bus.throttle_log(), vec![1.0, 0.0, 0.35]);
    }

    #[tokio::test]
    async fn reassert_frame_resends_engaged_frame() {
        let bus = Arc::new(RecordingBus::new());
        let mut f_cont = computer(Arc::clone(&bus)).await;
        f_cont.reassert_frame().await;
        assert!(bus.frame_log().is_empty());
        f_cont.engage(ReferenceFrame::Surface, AutopilotMode::Retrograde).await;
        f_cont.reassert_frame().await;
        f_cont.reassert_frame().await;
        assert_eq!(
            bus.frame_log(),
            vec![ReferenceFrame::Surface, ReferenceFrame::Surface, ReferenceFrame::Surface]
        );
    }
}
