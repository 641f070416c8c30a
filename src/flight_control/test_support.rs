//! Scripted stand-ins for the vehicle boundary, shared by the control-loop tests.

use crate::vehicle::{
    AutopilotMode, BodyView, NodeId, OrbitView, ReferenceFrame, TargetPoint, TelemetrySnapshot,
    TelemetrySource, TimeSource, VehicleBus,
};
use async_trait::async_trait;
use nalgebra::Vector3;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Pops scripted values, holding the last one once the script runs dry.
fn script_next<T: Clone>(q: &mut VecDeque<T>) -> Option<T> {
    if q.len() > 1 { q.pop_front() } else { q.front().cloned() }
}

pub struct FakeTelemetry {
    frames: Mutex<VecDeque<TelemetrySnapshot>>,
}

impl FakeTelemetry {
    pub fn constant(frame: TelemetrySnapshot) -> Self {
        Self::scripted(vec![frame])
    }

    pub fn scripted(frames: Vec<TelemetrySnapshot>) -> Self {
        assert!(!frames.is_empty(), "telemetry script must not be empty");
        Self { frames: Mutex::new(frames.into()) }
    }

    pub fn on_orbit() -> TelemetrySnapshot {
        TelemetrySnapshot {
            ut: 0.0,
            mean_altitude: 100_000.0,
            terrain_altitude: 100_000.0,
            vertical_speed: 0.0,
            orbital_speed: 2_246.0,
            apoapsis: 100_000.0,
            periapsis: 100_000.0,
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    pub fn descending(terrain_altitude: f64, vertical_speed: f64) -> TelemetrySnapshot {
        TelemetrySnapshot {
            ut: 0.0,
            mean_altitude: terrain_altitude,
            terrain_altitude,
            vertical_speed,
            orbital_speed: 0.0,
            apoapsis: 0.0,
            periapsis: 0.0,
            latitude: 0.0,
            longitude: 0.0,
        }
    }
}

#[async_trait]
impl TelemetrySource for FakeTelemetry {
    async fn snapshot(&self) -> TelemetrySnapshot {
        let mut frames = self.frames.lock().unwrap();
        script_next(&mut frames).expect("telemetry script must not be empty")
    }
}

pub struct FakeClock {
    ut: Mutex<f64>,
    warps: Mutex<Vec<f64>>,
}

impl FakeClock {
    pub fn at(ut: f64) -> Self {
        Self { ut: Mutex::new(ut), warps: Mutex::new(Vec::new()) }
    }

    pub fn warp_log(&self) -> Vec<f64> { self.warps.lock().unwrap().clone() }
}

#[async_trait]
impl TimeSource for FakeClock {
    async fn ut_now(&self) -> f64 { *self.ut.lock().unwrap() }

    async fn warp_to(&self, ut: f64) {
        self.warps.lock().unwrap().push(ut);
        let mut now = self.ut.lock().unwrap();
        if ut > *now {
            *now = ut;
        }
    }
}

/// Orbit that sits at a fixed point, giving a constant, scriptable miss distance.
pub struct PointOrbit {
    period: f64,
    point: Vector3<f64>,
    body: OriginBody,
}

pub struct OriginBody;

impl BodyView for OriginBody {
    fn surface_position(&self, _target: TargetPoint, _frame: ReferenceFrame) -> Vector3<f64> {
        Vector3::zeros()
    }
}

impl PointOrbit {
    pub fn at_distance(distance: f64) -> Arc<dyn OrbitView> {
        Arc::new(Self { period: 1_000.0, point: Vector3::new(distance, 0.0, 0.0), body: OriginBody })
    }
}

impl OrbitView for PointOrbit {
    fn period(&self) -> f64 { self.period }

    fn position_at(&self, _ut: f64, _frame: ReferenceFrame) -> Vector3<f64> { self.point }

    fn body(&self) -> &dyn BodyView { &self.body }
}

struct FakeNode {
    id: NodeId,
    ut: f64,
    prograde_dv: f64,
}

#[derive(Default)]
struct BusInner {
    throttle_log: Vec<f64>,
    rcs_log: Vec<bool>,
    mode_log: Vec<AutopilotMode>,
    frame_log: Vec<ReferenceFrame>,
    mass: f64,
    thrust: f64,
    nodes: Vec<FakeNode>,
    added_log: Vec<(f64, f64)>,
    next_id: u64,
    eta_script: VecDeque<f64>,
    remaining_script: VecDeque<f64>,
    orbit_script: VecDeque<Arc<dyn OrbitView>>,
    current_orbit: Option<Arc<dyn OrbitView>>,
}

/// Records every command and answers node queries from per-test scripts.
pub struct RecordingBus {
    inner: Mutex<BusInner>,
}

impl RecordingBus {
    pub fn new() -> Self { Self::with_engine(10_000.0, 200_000.0) }

    pub fn with_engine(mass: f64, thrust: f64) -> Self {
        Self { inner: Mutex::new(BusInner { mass, thrust, ..BusInner::default() }) }
    }

    pub fn script_eta(&self, etas: &[f64]) {
        self.inner.lock().unwrap().eta_script = etas.iter().copied().collect();
    }

    pub fn script_remaining_dv(&self, dvs: &[f64]) {
        self.inner.lock().unwrap().remaining_script = dvs.iter().copied().collect();
    }

    pub fn script_node_orbits(&self, orbits: Vec<Arc<dyn OrbitView>>) {
        self.inner.lock().unwrap().orbit_script = orbits.into();
    }

    pub fn set_current_orbit(&self, orbit: Arc<dyn OrbitView>) {
        self.inner.lock().unwrap().current_orbit = Some(orbit);
    }

    pub fn throttle_log(&self) -> Vec<f64> { self.inner.lock().unwrap().throttle_log.clone() }

    pub fn rcs_log(&self) -> Vec<bool> { self.inner.lock().unwrap().rcs_log.clone() }

    pub fn mode_log(&self) -> Vec<AutopilotMode> { self.inner.lock().unwrap().mode_log.clone() }

    pub fn frame_log(&self) -> Vec<ReferenceFrame> { self.inner.lock().unwrap().frame_log.clone() }

    pub fn node_count(&self) -> usize { self.inner.lock().unwrap().nodes.len() }

    pub fn node_prograde_dv(&self, id: NodeId) -> Option<f64> {
        self.inner.lock().unwrap().nodes.iter().find(|n| n.id == id).map(|n| n.prograde_dv)
    }

    /// Every `(ut, prograde_dv)` ever planned, including removed nodes.
    pub fn added_log(&self) -> Vec<(f64, f64)> { self.inner.lock().unwrap().added_log.clone() }

    pub fn max_commanded_throttle(&self) -> f64 {
        self.inner.lock().unwrap().throttle_log.iter().copied().fold(0.0, f64::max)
    }
}

#[async_trait]
impl VehicleBus for RecordingBus {
    async fn set_throttle(&self, level: f64) {
        self.inner.lock().unwrap().throttle_log.push(level);
    }

    async fn set_rcs(&self, enabled: bool) { self.inner.lock().unwrap().rcs_log.push(enabled); }

    async fn set_autopilot_mode(&self, mode: AutopilotMode) {
        self.inner.lock().unwrap().mode_log.push(mode);
    }

    async fn autopilot_mode(&self) -> AutopilotMode {
        self.inner.lock().unwrap().mode_log.last().copied().unwrap_or(AutopilotMode::StabilityHold)
    }

    async fn set_reference_frame(&self, frame: ReferenceFrame) {
        self.inner.lock().unwrap().frame_log.push(frame);
    }

    async fn vessel_mass(&self) -> f64 { self.inner.lock().unwrap().mass }

    async fn available_thrust(&self) -> f64 { self.inner.lock().unwrap().thrust }

    async fn current_orbit(&self) -> Arc<dyn OrbitView> {
        self.inner.lock().unwrap().current_orbit.clone().expect("no current orbit scripted")
    }

    async fn pending_nodes(&self) -> Vec<NodeId> {
        self.inner.lock().unwrap().nodes.iter().map(|n| n.id).collect()
    }

    async fn add_node(&self, ut: f64, prograde_dv: f64) -> NodeId {
        let mut inner = self.inner.lock().unwrap();
        let id = NodeId(inner.next_id);
        inner.next_id += 1;
        inner.added_log.push((ut, prograde_dv));
        inner.nodes.push(FakeNode { id, ut, prograde_dv });
        id
    }

    async fn remove_node(&self, id: NodeId) {
        self.inner.lock().unwrap().nodes.retain(|n| n.id != id);
    }

    async fn node_remaining_dv(&self, id: NodeId) -> Option<f64> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.nodes.iter().any(|n| n.id == id) {
            return None;
        }
        if inner.remaining_script.is_empty() {
            return inner.nodes.iter().find(|n| n.id == id).map(|n| n.prograde_dv.abs());
        }
        script_next(&mut inner.remaining_script)
    }

    async fn node_eta(&self, id: NodeId) -> Option<f64> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.nodes.iter().any(|n| n.id == id) {
            return None;
        }
        if inner.eta_script.is_empty() {
            return inner.nodes.iter().find(|n| n.id == id).map(|n| n.ut);
        }
        script_next(&mut inner.eta_script)
    }

    async fn node_orbit(&self, id: NodeId) -> Option<Arc<dyn OrbitView>> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.nodes.iter().any(|n| n.id == id) {
            return None;
        }
        if inner.orbit_script.is_empty() {
            return inner.current_orbit.clone();
        }
        script_next(&mut inner.orbit_script)
    }
}
