use crate::vehicle::{
    autopilot::{AutopilotMode, ReferenceFrame},
    bus::{NodeId, VehicleBus},
    clock::TimeSource,
    orbit::{BodyView, OrbitView, TargetPoint},
    telemetry::{TelemetrySnapshot, TelemetrySource},
};
use async_trait::async_trait;
use nalgebra::Vector3;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Static parameters of the bundled point-mass vehicle simulation.
#[derive(Debug, Clone)]
pub struct SimVesselConfig {
    /// Radius of the orbited body, m.
    pub body_radius: f64,
    /// Gravitational parameter of the body, m³/s².
    pub mu: f64,
    /// Initial circular orbit altitude above the datum, m.
    pub orbit_altitude: f64,
    /// Initial orbital phase angle, degrees.
    pub start_phase_deg: f64,
    /// Vehicle mass, kg. Held constant; propellant bookkeeping is not modeled.
    pub vessel_mass: f64,
    /// Maximum engine thrust, N.
    pub max_thrust: f64,
    /// Initial altitude of the vertical descent channel, m.
    pub descent_start_alt: f64,
    /// Initial vertical speed of the descent channel, m/s (negative = falling).
    pub descent_start_vspeed: f64,
    /// Multiplier on simulated time per wall-clock second.
    pub time_scale: f64,
}

impl Default for SimVesselConfig {
    fn default() -> Self {
        Self {
            body_radius: 600_000.0,
            mu: 3.5316e12,
            orbit_altitude: 100_000.0,
            start_phase_deg: 0.0,
            vessel_mass: 12_000.0,
            max_thrust: 240_000.0,
            descent_start_alt: 30_000.0,
            descent_start_vspeed: -220.0,
            time_scale: 1.0,
        }
    }
}

/// Non-rotating spherical body.
#[derive(Debug)]
pub struct SphericalBody {
    radius: f64,
}

impl BodyView for SphericalBody {
    fn surface_position(&self, target: TargetPoint, _frame: ReferenceFrame) -> Vector3<f64> {
        let lat = target.lat_deg().to_radians();
        let lon = target.lon_deg().to_radians();
        Vector3::new(
            self.radius * lat.cos() * lon.cos(),
            self.radius * lat.cos() * lon.sin(),
            self.radius * lat.sin(),
        )
    }
}

/// Immutable circular-orbit snapshot in the body's equatorial plane.
///
/// Burns are modeled impulsively: a speed change re-sizes the orbit through
/// vis-viva and the snapshot stays circular at the new semi-major axis. That
/// is coarse next to a real conic but preserves what guidance observes: a
/// retrograde burn shrinks the orbit and shifts every future ground pass.
pub struct CircularOrbit {
    radius: f64,
    mu: f64,
    epoch: f64,
    phase_at_epoch: f64,
    body: Arc<SphericalBody>,
}

impl CircularOrbit {
    fn mean_motion(&self) -> f64 { (self.mu / self.radius.powi(3)).sqrt() }

    fn phase_at(&self, ut: f64) -> f64 { self.phase_at_epoch + self.mean_motion() * (ut - self.epoch) }

    fn speed(&self) -> f64 { (self.mu / self.radius).sqrt() }

    /// The circular orbit after an impulsive speed change of `dv` m/s along
    /// the velocity axis, applied at `ut`.
    fn after_burn(&self, ut: f64, dv: f64) -> CircularOrbit {
        let v_new = (self.speed() + dv).max(1.0);
        // vis-viva at r = current radius
        let inv_a = 2.0 / self.radius - v_new * v_new / self.mu;
        let radius = if inv_a > 0.0 { (1.0 / inv_a).max(self.body.radius * 0.1) } else { self.radius * 10.0 };
        CircularOrbit {
            radius,
            mu: self.mu,
            epoch: ut,
            phase_at_epoch: self.phase_at(ut),
            body: Arc::clone(&self.body),
        }
    }
}

impl OrbitView for CircularOrbit {
    fn period(&self) -> f64 { std::f64::consts::TAU * (self.radius.powi(3) / self.mu).sqrt() }

    fn position_at(&self, ut: f64, _frame: ReferenceFrame) -> Vector3<f64> {
        let phase = self.phase_at(ut);
        Vector3::new(self.radius * phase.cos(), self.radius * phase.sin(), 0.0)
    }

    fn body(&self) -> &dyn BodyView { &*self.body }
}

struct SimNode {
    id: NodeId,
    ut: f64,
    prograde_dv: f64,
    remaining_dv: f64,
}

struct SimState {
    ut: f64,
    orbit: CircularOrbit,
    nodes: Vec<SimNode>,
    next_node_id: u64,
    throttle: f64,
    rcs: bool,
    autopilot: AutopilotMode,
    frame: ReferenceFrame,
    altitude: f64,
    vertical_speed: f64,
}

/// Bundled vehicle simulation backing the binary when no live vehicle API is
/// wired in. Implements all three boundary interfaces.
///
/// The orbital channel (analytic circular orbit plus impulsive nodes) and the
/// vertical descent channel (1-D point mass under surface gravity) are
/// deliberately independent; each mission phase only observes one of them.
pub struct SimVessel {
    cfg: SimVesselConfig,
    surface_gravity: f64,
    state: RwLock<SimState>,
}

impl SimVessel {
    /// Integration step of the background physics task.
    const SIM_TIMESTEP: Duration = Duration::from_millis(10);

    /// Creates the vessel and starts its physics task.
    pub fn spawn(cfg: SimVesselConfig) -> Arc<Self> {
        let body = Arc::new(SphericalBody { radius: cfg.body_radius });
        let orbit = CircularOrbit {
            radius: cfg.body_radius + cfg.orbit_altitude,
            mu: cfg.mu,
            epoch: 0.0,
            phase_at_epoch: cfg.start_phase_deg.to_radians(),
            body,
        };
        let state = SimState {
            ut: 0.0,
            orbit,
            nodes: Vec::new(),
            next_node_id: 0,
            throttle: 0.0,
            rcs: false,
            autopilot: AutopilotMode::StabilityHold,
            frame: ReferenceFrame::Orbital,
            altitude: cfg.descent_start_alt,
            vertical_speed: cfg.descent_start_vspeed,
        };
        let surface_gravity = cfg.mu / (cfg.body_radius * cfg.body_radius);
        let vessel = Arc::new(Self { cfg, surface_gravity, state: RwLock::new(state) });
        let stepper = Arc::clone(&vessel);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Self::SIM_TIMESTEP);
            loop {
                ticker.tick().await;
                let dt = Self::SIM_TIMESTEP.as_secs_f64() * stepper.cfg.time_scale;
                stepper.step(dt).await;
            }
        });
        vessel
    }

    async fn step(&self, dt: f64) {
        let mut s = self.state.write().await;
        s.ut += dt;

        let accel = s.throttle * self.cfg.max_thrust / self.cfg.vessel_mass;

        // Vertical channel: retrograde thrust opposes the fall.
        if s.altitude > 0.0 {
            s.vertical_speed += (accel - self.surface_gravity) * dt;
            s.altitude += s.vertical_speed * dt;
            if s.altitude <= 0.0 {
                s.altitude = 0.0;
                s.vertical_speed = 0.0;
            }
        }

        // Orbital channel: an open throttle consumes the first pending node.
        if s.throttle > 0.0 && accel > 0.0 {
            let ut = s.ut;
            if let Some(node) = s.nodes.first_mut() {
                let consumed = (accel * dt).min(node.remaining_dv);
                node.remaining_dv -= consumed;
                let signed = consumed * node.prograde_dv.signum();
                s.orbit = s.orbit.after_burn(ut, signed);
            }
        }
    }

    fn snapshot_of(&self, s: &SimState) -> TelemetrySnapshot {
        let alt = s.orbit.radius - self.cfg.body_radius;
        let lon = s.orbit.phase_at(s.ut).to_degrees().rem_euclid(360.0) - 180.0;
        TelemetrySnapshot {
            ut: s.ut,
            mean_altitude: s.altitude,
            terrain_altitude: s.altitude,
            vertical_speed: s.vertical_speed,
            orbital_speed: s.orbit.speed(),
            apoapsis: alt,
            periapsis: alt,
            latitude: 0.0,
            longitude: lon,
        }
    }

    fn orbit_snapshot(s: &SimState) -> Arc<dyn OrbitView> {
        Arc::new(CircularOrbit {
            radius: s.orbit.radius,
            mu: s.orbit.mu,
            epoch: s.orbit.epoch,
            phase_at_epoch: s.orbit.phase_at_epoch,
            body: Arc::clone(&s.orbit.body),
        })
    }
}

#[async_trait]
impl TelemetrySource for SimVessel {
    async fn snapshot(&self) -> TelemetrySnapshot {
        let s = self.state.read().await;
        self.snapshot_of(&s)
    }
}

#[async_trait]
impl TimeSource for SimVessel {
    async fn ut_now(&self) -> f64 { self.state.read().await.ut }

    async fn warp_to(&self, ut: f64) {
        let mut s = self.state.write().await;
        if ut > s.ut {
            s.ut = ut;
        }
    }
}

#[async_trait]
impl VehicleBus for SimVessel {
    async fn set_throttle(&self, level: f64) { self.state.write().await.throttle = level; }

    async fn set_rcs(&self, enabled: bool) { self.state.write().await.rcs = enabled; }

    async fn set_autopilot_mode(&self, mode: AutopilotMode) {
        self.state.write().await.autopilot = mode;
    }

    async fn autopilot_mode(&self) -> AutopilotMode { self.state.read().await.autopilot }

    async fn set_reference_frame(&self, frame: ReferenceFrame) {
        self.state.write().await.frame = frame;
    }

    async fn vessel_mass(&self) -> f64 { self.cfg.vessel_mass }

    async fn available_thrust(&self) -> f64 { self.cfg.max_thrust }

    async fn current_orbit(&self) -> Arc<dyn OrbitView> {
        let s = self.state.read().await;
        Self::orbit_snapshot(&s)
    }

    async fn pending_nodes(&self) -> Vec<NodeId> {
        self.state.read().await.nodes.iter().map(|n| n.id).collect()
    }

    async fn add_node(&self, ut: f64, prograde_dv: f64) -> NodeId {
        let mut s = self.state.write().await;
        let id = NodeId(s.next_node_id);
        s.next_node_id += 1;
        s.nodes.push(SimNode { id, ut, prograde_dv, remaining_dv: prograde_dv.abs() });
        id
    }

    async fn remove_node(&self, id: NodeId) {
        self.state.write().await.nodes.retain(|n| n.id != id);
    }

    async fn node_remaining_dv(&self, id: NodeId) -> Option<f64> {
        self.state.read().await.nodes.iter().find(|n| n.id == id).map(|n| n.remaining_dv)
    }

    async fn node_eta(&self, id: NodeId) -> Option<f64> {
        let s = self.state.read().await;
        s.nodes.iter().find(|n| n.id == id).map(|n| n.ut - s.ut)
    }

    async fn node_orbit(&self, id: NodeId) -> Option<Arc<dyn OrbitView>> {
        let s = self.state.read().await;
        let node = s.nodes.iter().find(|n| n.id == id)?;
        Some(Arc::new(s.orbit.after_burn(node.ut, node.prograde_dv)))
    }
}
