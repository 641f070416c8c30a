/// Proportional gain above 750 m terrain altitude.
const GAIN_HIGH: f64 = 0.02;
/// Proportional gain between 50 m and 750 m.
const GAIN_MID: f64 = 0.04;
/// Proportional gain below 50 m.
const GAIN_LOW: f64 = 0.08;

/// Target descent speed as a function of terrain altitude.
///
/// Captured once when profile tracking starts and held constant for the rest
/// of the descent: the reference speed is the descent rate observed at the
/// reference altitude, and the target tapers to zero at zero altitude. With
/// exponent 1.0 the taper is linear; larger exponents keep speed up longer
/// and brake harder late.
#[derive(Debug, Clone, Copy)]
pub struct DescentProfile {
    reference_speed: f64,
    reference_altitude: f64,
    exponent: f64,
}

impl DescentProfile {
    pub fn capture(reference_speed: f64, reference_altitude: f64, exponent: f64) -> Self {
        Self { reference_speed: reference_speed.abs(), reference_altitude, exponent }
    }

    pub fn reference_speed(&self) -> f64 { self.reference_speed }

    /// Target descent speed at `terrain_altitude`, m/s (positive down).
    pub fn target_speed(&self, terrain_altitude: f64) -> f64 {
        let frac = (terrain_altitude / self.reference_altitude).max(0.0);
        self.reference_speed * frac.powf(self.exponent)
    }
}

/// Staged gain schedule: coarse correction at altitude, tighter near the ground.
pub fn gain_for(terrain_altitude: f64) -> f64 {
    if terrain_altitude > 750.0 {
        GAIN_HIGH
    } else if terrain_altitude > 50.0 {
        GAIN_MID
    } else {
        GAIN_LOW
    }
}

/// Proportional throttle command, clamped to the actuator range.
pub fn throttle_command(gain: f64, actual_descent_speed: f64, target_speed: f64) -> f64 {
    (gain * (actual_descent_speed - target_speed)).clamp(0.0, 1.0)
}
