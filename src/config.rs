use crate::vehicle::orbit::TargetPoint;
use serde::{Deserialize, Serialize};
use std::env;

/// Tunable guidance parameters, resolved once at startup.
///
/// Every field can be overridden through a `GNC_*` environment variable so a
/// deployment can recalibrate without a rebuild. Values that differ between
/// observed vehicle configurations (profile exponent, terminal handoff
/// altitude, de-orbit Δv scaling) are deliberately parameters rather than
/// constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidanceConfig {
    /// Number of coarse samples per orbital period in the closest-approach search.
    pub coarse_samples: u32,
    /// Refinement terminates once the pattern-search step is below this many seconds.
    pub solver_tolerance_s: f64,
    /// Trial burn increment per correction iteration, in m/s.
    pub correction_step_dv: f64,
    /// Hard cap on correction iterations.
    pub max_correction_iters: u32,
    /// De-orbit burn Δv is the chord distance to target divided by this.
    pub deorbit_dv_divisor: f64,
    /// De-orbit node is scheduled this many seconds after the warp target.
    pub deorbit_lead_time_s: f64,
    /// Altitude gate (MSL, m) ending the pre-descent hold.
    pub hold_gate_alt: f64,
    /// Terrain altitude (m) at which the descent speed profile is anchored.
    pub profile_reference_alt: f64,
    /// Exponent of the target-speed profile. 1.0 is linear, 1.5 brakes later.
    pub profile_exponent: f64,
    /// Terrain altitude (m) below which the autopilot is handed to stability hold.
    pub stability_handoff_alt: f64,
    /// Terrain altitude (m) treated as touchdown.
    pub touchdown_alt: f64,
    /// Landing site.
    pub target: TargetPoint,
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            coarse_samples: 720,
            solver_tolerance_s: 1.0,
            correction_step_dv: 50.0,
            max_correction_iters: 5,
            deorbit_dv_divisor: 375.0,
            deorbit_lead_time_s: 60.0,
            hold_gate_alt: 12_500.0,
            profile_reference_alt: 10_000.0,
            profile_exponent: 1.0,
            stability_handoff_alt: 250.0,
            touchdown_alt: 10.0,
            target: TargetPoint::new(28.573_469, -80.651_070),
        }
    }
}

impl GuidanceConfig {
    /// Builds the default configuration with `GNC_*` environment overrides applied.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.coarse_samples = env_parse("GNC_COARSE_SAMPLES", cfg.coarse_samples);
        cfg.solver_tolerance_s = env_parse("GNC_SOLVER_TOLERANCE_S", cfg.solver_tolerance_s);
        cfg.correction_step_dv = env_parse("GNC_CORRECTION_STEP_DV", cfg.correction_step_dv);
        cfg.max_correction_iters = env_parse("GNC_MAX_CORRECTION_ITERS", cfg.max_correction_iters);
        cfg.deorbit_dv_divisor = env_parse("GNC_DEORBIT_DV_DIVISOR", cfg.deorbit_dv_divisor);
        cfg.deorbit_lead_time_s = env_parse("GNC_DEORBIT_LEAD_TIME_S", cfg.deorbit_lead_time_s);
        cfg.hold_gate_alt = env_parse("GNC_HOLD_GATE_ALT", cfg.hold_gate_alt);
        cfg.profile_reference_alt = env_parse("GNC_PROFILE_REF_ALT", cfg.profile_reference_alt);
        cfg.profile_exponent = env_parse("GNC_PROFILE_EXPONENT", cfg.profile_exponent);
        cfg.stability_handoff_alt = env_parse("GNC_HANDOFF_ALT", cfg.stability_handoff_alt);
        cfg.touchdown_alt = env_parse("GNC_TOUCHDOWN_ALT", cfg.touchdown_alt);
        cfg.target = TargetPoint::new(
            env_parse("GNC_TARGET_LAT", cfg.target.lat_deg()),
            env_parse("GNC_TARGET_LON", cfg.target.lon_deg()),
        );
        cfg
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_flight_calibration() {
        let cfg = GuidanceConfig::default();
        assert_eq!(cfg.coarse_samples, 720);
        assert!((cfg.deorbit_dv_divisor - 375.0).abs() < f64::EPSILON);
        assert!((cfg.profile_exponent - 1.0).abs() < f64::EPSILON);
        assert!((cfg.stability_handoff_alt - 250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn env_override_wins() {
        unsafe { std::env::set_var("GNC_PROFILE_EXPONENT", "1.5") };
        let cfg = GuidanceConfig::from_env();
        assert!((cfg.profile_exponent - 1.5).abs() < f64::EPSILON);
        unsafe { std::env::remove_var("GNC_PROFILE_EXPONENT") };
    }
}
