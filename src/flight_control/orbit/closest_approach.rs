use crate::flight_control::GuidanceError;
use crate::vehicle::orbit::{OrbitView, TargetPoint};
use itertools::Itertools;
use nalgebra::Vector3;

/// Search parameters of [`find_closest_approach`].
#[derive(Debug, Clone, Copy)]
pub struct SolverParams {
    /// Uniform samples per orbital period in the coarse phase.
    pub coarse_samples: u32,
    /// Refinement stops once the pattern-search step is at or below this, seconds.
    pub tolerance_s: f64,
}

impl Default for SolverParams {
    fn default() -> Self { Self { coarse_samples: 720, tolerance_s: 1.0 } }
}

/// Result of one closest-approach search. Produced fresh on every call.
#[derive(Debug, Clone, Copy)]
pub struct ClosestApproachResult {
    /// Universal time of the found minimum, seconds.
    pub ut: f64,
    /// Seconds between `now` and the found minimum.
    pub time_from_now: f64,
    /// Chord distance at the minimum, m.
    pub distance: f64,
}

/// Finds the time within one orbital period from `now` at which the straight-line
/// distance between the orbiting vehicle and the fixed surface `target` is smallest.
///
/// Two-phase search: a uniform coarse scan over one full period seeds a
/// five-point pattern search that repeatedly halves its step until it is below
/// `tolerance_s`. The refinement only ever improves on the coarse minimum, but
/// it converges to a local minimum near the seed; the coarse density has to be
/// high enough relative to the period not to skip the true closest pass.
///
/// There is no "no solution" outcome. An orbit that never comes near the
/// target still yields its least-bad minimum.
pub fn find_closest_approach(
    orbit: &dyn OrbitView,
    target: TargetPoint,
    now: f64,
    params: &SolverParams,
) -> Result<ClosestApproachResult, GuidanceError> {
    let period = orbit.period();
    if !period.is_finite() || period <= 0.0 {
        return Err(GuidanceError::InvalidPeriod(period));
    }
    if !params.tolerance_s.is_finite() || params.tolerance_s <= 0.0 {
        return Err(GuidanceError::InvalidTolerance(params.tolerance_s));
    }
    if params.coarse_samples == 0 {
        return Err(GuidanceError::NoCoarseSamples);
    }
    if !target.is_finite() {
        return Err(GuidanceError::InvalidTarget);
    }

    let frame = orbit.body().reference_frame();
    let target_pos = orbit.body().surface_position(target, frame);

    let chord = |ut: f64| -> Result<f64, GuidanceError> {
        let d = (orbit.position_at(ut, frame) - target_pos).norm();
        if d.is_finite() { Ok(d) } else { Err(GuidanceError::NonFiniteSample(ut)) }
    };

    // Coarse scan, endpoints inclusive.
    let step = period / f64::from(params.coarse_samples);
    let samples: Vec<f64> = (0..=params.coarse_samples)
        .map(|i| chord(now + f64::from(i) * step))
        .try_collect()?;
    let best_i = samples
        .iter()
        .position_min_by(|a, b| a.total_cmp(b))
        .unwrap_or(0);
    let mut best_t = now + best_i as f64 * step;
    let mut best_d = samples[best_i];

    // Five-point pattern search around the seed, halving the step each round.
    let mut delta = step;
    while delta > params.tolerance_s {
        for offset in [-2.0, -1.0, 0.0, 1.0, 2.0] {
            let t = best_t + offset * delta;
            let d = chord(t)?;
            if d < best_d {
                best_d = d;
                best_t = t;
            }
        }
        delta *= 0.5;
    }

    Ok(ClosestApproachResult { ut: best_t, time_from_now: best_t - now, distance: best_d })
}

/// Chord distance between the vehicle and `target` at `ut`, m.
pub fn chord_distance_at(orbit: &dyn OrbitView, target: TargetPoint, ut: f64) -> f64 {
    let frame = orbit.body().reference_frame();
    let target_pos: Vector3<f64> = orbit.body().surface_position(target, frame);
    (orbit.position_at(ut, frame) - target_pos).norm()
}
