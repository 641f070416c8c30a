use super::PhaseOutcome;
use super::correction::CorrectionPhase;
use super::deorbit::DeOrbitPhase;
use crate::config::GuidanceConfig;
use crate::console::recording::RecordingSink;
use crate::console::{StatusSink, StatusUpdate};
use crate::flight_control::FlightComputer;
use crate::flight_control::test_support::{FakeClock, FakeTelemetry, PointOrbit, RecordingBus};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

async fn flight_computer(
    bus: Arc<RecordingBus>,
    clock: Arc<FakeClock>,
) -> Arc<RwLock<FlightComputer>> {
    Arc::new(RwLock::new(
        FlightComputer::new(
            Arc::new(FakeTelemetry::constant(FakeTelemetry::on_orbit())),
            bus,
            clock,
        )
        .await,
    ))
}

fn trial_evaluations(sink: &RecordingSink) -> Vec<(u32, bool)> {
    sink.updates()
        .iter()
        .filter_map(|u| match u {
            StatusUpdate::TrialEvaluated { iteration, improved, .. } => Some((*iteration, *improved)),
            _ => None,
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn correction_stops_on_first_non_improving_trial() {
    let bus = Arc::new(RecordingBus::new());
    bus.set_current_orbit(PointOrbit::at_distance(10_000.0));
    // Miss distance improves twice, then strictly worsens.
    bus.script_node_orbits(vec![
        PointOrbit::at_distance(8_000.0),
        PointOrbit::at_distance(5_000.0),
        PointOrbit::at_distance(6_000.0),
    ]);
    bus.script_remaining_dv(&[9.0]);
    bus.script_eta(&[0.0]);
    let sink = Arc::new(RecordingSink::default());
    let f_cont = flight_computer(Arc::clone(&bus), Arc::new(FakeClock::at(0.0))).await;

    let phase = CorrectionPhase::new(
        f_cont,
        &GuidanceConfig::default(),
        Arc::clone(&sink) as Arc<dyn StatusSink>,
    );
    let outcome = phase.run(&CancellationToken::new()).await.unwrap();

    assert_eq!(outcome, PhaseOutcome::Complete);
    let trials = trial_evaluations(&sink);
    assert_eq!(trials, vec![(1, true), (2, true), (3, false)]);
    assert_eq!(bus.node_count(), 0, "rejected trial node must be removed");
    // RCS: on at entry, re-enabled after each of the two burns, off at exit.
    assert_eq!(bus.rcs_log(), vec![true, true, true, false]);
}

#[tokio::test(start_paused = true)]
async fn correction_exhausts_iteration_cap_while_improving() {
    let bus = Arc::new(RecordingBus::new());
    bus.set_current_orbit(PointOrbit::at_distance(10_000.0));
    bus.script_node_orbits(vec![
        PointOrbit::at_distance(9_000.0),
        PointOrbit::at_distance(8_000.0),
        PointOrbit::at_distance(7_000.0),
        PointOrbit::at_distance(6_000.0),
        PointOrbit::at_distance(5_000.0),
    ]);
    bus.script_remaining_dv(&[9.0]);
    bus.script_eta(&[0.0]);
    let sink = Arc::new(RecordingSink::default());
    let f_cont = flight_computer(Arc::clone(&bus), Arc::new(FakeClock::at(0.0))).await;

    let phase = CorrectionPhase::new(
        f_cont,
        &GuidanceConfig::default(),
        Arc::clone(&sink) as Arc<dyn StatusSink>,
    );
    let outcome = phase.run(&CancellationToken::new()).await.unwrap();

    assert_eq!(outcome, PhaseOutcome::Complete);
    assert_eq!(trial_evaluations(&sink).len(), 5);
    assert!(trial_evaluations(&sink).iter().all(|(_, improved)| *improved));
}

#[tokio::test(start_paused = true)]
async fn correction_trial_magnitudes_grow_monotonically() {
    let bus = Arc::new(RecordingBus::new());
    bus.set_current_orbit(PointOrbit::at_distance(10_000.0));
    bus.script_node_orbits(vec![
        PointOrbit::at_distance(9_000.0),
        PointOrbit::at_distance(8_000.0),
        PointOrbit::at_distance(12_000.0),
    ]);
    bus.script_remaining_dv(&[9.0]);
    bus.script_eta(&[0.0]);
    let sink = Arc::new(RecordingSink::default());
    let f_cont = flight_computer(Arc::clone(&bus), Arc::new(FakeClock::at(0.0))).await;

    CorrectionPhase::new(f_cont, &GuidanceConfig::default(), sink)
        .run(&CancellationToken::new())
        .await
        .unwrap();

    let planned: Vec<f64> = bus.added_log().iter().map(|(_, dv)| *dv).collect();
    assert_eq!(planned, vec![-50.0, -100.0, -150.0]);
}

#[tokio::test(start_paused = true)]
async fn deorbit_warps_to_the_pass_and_burns_scaled_dv() {
    let bus = Arc::new(RecordingBus::new());
    bus.set_current_orbit(PointOrbit::at_distance(7_500.0));
    bus.script_remaining_dv(&[9.0]);
    bus.script_eta(&[0.3]);
    let clock = Arc::new(FakeClock::at(0.0));
    let sink = Arc::new(RecordingSink::default());
    let f_cont = flight_computer(Arc::clone(&bus), Arc::clone(&clock)).await;

    let phase = DeOrbitPhase::new(f_cont, &GuidanceConfig::default(), sink);
    let outcome = phase.run(&CancellationToken::new()).await.unwrap();

    assert_eq!(outcome, PhaseOutcome::Complete);
    assert_eq!(clock.warp_log(), vec![0.0]);
    // 7500 m miss over the default divisor of 375 plans a 20 m/s braking burn
    // 60 s out, stored with the negated sign.
    assert_eq!(bus.added_log(), vec![(60.0, -20.0)]);
    assert_eq!(bus.node_count(), 0, "executed node must be removed");
    assert!((bus.max_commanded_throttle() - 1.0).abs() < f64::EPSILON);
}
