#![allow(clippy::unwrap_used, clippy::expect_used)]

use hostsimd::{LoadSimulator, DEFAULT_EQUILIBRIUM};
use std::sync::Arc;
use std::time::Duration;

// Long idle interval so a simulator under test never ticks on its own.
const IDLE: Duration = Duration::from_secs(3600);

#[tokio::test]
async fn test_usage_rests_at_equilibrium_before_start() {
    let sim = LoadSimulator::new(DEFAULT_EQUILIBRIUM, IDLE);
    assert!((sim.usage() - DEFAULT_EQUILIBRIUM).abs() < f64::EPSILON);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_increments_lose_no_updates() {
    let sim = Arc::new(LoadSimulator::new(0.10, IDLE));

    let mut handles = Vec::new();
    for _ in 0..100 {
        let sim = Arc::clone(&sim);
        handles.push(tokio::spawn(async move {
            sim.increment_usage(0.001);
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    // 0.10 + 100 * 0.001, exactly, up to float addition error.
    assert!((sim.usage() - 0.20).abs() < 1e-9, "usage = {}", sim.usage());
}

#[tokio::test]
async fn test_running_loop_perturbs_usage_toward_equilibrium() {
    let sim = LoadSimulator::new(0.10, Duration::from_millis(5));
    // Spike well above the equilibrium; every step from up here is <= 0.
    sim.increment_usage(0.80);
    assert!((sim.usage() - 0.90).abs() < 1e-9);

    sim.start();
    tokio::time::sleep(Duration::from_millis(250)).await;
    let after = sim.usage();
    sim.stop().await;

    assert!(after < 0.90, "usage did not decay: {after}");
    assert!(after >= 0.0);
}

#[tokio::test]
async fn test_stop_halts_mutation_within_one_tick() {
    let sim = LoadSimulator::new(0.10, Duration::from_millis(10));
    sim.start();
    tokio::time::sleep(Duration::from_millis(50)).await;
    sim.stop().await;

    let frozen = sim.usage();
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!((sim.usage() - frozen).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_start_after_stop_does_not_resume_mutation() {
    let sim = LoadSimulator::new(0.10, Duration::from_millis(5));
    sim.start();
    sim.stop().await;

    // Push the value away from the equilibrium; a resurrected loop would
    // start walking it back down.
    sim.increment_usage(0.50);
    let frozen = sim.usage();
    sim.start();
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert!(
        (sim.usage() - frozen).abs() < f64::EPSILON,
        "stopped simulator mutated usage: {frozen} -> {}",
        sim.usage()
    );
}

#[tokio::test]
async fn test_second_start_is_a_noop() {
    let sim = LoadSimulator::new(0.10, Duration::from_millis(10));
    sim.start();
    sim.start();
    sim.stop().await;
}

#[tokio::test]
async fn test_increments_are_clamped_to_unit_interval() {
    let sim = LoadSimulator::new(0.10, IDLE);
    sim.increment_usage(9.0);
    assert!((sim.usage() - 1.0).abs() < f64::EPSILON);
    sim.increment_usage(-9.0);
    assert!(sim.usage().abs() < f64::EPSILON);
}
