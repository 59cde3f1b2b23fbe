//! Synthetic CPU load metric.
//!
//! A background task perturbs one shared usage value on a fixed tick so the
//! metric hovers near an idle equilibrium without any real workload behind
//! it. Collaborators read the value or add spikes concurrently with the
//! loop.

use rand::Rng;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Approximate usage at idle; the walk is biased toward this value.
pub const DEFAULT_EQUILIBRIUM: f64 = 0.10;

/// Interval between walk steps.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1000);

/// Signal type for stopping the simulator loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SimSignal {
    Run,
    Stop,
}

/// Owns the shared usage value and the timer loop that perturbs it.
///
/// Lifecycle: IDLE after [`LoadSimulator::new`] (usage rests at the
/// equilibrium), RUNNING after [`LoadSimulator::start`], STOPPED after
/// [`LoadSimulator::stop`]. The loop reacts to the stop signal within one
/// tick and performs no mutation afterward. STOPPED is terminal.
#[derive(Debug)]
pub struct LoadSimulator {
    usage: Arc<Mutex<f64>>,
    equilibrium: f64,
    tick_interval: Duration,
    shutdown_tx: watch::Sender<SimSignal>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl LoadSimulator {
    #[must_use]
    pub fn new(equilibrium: f64, tick_interval: Duration) -> Self {
        let (shutdown_tx, _) = watch::channel(SimSignal::Run);
        Self {
            usage: Arc::new(Mutex::new(equilibrium)),
            equilibrium,
            tick_interval,
            shutdown_tx,
            task: Mutex::new(None),
        }
    }

    /// Launch the timer loop. A second `start` while the loop is already
    /// running is a no-op, and STOPPED is terminal: `start` after
    /// [`LoadSimulator::stop`] never respawns the loop.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) {
        let mut task = lock_ignoring_poison(&self.task);
        if task.is_some() {
            warn!("Load simulator already running; ignoring start");
            return;
        }
        if *self.shutdown_tx.borrow() == SimSignal::Stop {
            warn!("Load simulator is stopped; ignoring start");
            return;
        }
        let usage = Arc::clone(&self.usage);
        let equilibrium = self.equilibrium;
        let tick_interval = self.tick_interval;
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        *task = Some(tokio::spawn(async move {
            let mut ticker = interval(tick_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // interval fires immediately; consume the zeroth tick so the
            // first step lands one full interval after start.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        apply_tick(&usage, equilibrium);
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() == SimSignal::Stop {
                            break;
                        }
                    }
                }
            }
            debug!("Load simulator loop exited");
        }));
        info!(
            "Load simulator started (equilibrium {:.2}, tick {:?})",
            self.equilibrium, self.tick_interval
        );
    }

    /// Signal the loop to stop and wait for it to exit.
    pub async fn stop(&self) {
        if self.shutdown_tx.send(SimSignal::Stop).is_err() {
            debug!("Load simulator loop already gone");
        }
        let task = lock_ignoring_poison(&self.task).take();
        if let Some(handle) = task {
            if let Err(e) = handle.await {
                warn!("Load simulator task failed: {e}");
            }
        }
        info!("Load simulator stopped");
    }

    /// Current usage value. Safe to call concurrently with the loop.
    #[must_use]
    pub fn usage(&self) -> f64 {
        *lock_ignoring_poison(&self.usage)
    }

    /// Atomically add `delta` to the usage value, clamped to `[0, 1]`.
    ///
    /// Used by the timer loop and by collaborators simulating load spikes;
    /// the lock is held only for the arithmetic, so concurrent increments
    /// never lose updates.
    pub fn increment_usage(&self, delta: f64) {
        let mut usage = lock_ignoring_poison(&self.usage);
        *usage = clamp_usage(*usage + delta);
    }
}

/// One walk step, applied under the same lock used by `increment_usage`.
/// The bias is recomputed from the current value on every tick so the walk
/// stays mean-reverting; freezing it once before the loop would degenerate
/// into a pure random walk whenever the value starts at the equilibrium.
fn apply_tick(usage: &Mutex<f64>, equilibrium: f64) {
    let roll = rand::thread_rng().gen_range(0..3u32);
    let mut value = lock_ignoring_poison(usage);
    let bias = reversion_bias(equilibrium, *value);
    *value = clamp_usage(*value + step_delta(roll, bias));
}

/// Direction pulling usage back toward the equilibrium: +1 below, -1 above,
/// 0 at rest. Not `f64::signum`, which maps 0.0 to 1.0 and would bias the
/// walk upward at the equilibrium.
fn reversion_bias(equilibrium: f64, usage: f64) -> f64 {
    if usage < equilibrium {
        1.0
    } else if usage > equilibrium {
        -1.0
    } else {
        0.0
    }
}

/// Step for one tick: `(roll + bias - 1) / 20` with `roll` drawn from
/// `{0, 1, 2}`, i.e. {-0.05, 0, +0.05} shifted by the bias.
fn step_delta(roll: u32, bias: f64) -> f64 {
    (f64::from(roll) + bias - 1.0) / 20.0
}

// The value is documented as a positive double less than 1; the walk and
// external spikes are clamped so it actually stays in that range.
fn clamp_usage(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

fn lock_ignoring_poison<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_starts_at_equilibrium() {
        let sim = LoadSimulator::new(DEFAULT_EQUILIBRIUM, DEFAULT_TICK_INTERVAL);
        assert!((sim.usage() - DEFAULT_EQUILIBRIUM).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reversion_bias_below_equilibrium_is_positive() {
        assert!((reversion_bias(0.10, 0.05) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reversion_bias_above_equilibrium_is_negative() {
        assert!((reversion_bias(0.10, 0.50) + 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reversion_bias_at_equilibrium_is_zero() {
        assert!(reversion_bias(0.10, 0.10).abs() < f64::EPSILON);
    }

    #[test]
    fn test_step_delta_range_with_bias() {
        // Below equilibrium (bias +1): steps are {0, +0.05, +0.10}.
        assert!((step_delta(0, 1.0) - 0.0).abs() < f64::EPSILON);
        assert!((step_delta(2, 1.0) - 0.10).abs() < f64::EPSILON);
        // Above equilibrium (bias -1): steps are {-0.10, -0.05, 0}.
        assert!((step_delta(0, -1.0) + 0.10).abs() < f64::EPSILON);
        assert!((step_delta(2, -1.0) - 0.0).abs() < f64::EPSILON);
        // At equilibrium (bias 0): unbiased {-0.05, 0, +0.05}.
        assert!((step_delta(0, 0.0) + 0.05).abs() < f64::EPSILON);
        assert!((step_delta(1, 0.0) - 0.0).abs() < f64::EPSILON);
        assert!((step_delta(2, 0.0) - 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn test_increment_clamps_to_unit_interval() {
        let sim = LoadSimulator::new(0.10, DEFAULT_TICK_INTERVAL);
        sim.increment_usage(5.0);
        assert!((sim.usage() - 1.0).abs() < f64::EPSILON);
        sim.increment_usage(-3.0);
        assert!(sim.usage().abs() < f64::EPSILON);
    }

    #[test]
    fn test_long_run_average_hovers_near_equilibrium() {
        // Simulate the step function directly for 10k ticks starting well
        // above the equilibrium; the mean-reverting walk must pull the
        // long-run average down near it.
        let mut rng = rand::thread_rng();
        let equilibrium = 0.10;
        let mut usage = 0.90;
        let mut sum = 0.0;
        for _ in 0..10_000 {
            let roll = rng.gen_range(0..3u32);
            let bias = reversion_bias(equilibrium, usage);
            usage = clamp_usage(usage + step_delta(roll, bias));
            sum += usage;
        }
        let average = sum / 10_000.0;
        assert!(
            (average - equilibrium).abs() < 0.1,
            "long-run average {average} strayed from equilibrium"
        );
    }
}
