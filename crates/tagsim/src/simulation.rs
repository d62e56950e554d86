//! Simulation Loop
//!
//! A single background task that publishes every item once, then advances the
//! ramp, random and sine items once per tick. Shutdown is cooperative: the
//! stop request is only observed after the current sleep, and the caller waits
//! a bounded time for the loop to report completion.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tagsim_types::{Quality, VariantValue};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::address_space::SimulatedItems;
use crate::config::SimulationConfig;
use crate::registry::Registry;
use crate::types::{Error, Result, SimulationState};

/// Number of ticks in one full sine period
pub const SINE_PERIOD_TICKS: u64 = 40;

/// Phase advance per tick, 2π / 40
const SINE_STEP: f64 = 0.1570796327;

/// Sine sample for a given tick count
pub fn sine_at(tick: u64) -> f64 {
    ((tick % SINE_PERIOD_TICKS) as f64 * SINE_STEP).sin()
}

// ─────────────────────────────────────────────────────────────────────────────
// Simulator
// ─────────────────────────────────────────────────────────────────────────────

/// Values published by one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickValues {
    pub tick: u64,
    pub ramp: i32,
    pub random: i32,
    pub sine: f64,
}

/// Per-tick state of the simulated items
pub struct Simulator {
    items: SimulatedItems,
    tick: u64,
    ramp: i32,
    rng: StdRng,
}

impl Simulator {
    pub fn new(items: SimulatedItems) -> Self {
        Self::with_rng(items, StdRng::from_entropy())
    }

    pub fn with_rng(items: SimulatedItems, rng: StdRng) -> Self {
        Self {
            items,
            tick: 0,
            ramp: 0,
            rng,
        }
    }

    /// Number of ticks performed so far
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Mark every item Good with a fresh timestamp, keeping current values
    pub fn publish_all(&self, registry: &Registry, now: DateTime<Utc>) {
        for item in registry.iter() {
            if let Err(e) = registry.touch(item.handle(), Quality::Good, now) {
                tracing::warn!(item = %item.name(), error = %e, "Initial publish skipped");
            }
        }
    }

    /// Advance the simulated items by one tick
    ///
    /// The ramp counter wraps at `i32::MAX`. Update failures are logged and
    /// skipped so one bad item never stops the cycle.
    pub fn step(&mut self, registry: &Registry, now: DateTime<Utc>) -> TickValues {
        self.tick += 1;
        self.ramp = self.ramp.wrapping_add(1);

        let values = TickValues {
            tick: self.tick,
            ramp: self.ramp,
            random: self.rng.gen_range(0..i32::MAX),
            sine: sine_at(self.tick),
        };

        let updates = [
            (self.items.ramp, VariantValue::I32(values.ramp)),
            (self.items.random, VariantValue::I32(values.random)),
            (self.items.sine, VariantValue::F64(values.sine)),
        ];
        for (handle, value) in updates {
            if let Err(e) = registry.update_value(handle, value, Quality::Good, now) {
                tracing::warn!(%handle, error = %e, "Simulation update skipped");
            }
        }

        tracing::trace!(tick = values.tick, ramp = values.ramp, sine = values.sine, "Simulation tick");
        values
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Simulation Loop Task
// ─────────────────────────────────────────────────────────────────────────────

/// Handle to the running simulation task
pub struct SimulationLoop {
    state: Arc<AtomicU8>,
    join_handle: Option<JoinHandle<()>>,
    done_rx: Option<oneshot::Receiver<()>>,
    shutdown_timeout: Duration,
}

impl SimulationLoop {
    /// Spawn the loop on the current tokio runtime. It starts in `Running`.
    pub fn spawn(registry: Arc<Registry>, items: SimulatedItems, config: &SimulationConfig) -> Self {
        Self::spawn_with(registry, Simulator::new(items), config)
    }

    /// Spawn the loop around a prepared simulator
    pub fn spawn_with(registry: Arc<Registry>, simulator: Simulator, config: &SimulationConfig) -> Self {
        let state = Arc::new(AtomicU8::new(SimulationState::Running as u8));
        let (done_tx, done_rx) = oneshot::channel();
        let period = config.tick_period();

        let join_handle = tokio::spawn(run_simulation(
            simulator,
            registry,
            Arc::clone(&state),
            period,
            done_tx,
        ));

        tracing::info!(period_ms = period.as_millis() as u64, "Simulation started");

        Self {
            state,
            join_handle: Some(join_handle),
            done_rx: Some(done_rx),
            shutdown_timeout: config.shutdown_timeout(),
        }
    }

    pub fn state(&self) -> SimulationState {
        SimulationState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Ask the loop to stop after its current sleep
    pub fn request_stop(&self) {
        let _ = self.state.compare_exchange(
            SimulationState::Running as u8,
            SimulationState::StoppingRequested as u8,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
    }

    /// Request a stop and wait up to the shutdown timeout for the loop to finish
    ///
    /// On timeout the task is aborted and [`Error::Timeout`] is returned; the
    /// caller is expected to carry on regardless.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.request_stop();

        let Some(done_rx) = self.done_rx.take() else {
            return Ok(());
        };

        match tokio::time::timeout(self.shutdown_timeout, done_rx).await {
            Ok(_) => {
                if let Some(join_handle) = self.join_handle.take() {
                    if let Err(e) = join_handle.await {
                        tracing::error!(error = ?e, "Simulation task panicked");
                    }
                }
                tracing::info!("Simulation stopped");
                Ok(())
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.shutdown_timeout.as_millis() as u64,
                    "Simulation did not stop in time"
                );
                if let Some(join_handle) = self.join_handle.take() {
                    join_handle.abort();
                }
                self.state.store(SimulationState::Stopped as u8, Ordering::SeqCst);
                Err(Error::Timeout)
            }
        }
    }
}

impl Drop for SimulationLoop {
    fn drop(&mut self) {
        self.request_stop();
    }
}

async fn run_simulation(
    mut simulator: Simulator,
    registry: Arc<Registry>,
    state: Arc<AtomicU8>,
    period: Duration,
    done_tx: oneshot::Sender<()>,
) {
    simulator.publish_all(&registry, Utc::now());
    tracing::debug!(items = registry.len(), "Published initial item state");

    loop {
        simulator.step(&registry, Utc::now());

        tokio::time::sleep(period).await;

        if SimulationState::from_u8(state.load(Ordering::SeqCst)) != SimulationState::Running {
            break;
        }
    }

    state.store(SimulationState::Stopped as u8, Ordering::SeqCst);
    tracing::debug!(ticks = simulator.tick_count(), "Simulation loop exited");
    let _ = done_tx.send(());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address_space::AddressSpace;

    fn fast_config(tick_period_ms: u64) -> SimulationConfig {
        SimulationConfig {
            enabled: true,
            tick_period_ms,
            shutdown_timeout_ms: 5000,
        }
    }

    #[test]
    fn test_sine_range_and_period() {
        for tick in 0..200 {
            let value = sine_at(tick);
            assert!((-1.0..=1.0).contains(&value));
            assert_eq!(value, sine_at(tick + SINE_PERIOD_TICKS));
        }
        assert_eq!(sine_at(0), 0.0);
        assert!((sine_at(10) - 1.0).abs() < 1e-9);
        assert!((sine_at(30) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_step_updates_items() {
        let space = AddressSpace::build().unwrap();
        let mut sim = Simulator::with_rng(space.simulated, StdRng::seed_from_u64(1));
        let now = Utc::now();

        let values = sim.step(&space.registry, now);
        assert_eq!(values.tick, 1);
        assert_eq!(values.ramp, 1);
        assert!(values.random >= 0);

        let ramp = space.registry.read(space.simulated.ramp).unwrap();
        assert_eq!(ramp.value, VariantValue::I32(1));
        assert_eq!(ramp.quality, Quality::Good);
        assert_eq!(ramp.timestamp, now);

        let sine = space.registry.read(space.simulated.sine).unwrap();
        assert_eq!(sine.value, VariantValue::F64(sine_at(1)));

        let random = space.registry.read(space.simulated.random).unwrap();
        assert_eq!(random.value, VariantValue::I32(values.random));
    }

    #[test]
    fn test_consecutive_ticks_increment_ramp() {
        let space = AddressSpace::build().unwrap();
        let mut sim = Simulator::new(space.simulated);

        sim.step(&space.registry, Utc::now());
        let first = space.registry.read(space.simulated.ramp).unwrap().value.as_i64().unwrap();
        sim.step(&space.registry, Utc::now());
        let second = space.registry.read(space.simulated.ramp).unwrap().value.as_i64().unwrap();

        assert_eq!(second, first + 1);
    }

    #[test]
    fn test_ramp_wraps() {
        let space = AddressSpace::build().unwrap();
        let mut sim = Simulator::new(space.simulated);
        sim.ramp = i32::MAX;

        let values = sim.step(&space.registry, Utc::now());
        assert_eq!(values.ramp, i32::MIN);
    }

    #[test]
    fn test_step_skips_missing_items() {
        let registry = Registry::new();
        let items = SimulatedItems {
            ramp: tagsim_types::ItemHandle(1),
            sine: tagsim_types::ItemHandle(2),
            random: tagsim_types::ItemHandle(3),
        };
        let mut sim = Simulator::new(items);

        let values = sim.step(&registry, Utc::now());
        assert_eq!(values.ramp, 1);
        assert_eq!(sim.tick_count(), 1);
    }

    #[test]
    fn test_publish_all_refreshes_timestamps() {
        let space = AddressSpace::build().unwrap();
        let sim = Simulator::new(space.simulated);
        let now = Utc::now() + chrono::Duration::seconds(60);

        sim.publish_all(&space.registry, now);

        for item in space.registry.iter() {
            let state = item.state();
            assert_eq!(state.timestamp, now);
            assert_eq!(state.quality, Quality::Good);
        }
    }

    #[test]
    fn test_publish_all_keeps_client_writes() {
        let space = AddressSpace::build().unwrap();
        let vendor = space.registry.lookup(crate::address_space::VENDOR_ITEM).unwrap();
        let stop = Arc::new(std::sync::atomic::AtomicBool::new(false));

        let publishers: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&space.registry);
                let sim = Simulator::new(space.simulated);
                let stop = Arc::clone(&stop);
                std::thread::spawn(move || {
                    while !stop.load(Ordering::Relaxed) {
                        sim.publish_all(&registry, Utc::now());
                    }
                })
            })
            .collect();

        for i in 0..5_000i32 {
            space
                .registry
                .apply_write(&crate::item::ItemWrite::new(vendor).value(i))
                .unwrap();
            assert_eq!(space.registry.read(vendor).unwrap().value, VariantValue::I32(i));
        }

        stop.store(true, Ordering::Relaxed);
        for t in publishers {
            t.join().unwrap();
        }
    }

    #[tokio::test]
    async fn test_loop_runs_and_stops() {
        let space = AddressSpace::build().unwrap();
        let mut sim_loop = SimulationLoop::spawn(
            Arc::clone(&space.registry),
            space.simulated,
            &fast_config(20),
        );

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(sim_loop.state(), SimulationState::Running);
        let ramp = space.registry.read(space.simulated.ramp).unwrap().value.as_i64().unwrap();
        assert!(ramp >= 2, "ramp only reached {ramp}");

        sim_loop.shutdown().await.unwrap();
        assert_eq!(sim_loop.state(), SimulationState::Stopped);

        let stopped_at = space.registry.read(space.simulated.ramp).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(space.registry.read(space.simulated.ramp).unwrap(), stopped_at);
    }

    #[tokio::test]
    async fn test_shutdown_is_idempotent() {
        let space = AddressSpace::build().unwrap();
        let mut sim_loop = SimulationLoop::spawn(
            Arc::clone(&space.registry),
            space.simulated,
            &fast_config(10),
        );

        sim_loop.shutdown().await.unwrap();
        sim_loop.shutdown().await.unwrap();
        assert_eq!(sim_loop.state(), SimulationState::Stopped);
    }

    #[tokio::test]
    async fn test_shutdown_timeout() {
        let space = AddressSpace::build().unwrap();
        let config = SimulationConfig {
            enabled: true,
            tick_period_ms: 10_000,
            shutdown_timeout_ms: 50,
        };
        let mut sim_loop = SimulationLoop::spawn(Arc::clone(&space.registry), space.simulated, &config);
        tokio::time::sleep(Duration::from_millis(20)).await;

        let result = sim_loop.shutdown().await;
        assert!(matches!(result, Err(Error::Timeout)));
        assert_eq!(sim_loop.state(), SimulationState::Stopped);
    }
}
