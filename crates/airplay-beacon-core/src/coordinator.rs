//! Poll scheduler driving the state machine
//!
//! One coordinator owns one beacon. It runs the observe tick on a slow timer
//! and the apply tick on a fast one inside a single `select!` loop, so the two
//! never overlap and no state is shared across tasks.

use std::future::Future;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::config::{BeaconConfig, PlatformCapabilities, TickSchedule};
use crate::driver::BeaconDriver;
use crate::liveness::{ProcessTable, SystemProcessTable};
use crate::machine::{CoordinatorState, Observation, Transition};

// ----------------------------------------------------------------------------
// Coordinator
// ----------------------------------------------------------------------------

/// Keeps one beacon in step with the AirPlay server's state file
pub struct Coordinator<D, P = SystemProcessTable> {
    config: BeaconConfig,
    capabilities: PlatformCapabilities,
    state: CoordinatorState,
    driver: D,
    processes: P,
}

impl<D: BeaconDriver> Coordinator<D, SystemProcessTable> {
    /// Coordinator checking liveness against the real process table
    pub fn new(config: BeaconConfig, capabilities: PlatformCapabilities, driver: D) -> Self {
        Self::with_process_table(config, capabilities, driver, SystemProcessTable::new())
    }
}

impl<D: BeaconDriver, P: ProcessTable> Coordinator<D, P> {
    pub fn with_process_table(
        config: BeaconConfig,
        capabilities: PlatformCapabilities,
        driver: D,
        processes: P,
    ) -> Self {
        Self {
            config,
            capabilities,
            state: CoordinatorState::new(),
            driver,
            processes,
        }
    }

    pub fn state(&self) -> &CoordinatorState {
        &self.state
    }

    /// Slow tick: re-derive intent from the state file
    pub fn observe(&mut self) -> Observation {
        let observation = self.state.observe(
            &self.config.state_path,
            &mut self.processes,
            &self.capabilities,
        );
        debug!("observe: {:?} -> {:?}", observation, self.state.pending());
        observation
    }

    /// Fast tick: apply any pending transition
    pub async fn apply(&mut self) -> Option<Transition> {
        self.state.apply(&mut self.driver, &self.config).await
    }

    /// Run both ticks until `shutdown` resolves.
    ///
    /// The beacon is left as it is on shutdown; no final `stop` is issued.
    pub async fn run<F>(&mut self, schedule: TickSchedule, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut slow = interval(schedule.slow());
        slow.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut fast = interval(schedule.fast());
        fast.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tokio::pin!(shutdown);

        info!(
            "Watching '{}' every {:?} (applying every {:?}) for beacon {}",
            self.config.state_path.display(),
            schedule.slow(),
            schedule.fast(),
            self.config.index
        );

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Shutdown requested, leaving beacon loop");
                    break;
                }
                _ = slow.tick() => {
                    self.observe();
                }
                _ = fast.tick() => {
                    self.apply().await;
                }
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
