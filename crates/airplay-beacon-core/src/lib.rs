//! AirPlay BLE Beacon Coordinator
//!
//! This crate keeps a Bluetooth LE "AirPlay service discovery" advertisement in
//! step with the lifecycle of an AirPlay server running in another process. The
//! server announces itself through a small binary state file; the coordinator
//! polls that file, verifies that the owning process is still alive, reclaims
//! files left behind by crashed servers and drives a [`BeaconDriver`] to start or
//! stop the advertisement.
//!
//! ## Architecture
//!
//! - [`record`] - Binary state-file codec
//! - [`liveness`] - Process table lookups (is the owner alive, does its name match)
//! - [`reclaim`] - Orphaned state-file removal
//! - [`machine`] - Pending-transition state machine (slow observe / fast apply ticks)
//! - [`driver`] - Beacon driver trait and advertisement request
//! - [`payload`] - AirPlay manufacturer-data payload
//! - [`coordinator`] - Poll scheduler wiring the pieces onto two timers
//!
//! The crate never talks to a radio itself; platform drivers live in
//! `airplay-beacon-ble`.

// ----------------------------------------------------------------------------
// Module Declarations
// ----------------------------------------------------------------------------

pub mod config;
pub mod coordinator;
pub mod driver;
pub mod error;
pub mod liveness;
pub mod machine;
pub mod payload;
pub mod reclaim;
pub mod record;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// ----------------------------------------------------------------------------
// Public API
// ----------------------------------------------------------------------------

pub use config::{
    check_adv_interval, BeaconConfig, PlatformCapabilities, TickSchedule, ADV_INTERVAL_MAX_MS,
    ADV_INTERVAL_MIN_MS,
};
pub use coordinator::Coordinator;
pub use driver::{AdvertisementRequest, BeaconDriver};
pub use error::{BeaconError, ConfigError, DecodeError, Result};
pub use liveness::{ProcessTable, SystemProcessTable};
pub use machine::{CoordinatorState, Observation, Pending};
pub use payload::{manufacturer_payload, APPLE_COMPANY_ID};
pub use reclaim::{reclaim_orphan, ReclaimOutcome};
pub use record::StateRecord;
