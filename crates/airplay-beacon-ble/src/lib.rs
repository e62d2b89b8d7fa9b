//! Bluetooth Low Energy advertising drivers for the AirPlay beacon
//!
//! This crate implements the `BeaconDriver` trait from `airplay-beacon-core`
//! on top of each platform's advertising API.
//!
//! ## Platform Support
//!
//! - **Linux**: BlueZ over DBus via the `bluer` crate. Advertising intervals
//!   are honored; orphaned state files can be deleted and port changes are
//!   tracked while advertising.
//! - **Windows**: `BluetoothLEAdvertisementPublisher` via the `windows` crate.
//!   The publisher has no interval controls, open files cannot be deleted and
//!   port changes are only picked up after the server stops.
//! - **Other platforms**: no advertising; only the dry-run driver is available.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use airplay_beacon_ble::PlatformDriver;
//!
//! # async fn example() -> Result<(), airplay_beacon_ble::DriverError> {
//! let driver = PlatformDriver::probe().await?;
//! let capabilities = driver.capabilities();
//! let schedule = driver.schedule();
//! # let _ = (capabilities, schedule);
//! # Ok(())
//! # }
//! ```

mod driver;
mod error;

// Public API exports
pub use driver::dry_run::DryRunDriver;
pub use driver::PlatformDriver;
pub use error::DriverError;

#[cfg(target_os = "linux")]
pub use driver::bluez::BluezDriver;
#[cfg(target_os = "windows")]
pub use driver::winrt::WinRtDriver;
