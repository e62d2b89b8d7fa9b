//! Error types for BLE beacon drivers

use airplay_beacon_core::BeaconError;
use thiserror::Error;

// ----------------------------------------------------------------------------
// Error Types
// ----------------------------------------------------------------------------

/// Errors raised by the platform advertising APIs
#[derive(Error, Debug)]
pub enum DriverError {
    #[cfg(target_os = "linux")]
    #[error("BlueZ error: {0}")]
    Bluez(#[from] bluer::Error),

    #[cfg(target_os = "windows")]
    #[error("WinRT error: {0}")]
    WinRt(#[from] windows::core::Error),

    #[error("BLE adapter not available: {0}")]
    AdapterNotAvailable(String),

    #[error("BLE advertising is not supported on this platform")]
    Unsupported,
}

impl DriverError {
    /// Operator-facing hint on how to get a working driver
    pub fn hint(&self) -> &'static str {
        match self {
            #[cfg(target_os = "linux")]
            Self::Bluez(_) => "make sure bluetoothd is running and the user may access the system DBus",
            #[cfg(target_os = "windows")]
            Self::WinRt(_) => "make sure Bluetooth is switched on in Windows settings",
            Self::AdapterNotAvailable(_) => "attach or enable a Bluetooth LE adapter",
            Self::Unsupported => "run with --dry-run to exercise the coordinator without a radio",
        }
    }
}

impl From<DriverError> for BeaconError {
    fn from(err: DriverError) -> Self {
        BeaconError::DriverUnavailable(format!("{} ({})", err, err.hint()))
    }
}
