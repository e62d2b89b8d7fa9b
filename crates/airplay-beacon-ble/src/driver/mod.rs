//! Platform detection and driver dispatch

#[cfg(target_os = "linux")]
pub mod bluez;
pub mod dry_run;
#[cfg(target_os = "windows")]
pub mod winrt;

use airplay_beacon_core::{AdvertisementRequest, BeaconDriver, PlatformCapabilities, TickSchedule};
use tracing::info;

use crate::error::DriverError;

// ----------------------------------------------------------------------------
// Platform Driver
// ----------------------------------------------------------------------------

/// Driver for the platform this binary was built for
pub enum PlatformDriver {
    #[cfg(target_os = "linux")]
    Bluez(bluez::BluezDriver),
    #[cfg(target_os = "windows")]
    WinRt(winrt::WinRtDriver),
    DryRun(dry_run::DryRunDriver),
}

impl PlatformDriver {
    /// Connect to the platform advertising API.
    ///
    /// Runs once at startup; an error means no beacon can be advertised.
    pub async fn probe() -> Result<Self, DriverError> {
        #[cfg(target_os = "linux")]
        {
            let driver = bluez::BluezDriver::connect().await?;
            info!("Using BlueZ adapter {}", driver.adapter_name());
            Ok(Self::Bluez(driver))
        }
        #[cfg(target_os = "windows")]
        {
            let driver = winrt::WinRtDriver::connect().await?;
            info!("Using WinRT Bluetooth LE advertisement publisher");
            Ok(Self::WinRt(driver))
        }
        #[cfg(not(any(target_os = "linux", target_os = "windows")))]
        {
            Err(DriverError::Unsupported)
        }
    }

    /// Driver that only logs what it would advertise
    pub fn dry_run() -> Self {
        info!("Dry run: advertisements will be logged, not broadcast");
        Self::DryRun(dry_run::DryRunDriver::new())
    }

    /// Platform behavior the coordinator has to account for
    pub fn capabilities(&self) -> PlatformCapabilities {
        match self {
            #[cfg(target_os = "linux")]
            Self::Bluez(_) => PlatformCapabilities::bluez(),
            #[cfg(target_os = "windows")]
            Self::WinRt(_) => PlatformCapabilities::winrt(),
            Self::DryRun(_) => native_capabilities(),
        }
    }

    /// Polling periods suited to this driver
    pub fn schedule(&self) -> TickSchedule {
        match self.capabilities() {
            caps if caps == PlatformCapabilities::winrt() => TickSchedule::winrt(),
            _ => TickSchedule::bluez(),
        }
    }
}

fn native_capabilities() -> PlatformCapabilities {
    if cfg!(target_os = "windows") {
        PlatformCapabilities::winrt()
    } else {
        PlatformCapabilities::bluez()
    }
}

#[async_trait::async_trait]
impl BeaconDriver for PlatformDriver {
    async fn start(&mut self, request: &AdvertisementRequest) -> bool {
        match self {
            #[cfg(target_os = "linux")]
            Self::Bluez(ref mut driver) => driver.start(request).await,
            #[cfg(target_os = "windows")]
            Self::WinRt(ref mut driver) => driver.start(request).await,
            Self::DryRun(ref mut driver) => driver.start(request).await,
        }
    }

    async fn stop(&mut self) {
        match self {
            #[cfg(target_os = "linux")]
            Self::Bluez(ref mut driver) => driver.stop().await,
            #[cfg(target_os = "windows")]
            Self::WinRt(ref mut driver) => driver.stop().await,
            Self::DryRun(ref mut driver) => driver.stop().await,
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
