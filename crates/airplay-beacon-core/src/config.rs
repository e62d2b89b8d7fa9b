//! Coordinator configuration and platform capabilities

use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

// ----------------------------------------------------------------------------
// Advertising Interval Bounds
// ----------------------------------------------------------------------------

/// Smallest advertising interval BlueZ accepts, in milliseconds
pub const ADV_INTERVAL_MIN_MS: u32 = 100;

/// Largest advertising interval allowed by the BLE core spec, in milliseconds
pub const ADV_INTERVAL_MAX_MS: u32 = 10240;

/// Validate an advertising interval pair.
///
/// Requires `100 <= adv_min <= adv_max <= 10240`. The checks run in that
/// order so the reported error names the first violated bound.
pub fn check_adv_interval(adv_min: u32, adv_max: u32) -> Result<(), ConfigError> {
    if adv_min < ADV_INTERVAL_MIN_MS {
        return Err(ConfigError::AdvMinTooSmall(adv_min));
    }
    if adv_max < adv_min {
        return Err(ConfigError::AdvMaxBelowMin { adv_min, adv_max });
    }
    if adv_max > ADV_INTERVAL_MAX_MS {
        return Err(ConfigError::AdvMaxTooLarge(adv_max));
    }
    Ok(())
}

// ----------------------------------------------------------------------------
// Beacon Configuration
// ----------------------------------------------------------------------------

/// Immutable configuration of one coordinator instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeaconConfig {
    /// IPv4 address of the AirPlay server, embedded in the advertisement
    pub ipv4: Ipv4Addr,
    /// Minimum advertising interval (ms)
    pub adv_min: u32,
    /// Maximum advertising interval (ms)
    pub adv_max: u32,
    /// Distinguishes multiple beacons on one host
    pub index: u32,
    /// Path of the state file written by the AirPlay server
    pub state_path: PathBuf,
}

impl BeaconConfig {
    /// Build a configuration, rejecting invalid advertising intervals
    pub fn new(
        ipv4: Ipv4Addr,
        adv_min: u32,
        adv_max: u32,
        index: u32,
        state_path: impl Into<PathBuf>,
    ) -> Result<Self, ConfigError> {
        check_adv_interval(adv_min, adv_max)?;
        Ok(Self {
            ipv4,
            adv_min,
            adv_max,
            index,
            state_path: state_path.into(),
        })
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }
}

// ----------------------------------------------------------------------------
// Platform Capabilities
// ----------------------------------------------------------------------------

/// Platform differences the state machine has to account for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformCapabilities {
    /// Whether a state file still held open by its writer can be deleted
    pub can_delete_open_files: bool,
    /// Whether a port change is detected while the beacon is running
    pub detects_port_change_while_running: bool,
}

impl PlatformCapabilities {
    /// BlueZ over DBus (Linux)
    pub const fn bluez() -> Self {
        Self {
            can_delete_open_files: true,
            detects_port_change_while_running: true,
        }
    }

    /// WinRT advertisement publisher (Windows)
    pub const fn winrt() -> Self {
        Self {
            can_delete_open_files: false,
            detects_port_change_while_running: false,
        }
    }
}

impl Default for PlatformCapabilities {
    fn default() -> Self {
        Self::bluez()
    }
}

// ----------------------------------------------------------------------------
// Tick Schedule
// ----------------------------------------------------------------------------

/// Periods of the two scheduler ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSchedule {
    slow: Duration,
    fast: Duration,
}

impl TickSchedule {
    /// Create a schedule. The fast (apply) tick may not be slower than the
    /// slow (observe) tick, otherwise pending transitions would pile up.
    pub fn new(slow: Duration, fast: Duration) -> Result<Self, ConfigError> {
        if slow.is_zero() || fast.is_zero() {
            return Err(ConfigError::ZeroTick);
        }
        if fast > slow {
            return Err(ConfigError::TickOrder {
                fast_ms: fast.as_millis(),
                slow_ms: slow.as_millis(),
            });
        }
        Ok(Self { slow, fast })
    }

    /// Observe every second, apply every 200 ms
    pub const fn bluez() -> Self {
        Self {
            slow: Duration::from_secs(1),
            fast: Duration::from_millis(200),
        }
    }

    /// Observe every 5 s, apply every second
    pub const fn winrt() -> Self {
        Self {
            slow: Duration::from_secs(5),
            fast: Duration::from_secs(1),
        }
    }

    pub fn slow(&self) -> Duration {
        self.slow
    }

    pub fn fast(&self) -> Duration {
        self.fast
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adv_interval_bounds() {
        assert_eq!(
            check_adv_interval(50, 100),
            Err(ConfigError::AdvMinTooSmall(50))
        );
        assert_eq!(
            check_adv_interval(100, 90),
            Err(ConfigError::AdvMaxBelowMin {
                adv_min: 100,
                adv_max: 90
            })
        );
        assert_eq!(
            check_adv_interval(100, 20000),
            Err(ConfigError::AdvMaxTooLarge(20000))
        );
        assert!(check_adv_interval(100, 100).is_ok());
        assert!(check_adv_interval(10240, 10240).is_ok());
    }

    #[test]
    fn test_adv_interval_messages() {
        let err = check_adv_interval(50, 100).unwrap_err();
        assert!(err.to_string().contains("smaller than 100"));

        let err = check_adv_interval(100, 90).unwrap_err();
        assert!(err.to_string().contains("AdvMax was smaller than AdvMin"));

        let err = check_adv_interval(100, 20000).unwrap_err();
        assert!(err.to_string().contains("larger than 10240"));
    }

    #[test]
    fn test_beacon_config_rejects_bad_interval() {
        let ipv4 = Ipv4Addr::new(192, 168, 1, 50);
        assert!(BeaconConfig::new(ipv4, 100, 100, 0, "/tmp/ble").is_ok());
        assert!(BeaconConfig::new(ipv4, 99, 100, 0, "/tmp/ble").is_err());
    }

    #[test]
    fn test_tick_schedule_ordering() {
        assert!(TickSchedule::new(Duration::from_secs(1), Duration::from_millis(200)).is_ok());
        assert!(TickSchedule::new(Duration::from_secs(1), Duration::from_secs(1)).is_ok());
        assert_eq!(
            TickSchedule::new(Duration::from_millis(200), Duration::from_secs(1)),
            Err(ConfigError::TickOrder {
                fast_ms: 1000,
                slow_ms: 200
            })
        );
        assert_eq!(
            TickSchedule::new(Duration::ZERO, Duration::ZERO),
            Err(ConfigError::ZeroTick)
        );
    }

    #[test]
    fn test_platform_presets() {
        let bluez = PlatformCapabilities::bluez();
        assert!(bluez.can_delete_open_files);
        assert!(bluez.detects_port_change_while_running);

        let winrt = PlatformCapabilities::winrt();
        assert!(!winrt.can_delete_open_files);
        assert!(!winrt.detects_port_change_while_running);

        assert!(TickSchedule::bluez().fast() <= TickSchedule::bluez().slow());
        assert!(TickSchedule::winrt().fast() <= TickSchedule::winrt().slow());
    }
}
