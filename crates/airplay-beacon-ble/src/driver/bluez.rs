//! Linux BLE advertising implementation using bluer (BlueZ)

use std::collections::BTreeMap;
use std::time::Duration;

use airplay_beacon_core::{AdvertisementRequest, BeaconDriver, APPLE_COMPANY_ID, ADV_INTERVAL_MIN_MS};
use tracing::{debug, error, info};

use crate::error::DriverError;

// ----------------------------------------------------------------------------
// Linux Implementation
// ----------------------------------------------------------------------------

/// Registers the AirPlay advertisement with BlueZ's LEAdvertisingManager1
pub struct BluezDriver {
    _session: bluer::Session,
    adapter: bluer::Adapter,
    handle: Option<bluer::adv::AdvertisementHandle>,
}

impl BluezDriver {
    /// Open a BlueZ session on the default adapter and power it on
    pub async fn connect() -> Result<Self, DriverError> {
        let session = bluer::Session::new().await?;
        let adapter = session
            .default_adapter()
            .await
            .map_err(|e| DriverError::AdapterNotAvailable(e.to_string()))?;

        if !adapter.is_powered().await.unwrap_or(false) {
            adapter.set_powered(true).await?;
            debug!("Powered on adapter {}", adapter.name());
        }

        Ok(Self {
            _session: session,
            adapter,
            handle: None,
        })
    }

    pub fn adapter_name(&self) -> &str {
        self.adapter.name()
    }

    async fn register(&mut self, request: &AdvertisementRequest) -> Result<(), DriverError> {
        // replace, never stack, advertisements
        self.handle = None;

        let advertisement = airplay_advertisement(request);
        let handle = self.adapter.advertise(advertisement).await?;
        self.handle = Some(handle);
        Ok(())
    }
}

/// Broadcast advertisement carrying the AirPlay manufacturer data
fn airplay_advertisement(request: &AdvertisementRequest) -> bluer::adv::Advertisement {
    let mut manufacturer_data = BTreeMap::new();
    manufacturer_data.insert(APPLE_COMPANY_ID, request.payload().to_vec());

    bluer::adv::Advertisement {
        advertisement_type: bluer::adv::Type::Broadcast,
        manufacturer_data,
        min_interval: Some(interval(request.adv_min)),
        max_interval: Some(interval(request.adv_max)),
        ..Default::default()
    }
}

/// BlueZ rejects intervals below 100 ms
fn interval(ms: u32) -> Duration {
    Duration::from_millis(u64::from(ms.max(ADV_INTERVAL_MIN_MS)))
}

#[async_trait::async_trait]
impl BeaconDriver for BluezDriver {
    async fn start(&mut self, request: &AdvertisementRequest) -> bool {
        debug!(
            "bluer assigns its own advertisement object path; beacon index {} is not used",
            request.index
        );

        match self.register(request).await {
            Ok(()) => {
                info!(
                    "AirPlay service-discovery advertisement ({}:{}) registered on {}",
                    request.ipv4,
                    request.port,
                    self.adapter.name()
                );
                true
            }
            Err(e) => {
                error!("Failed to register advertisement: {}", e);
                false
            }
        }
    }

    async fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            drop(handle); // Dropping the handle unregisters the advertisement
            info!("AirPlay service-discovery advertisement unregistered");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn request(adv_min: u32, adv_max: u32) -> AdvertisementRequest {
        AdvertisementRequest {
            ipv4: Ipv4Addr::new(192, 168, 1, 50),
            port: 7000,
            adv_min,
            adv_max,
            index: 0,
        }
    }

    #[test]
    fn test_advertisement_contents() {
        let adv = airplay_advertisement(&request(160, 320));
        assert_eq!(adv.advertisement_type, bluer::adv::Type::Broadcast);
        assert_eq!(
            adv.manufacturer_data.get(&0x004C),
            Some(&vec![0x09, 0x08, 0x13, 0x30, 192, 168, 1, 50, 0x1B, 0x58])
        );
        assert_eq!(adv.min_interval, Some(Duration::from_millis(160)));
        assert_eq!(adv.max_interval, Some(Duration::from_millis(320)));
    }

    #[test]
    fn test_index_does_not_change_advertisement() {
        let first = airplay_advertisement(&request(100, 100));
        let second = airplay_advertisement(&AdvertisementRequest {
            index: 3,
            ..request(100, 100)
        });
        assert_eq!(first.manufacturer_data, second.manufacturer_data);
        assert_eq!(first.min_interval, second.min_interval);
        assert_eq!(first.max_interval, second.max_interval);
    }

    #[test]
    fn test_interval_clamped_to_bluez_minimum() {
        assert_eq!(interval(0), Duration::from_millis(100));
        assert_eq!(interval(250), Duration::from_millis(250));
    }
}
