//! Windows BLE advertising implementation using WinRT

use airplay_beacon_core::{AdvertisementRequest, BeaconDriver, APPLE_COMPANY_ID};
use tracing::{debug, error, info, warn};
use windows::{
    Devices::Bluetooth::Advertisement::{BluetoothLEAdvertisementPublisher, BluetoothLEManufacturerData},
    Devices::Bluetooth::BluetoothAdapter,
    Storage::Streams::DataWriter,
};

use crate::error::DriverError;

// ----------------------------------------------------------------------------
// Windows Implementation
// ----------------------------------------------------------------------------

/// Publishes the AirPlay advertisement through `BluetoothLEAdvertisementPublisher`
pub struct WinRtDriver {
    publisher: Option<BluetoothLEAdvertisementPublisher>,
}

impl WinRtDriver {
    /// Check that a Bluetooth LE capable adapter is present
    pub async fn connect() -> Result<Self, DriverError> {
        let adapter = BluetoothAdapter::GetDefaultAsync()?
            .await
            .map_err(|e| DriverError::AdapterNotAvailable(e.to_string()))?;

        if !adapter.IsLowEnergySupported()? {
            return Err(DriverError::AdapterNotAvailable(
                "default adapter does not support Bluetooth LE".to_string(),
            ));
        }
        if !adapter.IsAdvertisementOffloadSupported().unwrap_or(false) {
            debug!("Adapter has no advertisement offload; publisher runs on the host");
        }

        Ok(Self { publisher: None })
    }

    fn create_publisher(request: &AdvertisementRequest) -> Result<BluetoothLEAdvertisementPublisher, DriverError> {
        let writer = DataWriter::new()?;
        writer.WriteBytes(&request.payload())?;
        let buffer = writer.DetachBuffer()?;

        let manufacturer_data = BluetoothLEManufacturerData::Create(APPLE_COMPANY_ID, &buffer)?;

        let publisher = BluetoothLEAdvertisementPublisher::new()?;
        publisher
            .Advertisement()?
            .ManufacturerData()?
            .Append(&manufacturer_data)?;
        Ok(publisher)
    }

    fn publish(&mut self, request: &AdvertisementRequest) -> Result<(), DriverError> {
        self.withdraw();

        let publisher = Self::create_publisher(request)?;
        publisher.Start()?;
        self.publisher = Some(publisher);
        Ok(())
    }

    fn withdraw(&mut self) -> bool {
        match self.publisher.take() {
            Some(publisher) => {
                if let Err(e) = publisher.Stop() {
                    warn!("Failed to stop advertisement publisher: {}", e);
                }
                true
            }
            None => false,
        }
    }
}

#[async_trait::async_trait]
impl BeaconDriver for WinRtDriver {
    async fn start(&mut self, request: &AdvertisementRequest) -> bool {
        debug!(
            "WinRT publisher has no interval controls; ignoring AdvMin={} AdvMax={} index={}",
            request.adv_min, request.adv_max, request.index
        );

        match self.publish(request) {
            Ok(()) => {
                info!(
                    "AirPlay service-discovery advertisement ({}:{}) published",
                    request.ipv4, request.port
                );
                true
            }
            Err(e) => {
                error!("Failed to publish advertisement: {}", e);
                false
            }
        }
    }

    async fn stop(&mut self) {
        if self.withdraw() {
            info!("AirPlay service-discovery advertisement withdrawn");
        }
    }
}
