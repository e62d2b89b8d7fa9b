//! Beacon driver abstraction
//!
//! Drivers own the platform advertising API (BlueZ over DBus, the WinRT
//! publisher, ...). The coordinator only sees whether `start` succeeded;
//! drivers report native error detail through their own logging.

use std::net::Ipv4Addr;

use crate::config::BeaconConfig;
use crate::payload::{manufacturer_payload, PAYLOAD_LEN};

// ----------------------------------------------------------------------------
// Advertisement Request
// ----------------------------------------------------------------------------

/// Everything a driver needs to register one AirPlay advertisement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvertisementRequest {
    pub ipv4: Ipv4Addr,
    pub port: u16,
    /// Minimum advertising interval (ms)
    pub adv_min: u32,
    /// Maximum advertising interval (ms)
    pub adv_max: u32,
    pub index: u32,
}

impl AdvertisementRequest {
    pub fn new(config: &BeaconConfig, port: u16) -> Self {
        Self {
            ipv4: config.ipv4,
            port,
            adv_min: config.adv_min,
            adv_max: config.adv_max,
            index: config.index,
        }
    }

    /// Manufacturer data to advertise under the Apple company id
    pub fn payload(&self) -> [u8; PAYLOAD_LEN] {
        manufacturer_payload(self.ipv4, self.port)
    }

    /// Payload as lowercase hex, for logs
    pub fn payload_hex(&self) -> String {
        hex::encode(self.payload())
    }
}

// ----------------------------------------------------------------------------
// Driver Trait
// ----------------------------------------------------------------------------

/// Platform BLE advertisement mechanism
#[async_trait::async_trait]
pub trait BeaconDriver: Send {
    /// Register the advertisement. Returns `true` once it is active.
    async fn start(&mut self, request: &AdvertisementRequest) -> bool;

    /// Remove the advertisement. Must tolerate being called while stopped.
    async fn stop(&mut self);
}

#[async_trait::async_trait]
impl<D: BeaconDriver + ?Sized> BeaconDriver for Box<D> {
    async fn start(&mut self, request: &AdvertisementRequest) -> bool {
        (**self).start(request).await
    }

    async fn stop(&mut self) {
        (**self).stop().await
    }
}
