//! Dry-run driver that logs advertisements instead of broadcasting them

use airplay_beacon_core::{AdvertisementRequest, BeaconDriver};
use tracing::info;

// ----------------------------------------------------------------------------
// Dry Run Implementation
// ----------------------------------------------------------------------------

/// Driver for hosts without a usable radio
pub struct DryRunDriver {
    active: Option<AdvertisementRequest>,
}

impl DryRunDriver {
    pub fn new() -> Self {
        Self { active: None }
    }

    /// The advertisement that would currently be on air
    pub fn active(&self) -> Option<&AdvertisementRequest> {
        self.active.as_ref()
    }
}

impl Default for DryRunDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl BeaconDriver for DryRunDriver {
    async fn start(&mut self, request: &AdvertisementRequest) -> bool {
        info!(
            "[dry run] advertise {}:{} manufacturer 0x004C data {} (AdvMin={} AdvMax={} index={})",
            request.ipv4,
            request.port,
            request.payload_hex(),
            request.adv_min,
            request.adv_max,
            request.index
        );
        self.active = Some(*request);
        true
    }

    async fn stop(&mut self) {
        if let Some(request) = self.active.take() {
            info!("[dry run] withdraw advertisement for port {}", request.port);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn request(port: u16) -> AdvertisementRequest {
        AdvertisementRequest {
            ipv4: Ipv4Addr::new(10, 0, 0, 7),
            port,
            adv_min: 100,
            adv_max: 100,
            index: 0,
        }
    }

    #[tokio::test]
    async fn test_start_replaces_active_advertisement() {
        let mut driver = DryRunDriver::new();
        assert!(driver.active().is_none());

        assert!(driver.start(&request(7000)).await);
        assert!(driver.start(&request(7100)).await);
        assert_eq!(driver.active().map(|r| r.port), Some(7100));
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let mut driver = DryRunDriver::default();
        driver.stop().await;
        assert!(driver.start(&request(7000)).await);
        driver.stop().await;
        driver.stop().await;
        assert!(driver.active().is_none());
    }
}
