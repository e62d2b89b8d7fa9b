//! Pending-transition state machine
//!
//! The coordinator runs two ticks:
//!
//! - **observe** (slow): reads the state file, validates its owner and decides
//!   whether the beacon should be switched on or off. It only records intent.
//! - **apply** (fast): acts on that intent by calling the [`BeaconDriver`].
//!
//! Intent is a single [`Pending`] value, so "pending on" and "pending off" can
//! never be set together. Every observe tick assigns it outright rather than
//! adding to whatever the previous tick left behind.

use std::io;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::{BeaconConfig, PlatformCapabilities};
use crate::driver::{AdvertisementRequest, BeaconDriver};
use crate::error::DecodeError;
use crate::liveness::ProcessTable;
use crate::reclaim::{reclaim_orphan, ReclaimOutcome};
use crate::record::StateRecord;

// ----------------------------------------------------------------------------
// Pending Intent
// ----------------------------------------------------------------------------

/// Transition requested by the last observe tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pending {
    #[default]
    None,
    /// Start advertising the given port
    On { port: u16 },
    /// Stop the running advertisement
    Off,
}

// ----------------------------------------------------------------------------
// Tick Results
// ----------------------------------------------------------------------------

/// Why a present state file was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrphanReason {
    Malformed(DecodeError),
    OwnerDead { pid: u32 },
    NameMismatch { pid: u32, expected: String },
}

/// What an observe tick found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    /// No state file: the server is not running
    Absent,
    /// The file describes a live server
    Valid(StateRecord),
    /// The file was left behind by a dead or foreign process
    Orphan {
        reason: OrphanReason,
        reclaim: ReclaimOutcome,
    },
    /// The file exists but could not be read
    Unreadable(io::ErrorKind),
}

/// Driver call made by an apply tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Started { port: u16 },
    StartFailed { port: u16 },
    Stopped,
}

// ----------------------------------------------------------------------------
// Coordinator State
// ----------------------------------------------------------------------------

/// Beacon state owned by a single coordinator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoordinatorState {
    running: bool,
    pending: Pending,
    advertised_port: Option<u16>,
}

impl CoordinatorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the driver believes the advertisement is active
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Port currently advertised, `None` while stopped
    pub fn advertised_port(&self) -> Option<u16> {
        self.advertised_port
    }

    pub fn pending(&self) -> Pending {
        self.pending
    }

    pub fn pending_on(&self) -> bool {
        matches!(self.pending, Pending::On { .. })
    }

    pub fn pending_off(&self) -> bool {
        self.pending == Pending::Off
    }

    /// Off when running, nothing otherwise
    fn off_if_running(&self) -> Pending {
        if self.running {
            Pending::Off
        } else {
            Pending::None
        }
    }

    /// Slow tick: derive intent from the state file at `path`
    pub fn observe<P>(
        &mut self,
        path: &Path,
        processes: &mut P,
        capabilities: &PlatformCapabilities,
    ) -> Observation
    where
        P: ProcessTable + ?Sized,
    {
        let decoded = match StateRecord::read_from(path) {
            Ok(decoded) => decoded,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.pending = self.off_if_running();
                return Observation::Absent;
            }
            Err(e) => {
                warn!("Cannot read beacon file '{}': {}", path.display(), e);
                self.pending = self.off_if_running();
                return Observation::Unreadable(e.kind());
            }
        };

        match validate(decoded, processes) {
            Ok(record) => {
                self.pending = if !self.running {
                    Pending::On { port: record.port }
                } else if capabilities.detects_port_change_while_running
                    && self.advertised_port != Some(record.port)
                {
                    info!(
                        "Server moved from port {:?} to {}, retiring stale advertisement",
                        self.advertised_port, record.port
                    );
                    Pending::Off
                } else {
                    Pending::None
                };
                Observation::Valid(record)
            }
            Err(reason) => {
                warn!(
                    "Orphan beacon file '{}' exists but its owner is no longer active ({:?})",
                    path.display(),
                    reason
                );
                let reclaim = if capabilities.can_delete_open_files {
                    reclaim_orphan(path)
                } else {
                    ReclaimOutcome::Skipped
                };
                self.pending = self.off_if_running();
                Observation::Orphan { reason, reclaim }
            }
        }
    }

    /// Fast tick: carry out the pending transition, if any
    pub async fn apply<D>(&mut self, driver: &mut D, config: &BeaconConfig) -> Option<Transition>
    where
        D: BeaconDriver + ?Sized,
    {
        match (self.running, std::mem::take(&mut self.pending)) {
            (true, Pending::Off) => {
                driver.stop().await;
                self.running = false;
                self.advertised_port = None;
                info!("AirPlay service-discovery beacon stopped");
                Some(Transition::Stopped)
            }
            (false, Pending::On { port }) => {
                let request = AdvertisementRequest::new(config, port);
                debug!(
                    "Starting beacon {} for {}:{} (payload {})",
                    request.index,
                    request.ipv4,
                    port,
                    request.payload_hex()
                );
                if driver.start(&request).await {
                    self.running = true;
                    self.advertised_port = Some(port);
                    info!(
                        "AirPlay service-discovery beacon advertising {}:{}",
                        request.ipv4, port
                    );
                    Some(Transition::Started { port })
                } else {
                    warn!("Beacon driver failed to start; retrying after next state check");
                    Some(Transition::StartFailed { port })
                }
            }
            (true, Pending::On { .. }) => {
                debug!("Ignoring start request while already advertising");
                None
            }
            (false, Pending::Off) | (_, Pending::None) => None,
        }
    }
}

/// Check that the record's owner is still the process that wrote it
fn validate<P>(
    decoded: Result<StateRecord, DecodeError>,
    processes: &mut P,
) -> Result<StateRecord, OrphanReason>
where
    P: ProcessTable + ?Sized,
{
    let record = decoded.map_err(OrphanReason::Malformed)?;
    let pid = record.owner_pid;

    if !processes.is_alive(pid) {
        return Err(OrphanReason::OwnerDead { pid });
    }

    let expected = record.executable_basename();
    if !processes.name_matches(pid, expected) {
        return Err(OrphanReason::NameMismatch {
            pid,
            expected: expected.to_string(),
        });
    }

    Ok(record)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
