//! Test doubles for the coordinator
//!
//! Enabled with the `testing` feature. [`RecordingDriver`] is cheaply
//! cloneable; clones share one call log, so a test can hand a clone to a
//! [`Coordinator`](crate::Coordinator) and keep inspecting the original.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::driver::{AdvertisementRequest, BeaconDriver};
use crate::liveness::ProcessTable;

// ----------------------------------------------------------------------------
// Recording Driver
// ----------------------------------------------------------------------------

/// A call made against [`RecordingDriver`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCall {
    Start(AdvertisementRequest),
    Stop,
}

#[derive(Debug, Default)]
struct Recording {
    calls: Vec<DriverCall>,
    failing_starts: usize,
    active: bool,
}

/// Driver that records every call and can be told to fail starts
#[derive(Debug, Clone, Default)]
pub struct RecordingDriver {
    inner: Arc<Mutex<Recording>>,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Recording> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Make the next `n` calls to `start` report failure
    pub fn fail_next_starts(&self, n: usize) {
        self.lock().failing_starts = n;
    }

    pub fn calls(&self) -> Vec<DriverCall> {
        self.lock().calls.clone()
    }

    pub fn start_count(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| matches!(call, DriverCall::Start(_)))
            .count()
    }

    pub fn stop_count(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| matches!(call, DriverCall::Stop))
            .count()
    }

    /// Whether an advertisement is currently registered
    pub fn is_active(&self) -> bool {
        self.lock().active
    }
}

#[async_trait::async_trait]
impl BeaconDriver for RecordingDriver {
    async fn start(&mut self, request: &AdvertisementRequest) -> bool {
        let mut recording = self.lock();
        recording.calls.push(DriverCall::Start(*request));
        if recording.failing_starts > 0 {
            recording.failing_starts -= 1;
            return false;
        }
        recording.active = true;
        true
    }

    async fn stop(&mut self) {
        let mut recording = self.lock();
        recording.calls.push(DriverCall::Stop);
        recording.active = false;
    }
}

// ----------------------------------------------------------------------------
// Fake Process Table
// ----------------------------------------------------------------------------

/// Scripted process table mapping PIDs to process names
#[derive(Debug, Clone, Default)]
pub struct FakeProcessTable {
    processes: HashMap<u32, String>,
}

impl FakeProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_process(mut self, pid: u32, name: impl Into<String>) -> Self {
        self.insert(pid, name);
        self
    }

    pub fn insert(&mut self, pid: u32, name: impl Into<String>) {
        self.processes.insert(pid, name.into());
    }

    pub fn kill(&mut self, pid: u32) {
        self.processes.remove(&pid);
    }
}

impl ProcessTable for FakeProcessTable {
    fn is_alive(&mut self, pid: u32) -> bool {
        self.processes.contains_key(&pid)
    }

    fn name_matches(&mut self, pid: u32, expected: &str) -> bool {
        self.processes
            .get(&pid)
            .is_some_and(|name| name.starts_with(expected))
    }
}
