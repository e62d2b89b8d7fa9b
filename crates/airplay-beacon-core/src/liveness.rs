//! Process liveness checks for state-file owners

use std::ffi::OsStr;
use std::path::Path;

use sysinfo::{Pid, Process, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};
use tracing::debug;

/// Linux truncates a process's short name (`comm`) to this many bytes
const TRUNCATED_NAME_LEN: usize = 15;

// ----------------------------------------------------------------------------
// Process Table Trait
// ----------------------------------------------------------------------------

/// Read access to the OS process table
pub trait ProcessTable: Send {
    /// Whether a process with this PID currently exists
    fn is_alive(&mut self, pid: u32) -> bool;

    /// Whether the live process `pid` has a name starting with `expected`.
    ///
    /// This is a prefix match so platform-specific suffixes (`.exe`, version
    /// tags) still validate. Returns `false` if the process is gone.
    fn name_matches(&mut self, pid: u32, expected: &str) -> bool;
}

// ----------------------------------------------------------------------------
// sysinfo-backed Implementation
// ----------------------------------------------------------------------------

/// Process table backed by `sysinfo`
pub struct SystemProcessTable {
    system: System,
}

impl SystemProcessTable {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }

    fn refresh(&mut self, pid: Pid) -> Option<&Process> {
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing()
                .with_exe(UpdateKind::OnlyIfNotSet)
                .with_cmd(UpdateKind::OnlyIfNotSet),
        );
        self.system.process(pid)
    }
}

impl Default for SystemProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessTable for SystemProcessTable {
    fn is_alive(&mut self, pid: u32) -> bool {
        self.refresh(Pid::from_u32(pid)).is_some()
    }

    fn name_matches(&mut self, pid: u32, expected: &str) -> bool {
        let Some(process) = self.refresh(Pid::from_u32(pid)) else {
            debug!("pid {} vanished before its name could be read", pid);
            return false;
        };
        let name = full_process_name(process);
        debug!("pid {} runs as '{}' (expecting prefix '{}')", pid, name, expected);
        name.starts_with(expected)
    }
}

/// Short process name, widened to the executable or argv[0] basename when the
/// kernel truncated it.
fn full_process_name(process: &Process) -> String {
    let short = process.name().to_string_lossy().into_owned();
    if short.len() < TRUNCATED_NAME_LEN {
        return short;
    }

    let exe_name = process.exe().and_then(Path::file_name);
    let argv0_name = process
        .cmd()
        .first()
        .and_then(|arg| Path::new(arg).file_name());

    [exe_name, argv0_name]
        .into_iter()
        .flatten()
        .map(OsStr::to_string_lossy)
        .find(|candidate| candidate.starts_with(&short))
        .map(|candidate| candidate.into_owned())
        .unwrap_or(short)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_own_process_is_alive() {
        let mut table = SystemProcessTable::new();
        assert!(table.is_alive(std::process::id()));
    }

    #[test]
    fn test_impossible_pid_is_dead() {
        let mut table = SystemProcessTable::new();
        assert!(!table.is_alive(u32::MAX - 1));
        assert!(!table.name_matches(u32::MAX - 1, ""));
    }

    #[test]
    #[cfg(any(target_os = "linux", target_os = "macos"))]
    fn test_own_name_matches_executable_basename() {
        let exe = std::env::current_exe().unwrap();
        let basename = exe.file_name().unwrap().to_string_lossy().into_owned();

        let mut table = SystemProcessTable::new();
        let pid = std::process::id();
        assert!(table.name_matches(pid, &basename));
        assert!(table.name_matches(pid, &basename[..3]));
        assert!(!table.name_matches(pid, "definitely-not-this-binary"));
    }
}
