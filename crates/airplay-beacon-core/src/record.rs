//! Binary state-file codec
//!
//! The AirPlay server announces itself with a small little-endian record:
//!
//! ```text
//! offset 0  len 2   port (u16, LE)
//! offset 2  len 4   owner pid (u32, LE)
//! offset 6  ..EOF   executable path, UTF-8, NUL-terminated or unterminated
//! ```
//!
//! Bytes after the first NUL of the path field are ignored.

use std::path::Path;

use crate::error::DecodeError;

const PORT_LEN: usize = 2;
const PID_LEN: usize = 4;
const HEADER_LEN: usize = PORT_LEN + PID_LEN;

// ----------------------------------------------------------------------------
// State Record
// ----------------------------------------------------------------------------

/// Decoded contents of the server's state file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateRecord {
    /// Port the AirPlay server listens on
    pub port: u16,
    /// PID of the process that wrote the record
    pub owner_pid: u32,
    /// Executable path of the owning process as written by the server
    pub owner_executable: String,
}

impl StateRecord {
    pub fn new(port: u16, owner_pid: u32, owner_executable: impl Into<String>) -> Self {
        Self {
            port,
            owner_pid,
            owner_executable: owner_executable.into(),
        }
    }

    /// Decode a record from the raw bytes of the state file
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() < HEADER_LEN {
            return Err(DecodeError::Truncated { len: bytes.len() });
        }

        let port = u16::from_le_bytes([bytes[0], bytes[1]]);
        let owner_pid = u32::from_le_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]);

        let tail = &bytes[HEADER_LEN..];
        let name = match tail.iter().position(|&b| b == 0) {
            Some(nul) => &tail[..nul],
            None => tail,
        };
        let owner_executable = std::str::from_utf8(name)
            .map_err(|_| DecodeError::InvalidName)?
            .to_string();

        Ok(Self {
            port,
            owner_pid,
            owner_executable,
        })
    }

    /// Encode the record in the on-disk layout, NUL-terminating the path
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.owner_executable.len() + 1);
        out.extend_from_slice(&self.port.to_le_bytes());
        out.extend_from_slice(&self.owner_pid.to_le_bytes());
        out.extend_from_slice(self.owner_executable.as_bytes());
        out.push(0);
        out
    }

    /// Last path component of the owner's executable path.
    ///
    /// Both `/` and `\` count as separators so a record written on Windows
    /// reads the same everywhere.
    pub fn executable_basename(&self) -> &str {
        self.owner_executable
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.owner_executable)
    }

    /// Read and decode the state file at `path`
    pub fn read_from(path: &Path) -> std::io::Result<Result<Self, DecodeError>> {
        let bytes = std::fs::read(path)?;
        Ok(Self::decode(&bytes))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
