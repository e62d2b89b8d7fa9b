//! Beacon configuration loading
//!
//! Settings come from three layers, highest priority first:
//! - command line arguments
//! - the startup file (`~/.uxplay.beacon` unless `--file` names another)
//! - built-in defaults
//!
//! The startup file shares its format with the AirPlay server's own
//! configuration tooling: one `--key value` directive per line, with blank
//! lines and `#` comments ignored.

use std::io;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

use airplay_beacon_core::BeaconConfig;
use tracing::info;

use crate::cli::{Cli, DETECT_IPV4};
use crate::error::{CliError, Result};

/// Startup file looked up in the home directory
pub const DEFAULT_CONFIG_FILE: &str = ".uxplay.beacon";

/// State file written by the AirPlay server, in the home directory
pub const DEFAULT_STATE_FILE: &str = ".uxplay.ble";

pub const DEFAULT_ADV_MIN: u32 = 100;
pub const DEFAULT_ADV_MAX: u32 = 100;
pub const DEFAULT_INDEX: u32 = 0;

// ----------------------------------------------------------------------------
// Startup File
// ----------------------------------------------------------------------------

/// Settings read from the startup file; `None` means "not set there"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    pub path: Option<PathBuf>,
    pub ipv4: Option<String>,
    pub adv_min: Option<u32>,
    pub adv_max: Option<u32>,
    pub index: Option<u32>,
}

impl FileConfig {
    /// Parse startup file contents. `file` is only used in error messages.
    pub fn parse(contents: &str, file: &Path) -> Result<Self> {
        let mut config = Self::default();

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = match line.split_once(char::is_whitespace) {
                Some((key, value)) => (key, value.trim()),
                None => (line, ""),
            };

            let number = |value: &str| {
                parse_digits(value).ok_or_else(|| CliError::InvalidFileValue {
                    key: key.to_string(),
                    value: value.to_string(),
                    file: file.to_path_buf(),
                })
            };

            match key {
                "--path" => config.path = Some(PathBuf::from(value)),
                "--ipv4" => config.ipv4 = Some(value.to_string()),
                "--AdvMin" => config.adv_min = Some(number(value)?),
                "--AdvMax" => config.adv_max = Some(number(value)?),
                "--index" => config.index = Some(number(value)?),
                _ => {
                    return Err(CliError::UnknownKey {
                        key: key.to_string(),
                        file: file.to_path_buf(),
                    })
                }
            }
        }

        Ok(config)
    }

    /// Read the startup file.
    ///
    /// A missing file is an error only when it was named explicitly.
    pub fn load(file: &Path, explicit: bool) -> Result<Option<Self>> {
        match std::fs::read_to_string(file) {
            Ok(contents) => {
                info!("Using config file: {}", file.display());
                Self::parse(&contents, file).map(Some)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if explicit {
                    Err(CliError::ConfigFileNotFound(file.to_path_buf()))
                } else {
                    Ok(None)
                }
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Accept only plain ASCII digits that fit a `u32`
fn parse_digits(value: &str) -> Option<u32> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

fn parse_argument(key: &str, value: Option<&str>) -> Result<Option<u32>> {
    value
        .map(|value| {
            parse_digits(value).ok_or_else(|| CliError::InvalidArgument {
                key: key.to_string(),
                value: value.to_string(),
            })
        })
        .transpose()
}

// ----------------------------------------------------------------------------
// Resolved Configuration
// ----------------------------------------------------------------------------

/// Where the advertised IPv4 address comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ipv4Setting {
    /// Discover the local address at startup
    Detect,
    Fixed(Ipv4Addr),
}

impl Ipv4Setting {
    fn parse(value: &str) -> Result<Self> {
        if value == DETECT_IPV4 {
            return Ok(Self::Detect);
        }
        value
            .parse()
            .map(Self::Fixed)
            .map_err(|_| CliError::InvalidIpv4(value.to_string()))
    }
}

/// All configuration layers merged, before interval validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub state_path: PathBuf,
    pub ipv4: Ipv4Setting,
    pub adv_min: u32,
    pub adv_max: u32,
    pub index: u32,
}

impl ResolvedConfig {
    /// Locate and read the startup file, then merge it with the arguments
    pub fn load(cli: &Cli, home: &Path) -> Result<Self> {
        let file = match &cli.file {
            Some(file) => FileConfig::load(file, true)?,
            None => FileConfig::load(&home.join(DEFAULT_CONFIG_FILE), false)?,
        };
        Self::resolve(cli, file.unwrap_or_default(), home)
    }

    /// Merge arguments over startup-file settings over defaults
    pub fn resolve(cli: &Cli, file: FileConfig, home: &Path) -> Result<Self> {
        let state_path = cli
            .path
            .clone()
            .or(file.path)
            .unwrap_or_else(|| home.join(DEFAULT_STATE_FILE));

        let ipv4 = match Ipv4Setting::parse(&cli.ipv4)? {
            Ipv4Setting::Detect => match file.ipv4.as_deref() {
                Some(value) => Ipv4Setting::parse(value)?,
                None => Ipv4Setting::Detect,
            },
            fixed => fixed,
        };

        let adv_min = parse_argument("AdvMin", cli.adv_min.as_deref())?
            .or(file.adv_min)
            .unwrap_or(DEFAULT_ADV_MIN);
        let adv_max = parse_argument("AdvMax", cli.adv_max.as_deref())?
            .or(file.adv_max)
            .unwrap_or(DEFAULT_ADV_MAX);
        let index = parse_argument("index", cli.index.as_deref())?
            .or(file.index)
            .unwrap_or(DEFAULT_INDEX);

        Ok(Self {
            state_path,
            ipv4,
            adv_min,
            adv_max,
            index,
        })
    }

    /// Fix the IPv4 address and validate the advertising interval
    pub fn into_beacon_config<F>(self, detect_ipv4: F) -> Result<BeaconConfig>
    where
        F: FnOnce() -> Result<Ipv4Addr>,
    {
        let ipv4 = match self.ipv4 {
            Ipv4Setting::Fixed(ipv4) => ipv4,
            Ipv4Setting::Detect => detect_ipv4()?,
        };
        Ok(BeaconConfig::new(
            ipv4,
            self.adv_min,
            self.adv_max,
            self.index,
            self.state_path,
        )?)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
