//! Command-line interface definitions and parsing

use std::path::PathBuf;

use clap::Parser;

/// Sentinel value of `--ipv4` asking for local address discovery
pub const DETECT_IPV4: &str = "use gethostbyname";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Runs an AirPlay service discovery BLE beacon.",
    long_about = None,
    after_help = "Example: airplay-beacon --ipv4 192.168.1.100 --path /home/user/ble --AdvMin 100 --AdvMax 100"
)]
pub struct Cli {
    /// Beacon startup file: one `--key value` entry per line, lines starting with # are ignored
    /// [default: ~/.uxplay.beacon]
    #[arg(long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Path to the AirPlay server's BLE beacon information file [default: ~/.uxplay.ble]
    #[arg(long, value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// IPv4 address of the AirPlay server
    #[arg(long, default_value = DETECT_IPV4)]
    pub ipv4: String,

    /// Minimum advertising interval (>= 100), msecs [default: 100]
    #[arg(long = "AdvMin", value_name = "MSECS", allow_hyphen_values = true)]
    pub adv_min: Option<String>,

    /// Maximum advertising interval (>= AdvMin, <= 10240), msecs [default: 100]
    #[arg(long = "AdvMax", value_name = "MSECS", allow_hyphen_values = true)]
    pub adv_max: Option<String>,

    /// Index >= 0 distinguishing multiple beacons on one host [default: 0]
    #[arg(long, value_name = "N", allow_hyphen_values = true)]
    pub index: Option<String>,

    /// Log advertisements instead of broadcasting them
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Exit status for a failed parse: help and version output are not errors,
/// everything else exits 1 like any other configuration error
pub fn parse_error_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        1
    } else {
        0
    }
}
