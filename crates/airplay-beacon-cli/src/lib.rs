//! AirPlay beacon CLI library
//!
//! Argument parsing, startup-file handling and IPv4 discovery for the
//! `airplay-beacon` binary.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod network;

pub use cli::Cli;
pub use config::{FileConfig, Ipv4Setting, ResolvedConfig};
pub use error::{CliError, Result};
