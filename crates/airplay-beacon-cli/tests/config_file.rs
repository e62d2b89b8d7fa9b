//! Startup-file handling as seen from the command line

use std::net::Ipv4Addr;
use std::path::PathBuf;

use airplay_beacon_cli::config::DEFAULT_CONFIG_FILE;
use airplay_beacon_cli::{Cli, CliError, Ipv4Setting, ResolvedConfig};
use clap::Parser;

fn cli(args: &[&str]) -> Cli {
    let mut argv = vec!["airplay-beacon"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

#[test]
fn test_default_startup_file_in_home() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(
        home.path().join(DEFAULT_CONFIG_FILE),
        "# written by the installer\n--ipv4 10.0.0.7\n--AdvMin 200\n--AdvMax 400\n",
    )
    .unwrap();

    let resolved = ResolvedConfig::load(&cli(&["--AdvMax", "800"]), home.path()).unwrap();
    assert_eq!(resolved.ipv4, Ipv4Setting::Fixed(Ipv4Addr::new(10, 0, 0, 7)));
    assert_eq!(resolved.adv_min, 200);
    assert_eq!(resolved.adv_max, 800);
    assert_eq!(resolved.state_path, home.path().join(".uxplay.ble"));

    let config = resolved.into_beacon_config(|| unreachable!()).unwrap();
    assert_eq!(config.state_path(), home.path().join(".uxplay.ble"));
}

#[test]
fn test_no_startup_file_uses_defaults() {
    let home = tempfile::tempdir().unwrap();
    let resolved = ResolvedConfig::load(&cli(&["--ipv4", "192.168.1.50"]), home.path()).unwrap();

    let config = resolved.into_beacon_config(|| unreachable!()).unwrap();
    assert_eq!(config.ipv4, Ipv4Addr::new(192, 168, 1, 50));
    assert_eq!((config.adv_min, config.adv_max, config.index), (100, 100, 0));
}

#[test]
fn test_explicit_startup_file() {
    let home = tempfile::tempdir().unwrap();
    let other = tempfile::tempdir().unwrap();
    let file = other.path().join("beacon.conf");
    std::fs::write(&file, "--path /srv/airplay/ble\n--index 4\n").unwrap();

    let file_arg = file.to_string_lossy().into_owned();
    let resolved = ResolvedConfig::load(&cli(&["--file", &file_arg]), home.path()).unwrap();
    assert_eq!(resolved.state_path, PathBuf::from("/srv/airplay/ble"));
    assert_eq!(resolved.index, 4);
}

#[test]
fn test_explicit_startup_file_missing() {
    let home = tempfile::tempdir().unwrap();
    let missing = home.path().join("missing.conf");
    let file_arg = missing.to_string_lossy().into_owned();

    let err = ResolvedConfig::load(&cli(&["--file", &file_arg]), home.path()).unwrap_err();
    assert!(matches!(err, CliError::ConfigFileNotFound(path) if path == missing));
}

#[test]
fn test_bad_startup_file_value() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(home.path().join(DEFAULT_CONFIG_FILE), "--AdvMax fast\n").unwrap();

    let err = ResolvedConfig::load(&cli(&[]), home.path()).unwrap_err();
    assert!(matches!(err, CliError::InvalidFileValue { ref value, .. } if value == "fast"));
}
