//! Beacon application: configuration, driver selection and the poll loop

use std::future::Future;
use std::path::Path;

use airplay_beacon_ble::PlatformDriver;
use airplay_beacon_core::{BeaconConfig, BeaconError, Coordinator};
use tracing::{info, warn};

use crate::cli::Cli;
use crate::config::ResolvedConfig;
use crate::error::{CliError, Result};
use crate::network;

/// Resolve the configuration from the arguments and the startup file
pub fn load_configuration(cli: &Cli, home: &Path) -> Result<BeaconConfig> {
    ResolvedConfig::load(cli, home)?.into_beacon_config(network::detect_ipv4)
}

/// Run the beacon until interrupted
pub async fn run(cli: Cli) -> Result<()> {
    let home = dirs::home_dir().ok_or(CliError::NoHomeDirectory)?;
    run_until(cli, &home, shutdown_signal()).await
}

/// Run the beacon until `shutdown` resolves, resolving `~` paths against `home`
pub async fn run_until<F>(cli: Cli, home: &Path, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    let config = load_configuration(&cli, home)?;

    let driver = if cli.dry_run {
        PlatformDriver::dry_run()
    } else {
        PlatformDriver::probe().await.map_err(BeaconError::from)?
    };
    let capabilities = driver.capabilities();
    let schedule = driver.schedule();

    info!(
        "AirPlay Service-Discovery Bluetooth LE beacon: using BLE file {}, advmin:advmax {}:{} index:{}",
        config.state_path().display(),
        config.adv_min,
        config.adv_max,
        config.index
    );
    info!("Advertising IPv4 address {}", config.ipv4);
    info!("(Press Ctrl+C to exit)");

    let mut coordinator = Coordinator::new(config, capabilities, driver);
    coordinator.run(schedule, shutdown).await;

    info!("Exiting ...");
    Ok(())
}

/// Process exit status for the outcome of [`run`]
pub fn exit_code(result: &Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(_) => 1,
    }
}

/// Resolves on Ctrl-C, or SIGTERM on Unix
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => info!("Interrupted"),
        _ = terminate => info!("Terminated"),
    }
}
