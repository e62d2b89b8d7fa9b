//! AirPlay service-discovery BLE beacon

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use airplay_beacon_cli::app;
use airplay_beacon_cli::cli::{parse_error_exit_code, Cli};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(parse_error_exit_code(&e));
        }
    };

    // Initialize logging
    setup_logging(cli.verbose);

    let result = app::run(cli).await;
    if let Err(e) = &result {
        error!("{}", e);
    }
    std::process::exit(app::exit_code(&result));
}

/// Setup logging based on verbosity level; `RUST_LOG` takes precedence
fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
