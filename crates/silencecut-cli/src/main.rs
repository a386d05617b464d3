//! `silencecut` binary.

use clap::Parser;
use tokio::sync::watch;
use tracing::{error, info};

use silencecut_cli::{init_tracing, run, CliArgs};

#[tokio::main]
async fn main() {
    // Load environment variables before clap reads its `env` fallbacks
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    init_tracing(args.log_format);

    let config = args.into_run_config();
    info!("Run config: {:?}", config);

    // Ctrl-C kills in-flight FFmpeg processes
    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received shutdown signal");
            let _ = cancel_tx.send(true);
        }
    });

    if let Err(e) = run(config, cancel_rx).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
