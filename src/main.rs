use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tunitales::config::{Args, ServiceConfig};
use tunitales::uploads::UploadDir;
use tunitales::{AppState, MonumentStore, TuniServer};

fn main() -> ExitCode {
    let config = ServiceConfig::from(Args::parse());

    tracing_subscriber::fmt()
    .with_env_filter(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tunitales=info")),
    )
    .with_target(false)
    .with_level(true)
    .init();

    info!("--- [TuniTales] ---");
    info!("Worker Threads: {}", config.worker_threads);
    info!("Classifier: {:?}", config.classifier);
    info!("Uploads Dir: {}", config.uploads_dir.display());
    info!("-------------------");

    let runtime = match tokio::runtime::Builder::new_multi_thread()
    .worker_threads(config.worker_threads)
    .enable_all()
    .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to build Tokio runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(async_main(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn async_main(config: ServiceConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!("Seeding monument store...");
    let store = MonumentStore::new();
    info!("Loaded {} monuments", store.get_monuments().len());

    let uploads = UploadDir::new(&config.uploads_dir);
    uploads.ensure_exists().await?;

    let classifier = config.build_classifier(&store)?;
    let state = AppState::new(store, uploads, classifier).with_max_upload_bytes(config.max_upload_bytes);

    let server = TuniServer::new(Arc::new(state), config.cors_origins.clone());
    server.run(config.addr, shutdown_signal()).await?;

    info!("Shutting down.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl+C, shutting down");
}
