use anyhow::Context;
use rowport_lib::shared::utils::init_logger;
use rowport_lib::shared::AppConfig;
use rowport_lib::{bootstrap, log_error, log_info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let services = bootstrap(&config)
        .await
        .context("failed to start import service")?;

    // Files named on the command line are queued before the worker starts
    for file_path in std::env::args().skip(1) {
        match services
            .import_service
            .submit(&file_path, None, None)
            .await
        {
            Ok(ack) => log_info!("{} (job {}, {})", ack.message, ack.job_id, file_path),
            Err(e) => log_error!("Could not queue {}: {}", file_path, e),
        }
    }

    let worker = services.worker.clone();
    let handle = tokio::spawn(worker.run());

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    log_info!("Shutdown requested");

    services.worker.stop().await;
    handle.await.context("worker task panicked")?;

    Ok(())
}
