use anyhow::Result;
use tracing::{debug, info};

use smsbank_hive::{config::Config, logging, Hive};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    logging::init_logging(&config.logging)?;

    info!("Starting SMS Bank hive v{}", env!("CARGO_PKG_VERSION"));

    let hive = Hive::connect(&config).await?;

    info!("Running database migrations...");
    hive.migrate().await?;
    info!("Migrations completed");

    persistence::metrics::record_pool_metrics(&hive.store().pool().await);

    let devices = hive.devices().list_summaries().await?;
    let online = devices.iter().filter(|d| d.online).count();
    for device in &devices {
        debug!(
            id = device.id,
            device_id = ?device.device_id,
            address = %device.address,
            online = device.online,
            "Registered device"
        );
    }
    info!(
        registered = devices.len(),
        online = online,
        "Device registry ready"
    );

    Ok(())
}
