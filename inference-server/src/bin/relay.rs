//! Fallwatch Sensor Relay
//!
//! Bridges the accelerometer board's serial output to the inference server.

use fallwatch_server::relay::{Relay, RelayConfig, SerialSource};
use fallwatch_server::{init_tracing, DEFAULT_LOG_FILTER};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(DEFAULT_LOG_FILTER);
    let config = RelayConfig::from_env();

    // The board may not be plugged in yet
    let source = loop {
        match SerialSource::open(&config) {
            Ok(source) => break source,
            Err(e) => {
                tracing::error!("Cannot open {}: {}", config.serial_port, e);
                tokio::time::sleep(config.retry_delay).await;
            }
        }
    };

    tracing::info!("Waiting {:?} for the board to reset", config.settle_delay);
    tokio::time::sleep(config.settle_delay).await;

    let mut relay = Relay::new(config, source)?;
    relay.run().await;

    Ok(())
}
