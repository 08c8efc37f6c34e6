mod menu;
mod shutdown;
mod startup;

use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting kokous");

    // Load configuration
    let config = startup::load_config().await?;

    // Start the calendar
    startup::start_app(config).await
}
