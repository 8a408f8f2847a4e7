use anyhow::Result;
use events_api::cli;

// Main function
#[tokio::main]
async fn main() -> Result<()> {
    let (action, telemetry) = cli::start()?;

    let result = action.execute().await;

    // Flush spans still buffered in the exporter.
    telemetry.shutdown()?;

    result
}
