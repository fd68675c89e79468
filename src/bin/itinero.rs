use anyhow::Result;
use itinero::cli::{start, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    let (globals, action) = start()?;

    let result = action.execute(&globals).await;

    telemetry::shutdown_tracer();

    result
}
