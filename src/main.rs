//! # Digit Pipeline Demo
//!
//! Feeds comma-separated lines through `splitter -> digits -> printer` and
//! prints what the printer persisted.
//!
//! Each command-line argument is one line of input; without arguments the demo
//! uses `"11,22,3b3"` and `"44,55,66"`.

use dataflow_actors::digits::DigitPipeline;
use dataflow_actors::runtime::{setup_tracing, SystemConfig};
use futures::StreamExt;
use std::time::Duration;
use tracing::{error, info, warn};

const DEFAULT_INPUT: [&str; 2] = ["11,22,3b3", "44,55,66"];

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = SystemConfig::from_env(Duration::from_secs(2))
        .map_err(|e| e.to_string())?
        .with_drain_timeout(Duration::from_millis(200));
    let pipeline = DigitPipeline::new(config).map_err(|e| e.to_string())?;

    let mut lines: Vec<String> = std::env::args().skip(1).collect();
    if lines.is_empty() {
        lines = DEFAULT_INPUT.iter().map(|line| line.to_string()).collect();
    }

    let system = pipeline.system.clone();
    let run = tokio::spawn(async move { system.run().await });

    for line in &lines {
        info!(line = %line, "Feeding input");
        pipeline.feed(line.as_str()).map_err(|e| e.to_string())?;
    }

    let report = run
        .await
        .map_err(|e| e.to_string())?
        .map_err(|e| e.to_string())?;
    for failure in &report.failures {
        error!(error = %failure, "Loop failure");
    }

    let results: Vec<String> = pipeline
        .system
        .stream_results(pipeline.printer, None)
        .map_err(|e| e.to_string())?
        .filter_map(|payload| async move { payload.as_str().map(str::to_owned) })
        .collect()
        .await;
    info!(?results, "Printer results");

    let exceptions = pipeline
        .system
        .stream_exceptions(pipeline.printer, None)
        .map_err(|e| e.to_string())?;
    tokio::pin!(exceptions);
    while let Some(fault) = exceptions.next().await {
        warn!(error = %fault, "Printer exception");
    }

    info!(clean = report.is_clean(), "Demo finished");
    Ok(())
}
