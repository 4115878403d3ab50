//! # Orion Discovery
//!
//! Reads a discovery request as JSON from the file named on the command line, or
//! from stdin, submits it to the configured Orion platform and prints the
//! platform's result as JSON.

use std::io::Read;
use std::process::ExitCode;

use error_stack::ResultExt;
use orion_discovery::support::tracing::TracingLevel;
use orion_discovery::{
    DiscoveryConfig, DiscoveryRequest, DiscoverySubmitter, Error, Result, SwisConnector,
};
use serde_json::json;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(report) => {
            eprintln!("{report:?}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let config = DiscoveryConfig::load()?;

    // Lazy file creation - the log only appears once something is worth logging
    TracingLevel::resolve(config.log_level.as_deref()).init_file_tracing();

    submit(config).await.inspect_err(|report| {
        tracing::error!("Discovery submission failed: {}", report.current_context());
    })
}

async fn submit(config: DiscoveryConfig) -> Result<()> {
    let request = read_request()?;
    let platform = config.resolve_platform(request.platform.as_deref())?;

    let submitter = DiscoverySubmitter::new(SwisConnector::new(config.clone()), config);
    let handle = submitter.submit_discovery(&request).await?;

    let output = json!({ "platform": platform, "result": handle });
    println!("{output:#}");
    Ok(())
}

fn read_request() -> Result<DiscoveryRequest> {
    let (source, input) = match std::env::args().nth(1) {
        Some(path) => {
            let input = std::fs::read_to_string(&path)
                .change_context(Error::InvalidRequest(format!("Failed to read {path}")))?;
            (path, input)
        }
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .change_context(Error::InvalidRequest("Failed to read stdin".into()))?;
            ("stdin".to_string(), input)
        }
    };

    serde_json::from_str(&input)
        .change_context(Error::InvalidRequest(format!("Failed to parse request from {source}")))
}
