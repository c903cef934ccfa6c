//! fix-review - review and select suggested integer fixes in the terminal
//!
//! Talks to the fix backend over HTTP, shows each file's fix hierarchy
//! next to its source, and reports the selection when the review ends.

use anyhow::Result;
use clap::Parser;
use fix_review::config::{Config, ENDPOINT_ENV};
use fix_review::endpoint::EndpointClient;
use fix_review::session::ReviewMode;
use fix_review::{app, logging};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "fix-review",
    about = "Review suggested integer fixes and choose which to apply",
    version
)]
struct Args {
    /// Backend URL (overrides FIX_REVIEW_ENDPOINT and the config file)
    #[arg(long)]
    endpoint: Option<String>,

    /// Start in a review mode: global or manual
    #[arg(long, value_parser = parse_mode)]
    mode: Option<ReviewMode>,

    /// Save a default backend URL to the config file and exit
    #[arg(long, value_name = "URL")]
    set_endpoint: Option<String>,
}

fn parse_mode(raw: &str) -> Result<ReviewMode, String> {
    ReviewMode::parse(raw)
        .ok_or_else(|| format!("unknown mode '{}' (expected global or manual)", raw))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = Config::load();

    // Handle --set-endpoint flag
    if let Some(url) = args.set_endpoint {
        config.set_endpoint(&url).map_err(|e| anyhow::anyhow!(e))?;
        config.save().map_err(|e| anyhow::anyhow!(e))?;
        eprintln!("  + Endpoint saved to {}", Config::config_location());
        return Ok(());
    }

    if let Some(path) = logging::init(config.log_filter.as_deref()) {
        eprintln!("  Logging to {}", path.display());
    }

    let env = std::env::var(ENDPOINT_ENV).ok();
    let endpoint = config
        .resolve_endpoint(args.endpoint.as_deref(), env.as_deref())
        .map_err(|e| anyhow::anyhow!(e))?;
    let client = EndpointClient::new(endpoint, Duration::from_secs(config.request_timeout_secs))?;
    eprintln!("  Connecting to {}", client.base());

    app::run_tui(&config, client, args.mode).await
}
