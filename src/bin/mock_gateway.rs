//! Mock tracking/complaint service for local testing
//!
//! Serves the tracking lookup and complaint endpoints with a handful of
//! demo parcels, each carrying an unordered event history.
//!
//! Usage:
//!   cargo run --bin mock-gateway -- --port 8059 --parcels 123456789012:06123456
//!   cargo run --bin reclamation-form -- --base-url http://127.0.0.1:8059

use clap::Parser;
use reclamation_form::infra::{init_logging, LogTarget};
use reclamation_form::io::{start_mock_server, MockBackend};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "mock-gateway")]
#[command(about = "Mock parcel tracking and complaint endpoints")]
struct Args {
    /// HTTP port to listen on
    #[arg(short, long, default_value = "8059")]
    port: u16,

    /// Known parcels as barcode:phone pairs, comma separated
    #[arg(long, default_value = "123456789012:06123456")]
    parcels: String,

    /// Answer every complaint with HTTP 500
    #[arg(long)]
    fail_submissions: bool,
}

fn parse_parcels(list: &str) -> Vec<(String, String)> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|pair| {
            let parsed = pair.split_once(':').map(|(b, p)| (b.to_string(), p.to_string()));
            if parsed.is_none() {
                warn!(entry = %pair, "mock_parcel_entry_ignored");
            }
            parsed
        })
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&LogTarget::Stderr, false)?;

    let backend = Arc::new(MockBackend::new());
    for (barcode, phone) in parse_parcels(&args.parcels) {
        info!(barcode = %barcode, phone = %phone, "mock_parcel_registered");
        backend.add_demo_parcel(&barcode, &phone);
    }
    backend.set_fail_submissions(args.fail_submissions);

    let listener = TcpListener::bind(("0.0.0.0", args.port)).await?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
            let _ = shutdown_tx.send(true);
        }
    });

    start_mock_server(listener, backend, shutdown_rx)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_parcels() {
        let parcels = parse_parcels("123456789012:06123456, 000000000001:11111111,bogus,");
        assert_eq!(
            parcels,
            vec![
                ("123456789012".to_string(), "06123456".to_string()),
                ("000000000001".to_string(), "11111111".to_string()),
            ]
        );
    }
}
