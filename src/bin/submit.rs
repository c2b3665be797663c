//! One-shot complaint submission from the command line
//!
//! Runs the same workflow as the form: validate, look the parcel up, post.
//! With `--lookup-only` it stops after the lookup and prints the tracking
//! history instead.
//!
//! Usage:
//!   cargo run --bin reclamation-submit -- --barcode 123456789012 --phone 06123456 \
//!       --subject "Colis abîmé" --description "Carton ouvert" --reason damaged
//!
//! Exit code is 0 on success and 1 otherwise.

use clap::{Parser, ValueEnum};
use reclamation_form::domain::{ComplaintDraft, ReasonCode};
use reclamation_form::infra::{init_logging, Config, LogTarget, Metrics};
use reclamation_form::io::HttpGateway;
use reclamation_form::services::{LookupReport, SubmissionWorkflow};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Reason {
    Damaged,
    Late,
    CourierBehavior,
    Other,
}

impl From<Reason> for ReasonCode {
    fn from(reason: Reason) -> Self {
        match reason {
            Reason::Damaged => ReasonCode::Damaged,
            Reason::Late => ReasonCode::Late,
            Reason::CourierBehavior => ReasonCode::CourierBehavior,
            Reason::Other => ReasonCode::Other,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "reclamation-submit")]
#[command(about = "Submit a parcel delivery complaint")]
struct Args {
    /// Parcel barcode (12 digits)
    #[arg(short, long)]
    barcode: String,

    /// Recipient phone number (8 digits)
    #[arg(short, long)]
    phone: String,

    #[arg(short, long, default_value = "")]
    subject: String,

    #[arg(short, long, default_value = "")]
    description: String,

    #[arg(short, long, value_enum, default_value = "damaged")]
    reason: Reason,

    /// Only look the parcel up, do not post anything
    #[arg(long)]
    lookup_only: bool,

    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Base URL overriding both endpoints
    #[arg(long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(&[]),
    };
    if let Some(base) = &args.base_url {
        config = config.with_base_url(base);
    }

    // stdout carries the result, logs stay on stderr
    init_logging(&LogTarget::Stderr, config.log_json())?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        git_hash = env!("GIT_HASH"),
        tracking_url = %config.tracking_url(),
        complaint_url = %config.complaint_url(),
        "reclamation-submit starting"
    );

    let metrics = Arc::new(Metrics::new());
    let gateway = Arc::new(HttpGateway::new(config.gateway())?);
    let workflow = SubmissionWorkflow::new(gateway, metrics.clone());

    let draft = ComplaintDraft {
        parcel_barcode: args.barcode,
        phone_number: args.phone,
        subject: args.subject,
        description: args.description,
        reason: args.reason.into(),
    };

    let success = if args.lookup_only {
        let report = workflow.fetch_parcel_details(&draft).await;
        if let LookupReport::Found(details) = &report {
            for event in &details.evenements {
                println!("{}  {}", event.date, event.summary());
            }
        }
        match report.outcome() {
            Some(outcome) => {
                println!("{}", outcome.message);
                outcome.is_success()
            }
            None => {
                println!("Suivi indisponible pour le moment.");
                false
            }
        }
    } else {
        let outcome = workflow.submit_complaint(&draft).await;
        println!("{}", outcome.message);
        outcome.is_success()
    };

    metrics.summary().log();
    Ok(if success { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
