//! Remote tracking/complaint service client
//!
//! Two calls:
//! - GET  <tracking_url>?POSBARCODE=..&POSPORTABLE=..  -> "inexistant" | {evenements: [...]}
//! - POST <complaint_url> {POSBARCODE, POSPORTABLE, REC_OBJET, REC_DESC, REC_MOTIF}
//!
//! No retries; the caller decides what a failure means for the user.

use crate::domain::{ComplaintPayload, ParcelDetails, ParcelLookupResult};
use crate::infra::GatewayConfig;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info};

/// Body the tracking endpoint returns for an unknown parcel/phone pair
pub const NOT_FOUND_SENTINEL: &str = "inexistant";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
}

/// Log request failure (cold path)
#[cold]
fn log_request_failed(call: &str, latency_us: u64, e: &GatewayError) {
    error!(call = %call, latency_us = %latency_us, error = %e, "gateway_request_failed");
}

#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Confirm the parcel/phone pair and fetch its tracking events
    async fn lookup(&self, barcode: &str, phone: &str) -> Result<ParcelLookupResult, GatewayError>;

    /// Post a complaint. Any 2xx is success.
    async fn submit(&self, payload: &ComplaintPayload) -> Result<(), GatewayError>;
}

/// Interpret a tracking response body.
///
/// The sentinel may arrive bare or as a JSON string. Any other body confirms
/// the pair; it becomes `Found` only when it is a JSON object carrying an
/// `evenements` array, and those events come back sorted.
pub fn parse_lookup_body(body: &str) -> ParcelLookupResult {
    let trimmed = body.trim();
    if trimmed == NOT_FOUND_SENTINEL {
        return ParcelLookupResult::NotFound;
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::String(s)) if s == NOT_FOUND_SENTINEL => ParcelLookupResult::NotFound,
        Ok(value @ Value::Object(_)) => match serde_json::from_value::<ParcelDetails>(value) {
            Ok(details) => ParcelLookupResult::Found(details.into_sorted()),
            Err(e) => {
                debug!(error = %e, "tracking_body_without_events");
                ParcelLookupResult::Confirmed
            }
        },
        _ => ParcelLookupResult::Confirmed,
    }
}

pub struct HttpGateway {
    config: GatewayConfig,
    client: reqwest::Client,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        // One client for both calls (connection pooling)
        let mut builder = reqwest::Client::builder().http1_only();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    async fn fetch_tracking(&self, barcode: &str, phone: &str) -> Result<ParcelLookupResult, GatewayError> {
        let response = self
            .client
            .get(&self.config.tracking_url)
            .query(&[("POSBARCODE", barcode), ("POSPORTABLE", phone)])
            .header("Accept", "application/json, text/plain, */*")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(parse_lookup_body(&body))
    }

    async fn post_complaint(&self, payload: &ComplaintPayload) -> Result<u16, GatewayError> {
        let response = self.client.post(&self.config.complaint_url).json(payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16()));
        }
        Ok(status.as_u16())
    }
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn lookup(&self, barcode: &str, phone: &str) -> Result<ParcelLookupResult, GatewayError> {
        let start = Instant::now();
        debug!(barcode = %barcode, url = %self.config.tracking_url, "gateway_lookup_request");

        let result = self.fetch_tracking(barcode, phone).await;
        let latency_us = start.elapsed().as_micros() as u64;

        match &result {
            Ok(ParcelLookupResult::NotFound) => {
                info!(barcode = %barcode, latency_us = %latency_us, "gateway_lookup_not_found");
            }
            Ok(ParcelLookupResult::Found(details)) => {
                info!(
                    barcode = %barcode,
                    latency_us = %latency_us,
                    events = %details.evenements.len(),
                    "gateway_lookup_found"
                );
            }
            Ok(ParcelLookupResult::Confirmed) => {
                info!(barcode = %barcode, latency_us = %latency_us, "gateway_lookup_confirmed");
            }
            Err(e) => log_request_failed("lookup", latency_us, e),
        }
        result
    }

    async fn submit(&self, payload: &ComplaintPayload) -> Result<(), GatewayError> {
        let start = Instant::now();
        debug!(barcode = %payload.barcode, url = %self.config.complaint_url, "gateway_submit_request");

        let result = self.post_complaint(payload).await;
        let latency_us = start.elapsed().as_micros() as u64;

        match result {
            Ok(status) => {
                info!(
                    barcode = %payload.barcode,
                    reason = %payload.reason,
                    latency_us = %latency_us,
                    status = %status,
                    "gateway_complaint_posted"
                );
                Ok(())
            }
            Err(e) => {
                log_request_failed("submit", latency_us, &e);
                Err(e)
            }
        }
    }
}
