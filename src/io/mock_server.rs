//! Local stand-in for the tracking and complaint endpoints
//!
//! Serves the same paths as the real service so the form can run against
//! it via `Config::with_base_url`:
//! - GET  /WebServiceExterne/tracking_position_STG?POSBARCODE=..&POSPORTABLE=..
//! - POST /WebServiceExterne/add_reclamation_STG
//!
//! Uses hyper for the HTTP server.

use crate::domain::{ComplaintPayload, ParcelDetails, TrackingEvent};
use crate::io::gateway::NOT_FOUND_SENTINEL;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use parking_lot::Mutex;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info, warn};

pub const TRACKING_PATH: &str = "/WebServiceExterne/tracking_position_STG";
pub const COMPLAINT_PATH: &str = "/WebServiceExterne/add_reclamation_STG";

/// Parcels the mock knows about and the complaints it has received
#[derive(Debug, Default)]
pub struct MockBackend {
    parcels: Mutex<HashMap<(String, String), ParcelDetails>>,
    complaints: Mutex<Vec<ComplaintPayload>>,
    fail_submissions: AtomicBool,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_parcel(&self, barcode: &str, phone: &str, details: ParcelDetails) {
        self.parcels.lock().insert((barcode.to_string(), phone.to_string()), details);
    }

    /// Register a parcel with a short, deliberately unordered event history
    pub fn add_demo_parcel(&self, barcode: &str, phone: &str) {
        let event = |date: &str, libelle: &str| {
            let mut extra = Map::new();
            extra.insert("libelle".to_string(), Value::String(libelle.to_string()));
            TrackingEvent { date: date.to_string(), extra }
        };

        let mut metadata = Map::new();
        metadata.insert("POSBARCODE".to_string(), Value::String(barcode.to_string()));
        metadata.insert("POSPORTABLE".to_string(), Value::String(phone.to_string()));

        let details = ParcelDetails {
            evenements: vec![
                event("2024-06-03 14:10", "En cours de livraison"),
                event("2024-06-01 08:45", "Colis pris en charge"),
                event("2024-06-02 19:30", "Arrivé au centre de tri"),
            ],
            metadata,
        };
        self.add_parcel(barcode, phone, details);
    }

    pub fn set_fail_submissions(&self, fail: bool) {
        self.fail_submissions.store(fail, Ordering::Relaxed);
    }

    pub fn complaints(&self) -> Vec<ComplaintPayload> {
        self.complaints.lock().clone()
    }

    fn lookup(&self, barcode: &str, phone: &str) -> Option<ParcelDetails> {
        self.parcels.lock().get(&(barcode.to_string(), phone.to_string())).cloned()
    }
}

fn query_param<'a>(query: &'a str, key: &str) -> Option<&'a str> {
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == key).then_some(v)
    })
}

fn json_response(status: StatusCode, body: Value) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(Bytes::from(body.to_string())))
        .expect("static response should not fail")
}

async fn handle_request(
    req: Request<Incoming>,
    backend: Arc<MockBackend>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    match (req.method(), req.uri().path()) {
        (&Method::GET, TRACKING_PATH) => {
            let query = req.uri().query().unwrap_or("");
            let barcode = query_param(query, "POSBARCODE").unwrap_or("");
            let phone = query_param(query, "POSPORTABLE").unwrap_or("");

            match backend.lookup(barcode, phone) {
                Some(details) => {
                    info!(barcode = %barcode, "mock_tracking_found");
                    let body = serde_json::to_value(&details).unwrap_or(Value::Null);
                    Ok(json_response(StatusCode::OK, body))
                }
                None => {
                    info!(barcode = %barcode, "mock_tracking_not_found");
                    Ok(json_response(StatusCode::OK, Value::String(NOT_FOUND_SENTINEL.to_string())))
                }
            }
        }
        (&Method::POST, COMPLAINT_PATH) => {
            let body = match req.into_body().collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(e) => {
                    warn!(error = %e, "mock_complaint_body_error");
                    return Ok(json_response(StatusCode::BAD_REQUEST, json!({"ok": false})));
                }
            };

            let payload: ComplaintPayload = match serde_json::from_slice(&body) {
                Ok(p) => p,
                Err(e) => {
                    warn!(error = %e, "mock_complaint_invalid_json");
                    return Ok(json_response(StatusCode::BAD_REQUEST, json!({"ok": false})));
                }
            };

            if backend.fail_submissions.load(Ordering::Relaxed) {
                warn!(barcode = %payload.barcode, "mock_complaint_forced_failure");
                return Ok(json_response(StatusCode::INTERNAL_SERVER_ERROR, json!({"ok": false})));
            }

            info!(barcode = %payload.barcode, reason = %payload.reason, "mock_complaint_received");
            backend.complaints.lock().push(payload);
            Ok(json_response(StatusCode::OK, json!({"ok": true})))
        }
        _ => Ok(Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Full::new(Bytes::from("Not Found")))
            .expect("static response should not fail")),
    }
}

/// Serve the mock endpoints on `listener` until `shutdown` flips to true
pub async fn start_mock_server(
    listener: TcpListener,
    backend: Arc<MockBackend>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!(addr = %listener.local_addr()?, "mock_gateway_started");

    loop {
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok((stream, _addr)) => {
                        let io = TokioIo::new(stream);
                        let backend = backend.clone();

                        tokio::spawn(async move {
                            let service = service_fn(move |req| {
                                let backend = backend.clone();
                                async move { handle_request(req, backend).await }
                            });

                            if let Err(e) = http1::Builder::new()
                                .serve_connection(io, service)
                                .await
                            {
                                error!(error = %e, "mock_gateway_http_error");
                            }
                        });
                    }
                    Err(e) => {
                        error!(error = %e, "mock_gateway_accept_error");
                    }
                }
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    info!("mock_gateway_shutdown");
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ComplaintDraft, OutcomeKind, ParcelLookupResult, ReasonCode};
    use crate::infra::{Config, Metrics};
    use crate::io::gateway::{HttpGateway, RemoteGateway};
    use crate::services::SubmissionWorkflow;

    #[test]
    fn test_query_param() {
        let q = "POSBARCODE=123456789012&POSPORTABLE=06123456";
        assert_eq!(query_param(q, "POSBARCODE"), Some("123456789012"));
        assert_eq!(query_param(q, "POSPORTABLE"), Some("06123456"));
        assert_eq!(query_param(q, "OTHER"), None);
    }

    async fn spawn_server(backend: Arc<MockBackend>) -> (Config, watch::Sender<bool>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        tokio::spawn(start_mock_server(listener, backend, shutdown_rx));
        (Config::default().with_base_url(&format!("http://{}", addr)), shutdown_tx)
    }

    #[tokio::test]
    async fn test_http_gateway_against_mock() {
        let backend = Arc::new(MockBackend::new());
        backend.add_demo_parcel("123456789012", "06123456");
        let (config, shutdown) = spawn_server(backend.clone()).await;
        let gateway = HttpGateway::new(config.gateway()).unwrap();

        let result = gateway.lookup("123456789012", "06123456").await.unwrap();
        let ParcelLookupResult::Found(details) = result else {
            panic!("expected Found");
        };
        let dates: Vec<_> = details.evenements.iter().map(|e| e.date.clone()).collect();
        assert_eq!(dates, ["2024-06-01 08:45", "2024-06-02 19:30", "2024-06-03 14:10"]);

        let missing = gateway.lookup("123456789012", "99999999").await.unwrap();
        assert_eq!(missing, ParcelLookupResult::NotFound);

        let _ = shutdown.send(true);
    }

    #[tokio::test]
    async fn test_full_submit_against_mock() {
        let backend = Arc::new(MockBackend::new());
        backend.add_demo_parcel("123456789012", "06123456");
        let (config, shutdown) = spawn_server(backend.clone()).await;
        let gateway = Arc::new(HttpGateway::new(config.gateway()).unwrap());
        let workflow = SubmissionWorkflow::new(gateway, Arc::new(Metrics::new()));

        let draft = ComplaintDraft {
            parcel_barcode: "123456789012".to_string(),
            phone_number: "06123456".to_string(),
            subject: "Livraison en retard".to_string(),
            description: "Toujours pas reçu".to_string(),
            reason: ReasonCode::Late,
        };

        assert_eq!(workflow.submit_complaint(&draft).await.kind, OutcomeKind::Success);
        let complaints = backend.complaints();
        assert_eq!(complaints.len(), 1);
        assert_eq!(complaints[0].reason, ReasonCode::Late);

        backend.set_fail_submissions(true);
        assert_eq!(workflow.submit_complaint(&draft).await.kind, OutcomeKind::RemoteError);
        assert_eq!(backend.complaints().len(), 1);

        let _ = shutdown.send(true);
    }
}
