//! Complaint submission workflow
//!
//! Two independent operations share the validation step but not their side
//! effects:
//! - `fetch_parcel_details` - lookup only. Declares success as soon as the
//!   parcel is found (nothing is posted) and swallows transport errors.
//! - `submit_complaint` - validate, lookup, then post the complaint. Every
//!   terminal state produces a visible outcome.
//!
//! Full submit state machine:
//!   Idle -> Validating -> {ValidationFailed, LookingUp}
//!   LookingUp -> {NotFound, RemoteErrorLookup, Submitting}
//!   Submitting -> {Success, RemoteErrorSubmit}

use crate::domain::validation::{is_valid_barcode, is_valid_phone};
use crate::domain::{
    ComplaintDraft, OutcomeKind, ParcelDetails, ParcelLookupResult, SubmissionOutcome,
};
use crate::infra::Metrics;
use crate::io::gateway::RemoteGateway;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowPhase {
    #[default]
    Idle,
    Validating,
    LookingUp,
    Submitting,
    ValidationFailed,
    NotFound,
    RemoteErrorLookup,
    Success,
    RemoteErrorSubmit,
}

impl WorkflowPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowPhase::Idle => "idle",
            WorkflowPhase::Validating => "validating",
            WorkflowPhase::LookingUp => "looking_up",
            WorkflowPhase::Submitting => "submitting",
            WorkflowPhase::ValidationFailed => "validation_failed",
            WorkflowPhase::NotFound => "not_found",
            WorkflowPhase::RemoteErrorLookup => "remote_error_lookup",
            WorkflowPhase::Success => "success",
            WorkflowPhase::RemoteErrorSubmit => "remote_error_submit",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WorkflowPhase::ValidationFailed
                | WorkflowPhase::NotFound
                | WorkflowPhase::RemoteErrorLookup
                | WorkflowPhase::Success
                | WorkflowPhase::RemoteErrorSubmit
        )
    }
}

/// What the lookup-only action found
#[derive(Debug, Clone, PartialEq)]
pub enum LookupReport {
    Invalid,
    NotFound,
    Found(ParcelDetails),
    /// Logged, never shown to the user
    TransportFailed,
}

impl LookupReport {
    /// Outcome shown for this report, if any
    pub fn outcome(&self) -> Option<SubmissionOutcome> {
        match self {
            LookupReport::Invalid => Some(SubmissionOutcome::validation_error()),
            LookupReport::NotFound => Some(SubmissionOutcome::not_found()),
            // Mirrors the form: a found parcel is announced as a sent complaint
            LookupReport::Found(_) => Some(SubmissionOutcome::success()),
            LookupReport::TransportFailed => None,
        }
    }
}

fn draft_is_valid(draft: &ComplaintDraft) -> bool {
    is_valid_phone(&draft.phone_number) && is_valid_barcode(&draft.parcel_barcode)
}

#[derive(Clone)]
pub struct SubmissionWorkflow {
    gateway: Arc<dyn RemoteGateway>,
    metrics: Arc<Metrics>,
}

impl SubmissionWorkflow {
    pub fn new(gateway: Arc<dyn RemoteGateway>, metrics: Arc<Metrics>) -> Self {
        Self { gateway, metrics }
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Lookup-only action
    pub async fn fetch_parcel_details(&self, draft: &ComplaintDraft) -> LookupReport {
        let attempt_id = Uuid::now_v7();

        if !draft_is_valid(draft) {
            info!(attempt_id = %attempt_id, "lookup_validation_failed");
            self.metrics.record_outcome(OutcomeKind::ValidationError);
            return LookupReport::Invalid;
        }

        self.metrics.record_lookup();
        let report = match self.gateway.lookup(&draft.parcel_barcode, &draft.phone_number).await {
            Ok(ParcelLookupResult::NotFound) => LookupReport::NotFound,
            Ok(ParcelLookupResult::Found(details)) => LookupReport::Found(details.into_sorted()),
            Ok(ParcelLookupResult::Confirmed) => {
                // No event list to show; handled like a failed fetch
                warn!(
                    attempt_id = %attempt_id,
                    barcode = %draft.parcel_barcode,
                    "lookup_events_unreadable"
                );
                self.metrics.record_lookup_transport_error();
                return LookupReport::TransportFailed;
            }
            Err(e) => {
                // Logged only, never surfaced to the user
                warn!(
                    attempt_id = %attempt_id,
                    barcode = %draft.parcel_barcode,
                    error = %e,
                    "lookup_transport_error"
                );
                self.metrics.record_lookup_transport_error();
                return LookupReport::TransportFailed;
            }
        };

        if let Some(outcome) = report.outcome() {
            self.metrics.record_outcome(outcome.kind);
            info!(
                attempt_id = %attempt_id,
                barcode = %draft.parcel_barcode,
                outcome = %outcome.kind.as_str(),
                "lookup_finished"
            );
        }
        report
    }

    /// Full submit action
    pub async fn submit_complaint(&self, draft: &ComplaintDraft) -> SubmissionOutcome {
        self.submit_complaint_observed(draft, |_| {}).await
    }

    /// Full submit, reporting each phase transition to `observe`
    pub async fn submit_complaint_observed<F>(
        &self,
        draft: &ComplaintDraft,
        mut observe: F,
    ) -> SubmissionOutcome
    where
        F: FnMut(WorkflowPhase) + Send,
    {
        let attempt_id = Uuid::now_v7();
        let mut enter = |phase: WorkflowPhase| {
            info!(attempt_id = %attempt_id, phase = %phase.as_str(), "submit_phase");
            observe(phase);
        };

        enter(WorkflowPhase::Validating);
        let (phase, outcome) = if !draft_is_valid(draft) {
            (WorkflowPhase::ValidationFailed, SubmissionOutcome::validation_error())
        } else {
            enter(WorkflowPhase::LookingUp);
            self.metrics.record_lookup();
            match self.gateway.lookup(&draft.parcel_barcode, &draft.phone_number).await {
                Ok(ParcelLookupResult::NotFound) => {
                    (WorkflowPhase::NotFound, SubmissionOutcome::not_found())
                }
                Err(e) => {
                    warn!(attempt_id = %attempt_id, error = %e, "submit_lookup_failed");
                    (WorkflowPhase::RemoteErrorLookup, SubmissionOutcome::remote_error())
                }
                Ok(ParcelLookupResult::Found(_) | ParcelLookupResult::Confirmed) => {
                    enter(WorkflowPhase::Submitting);
                    self.metrics.record_submission();
                    match self.gateway.submit(&draft.to_payload()).await {
                        Ok(()) => (WorkflowPhase::Success, SubmissionOutcome::success()),
                        Err(e) => {
                            warn!(attempt_id = %attempt_id, error = %e, "submit_post_failed");
                            (WorkflowPhase::RemoteErrorSubmit, SubmissionOutcome::remote_error())
                        }
                    }
                }
            }
        };
        enter(phase);

        self.metrics.record_outcome(outcome.kind);
        info!(
            attempt_id = %attempt_id,
            barcode = %draft.parcel_barcode,
            reason = %draft.reason,
            outcome = %outcome.kind.as_str(),
            "submit_finished"
        );
        outcome
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::{ComplaintPayload, ReasonCode, TrackingEvent};
    use crate::io::gateway::GatewayError;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::Map;

    #[derive(Clone, Copy)]
    pub(crate) enum LookupBehavior {
        NotFound,
        Found,
        Confirmed,
        Fail,
    }

    /// Scripted gateway that records every call
    pub(crate) struct FakeGateway {
        lookup: LookupBehavior,
        submit_ok: bool,
        pub lookups: Mutex<Vec<(String, String)>>,
        pub submissions: Mutex<Vec<ComplaintPayload>>,
    }

    impl FakeGateway {
        pub(crate) fn new(lookup: LookupBehavior, submit_ok: bool) -> Self {
            Self {
                lookup,
                submit_ok,
                lookups: Mutex::new(Vec::new()),
                submissions: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn call_count(&self) -> usize {
            self.lookups.lock().len() + self.submissions.lock().len()
        }
    }

    fn event(date: &str) -> TrackingEvent {
        TrackingEvent { date: date.to_string(), extra: Map::new() }
    }

    #[async_trait]
    impl RemoteGateway for FakeGateway {
        async fn lookup(
            &self,
            barcode: &str,
            phone: &str,
        ) -> Result<ParcelLookupResult, GatewayError> {
            self.lookups.lock().push((barcode.to_string(), phone.to_string()));
            match self.lookup {
                LookupBehavior::NotFound => Ok(ParcelLookupResult::NotFound),
                LookupBehavior::Found => Ok(ParcelLookupResult::Found(ParcelDetails {
                    evenements: vec![event("2024-02-10T09:00"), event("2024-02-08T17:45")],
                    metadata: Map::new(),
                })),
                LookupBehavior::Confirmed => Ok(ParcelLookupResult::Confirmed),
                LookupBehavior::Fail => Err(GatewayError::Status(503)),
            }
        }

        async fn submit(&self, payload: &ComplaintPayload) -> Result<(), GatewayError> {
            self.submissions.lock().push(payload.clone());
            if self.submit_ok {
                Ok(())
            } else {
                Err(GatewayError::Status(500))
            }
        }
    }

    pub(crate) fn valid_draft() -> ComplaintDraft {
        ComplaintDraft {
            parcel_barcode: "123456789012".to_string(),
            phone_number: "06123456".to_string(),
            subject: "Produit endommagé".to_string(),
            description: "Le carton est arrivé ouvert.".to_string(),
            reason: ReasonCode::Late,
        }
    }

    fn workflow(gateway: &Arc<FakeGateway>) -> SubmissionWorkflow {
        SubmissionWorkflow::new(gateway.clone(), Arc::new(Metrics::new()))
    }

    #[tokio::test]
    async fn test_invalid_phone_makes_no_calls() {
        let gateway = Arc::new(FakeGateway::new(LookupBehavior::Found, true));
        let draft = ComplaintDraft { phone_number: "123".to_string(), ..valid_draft() };

        let outcome = workflow(&gateway).submit_complaint(&draft).await;

        assert_eq!(outcome.kind, OutcomeKind::ValidationError);
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_not_found_skips_post() {
        let gateway = Arc::new(FakeGateway::new(LookupBehavior::NotFound, true));

        let outcome = workflow(&gateway).submit_complaint(&valid_draft()).await;

        assert_eq!(outcome.kind, OutcomeKind::NotFound);
        assert_eq!(gateway.lookups.lock().len(), 1);
        assert!(gateway.submissions.lock().is_empty());
    }

    #[tokio::test]
    async fn test_success_posts_payload() {
        let gateway = Arc::new(FakeGateway::new(LookupBehavior::Found, true));

        let outcome = workflow(&gateway).submit_complaint(&valid_draft()).await;

        assert_eq!(outcome, SubmissionOutcome::success());
        assert_eq!(
            gateway.lookups.lock().as_slice(),
            &[("123456789012".to_string(), "06123456".to_string())]
        );
        let submissions = gateway.submissions.lock();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0], valid_draft().to_payload());
        assert_eq!(submissions[0].reason, ReasonCode::Late);
    }

    #[tokio::test]
    async fn test_post_failure_is_remote_error() {
        let gateway = Arc::new(FakeGateway::new(LookupBehavior::Found, false));

        let outcome = workflow(&gateway).submit_complaint(&valid_draft()).await;

        assert_eq!(outcome.kind, OutcomeKind::RemoteError);
        assert_eq!(gateway.submissions.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_lookup_failure_on_submit_path_is_visible() {
        let gateway = Arc::new(FakeGateway::new(LookupBehavior::Fail, true));

        let outcome = workflow(&gateway).submit_complaint(&valid_draft()).await;

        assert_eq!(outcome.kind, OutcomeKind::RemoteError);
        assert!(gateway.submissions.lock().is_empty());
    }

    #[tokio::test]
    async fn test_confirmed_lookup_without_events_still_posts() {
        let gateway = Arc::new(FakeGateway::new(LookupBehavior::Confirmed, true));

        let outcome = workflow(&gateway).submit_complaint(&valid_draft()).await;

        assert_eq!(outcome.kind, OutcomeKind::Success);
        assert_eq!(gateway.submissions.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_phase_sequences() {
        let cases = [
            (
                LookupBehavior::Found,
                true,
                vec![
                    WorkflowPhase::Validating,
                    WorkflowPhase::LookingUp,
                    WorkflowPhase::Submitting,
                    WorkflowPhase::Success,
                ],
            ),
            (
                LookupBehavior::Found,
                false,
                vec![
                    WorkflowPhase::Validating,
                    WorkflowPhase::LookingUp,
                    WorkflowPhase::Submitting,
                    WorkflowPhase::RemoteErrorSubmit,
                ],
            ),
            (
                LookupBehavior::NotFound,
                true,
                vec![WorkflowPhase::Validating, WorkflowPhase::LookingUp, WorkflowPhase::NotFound],
            ),
            (
                LookupBehavior::Fail,
                true,
                vec![
                    WorkflowPhase::Validating,
                    WorkflowPhase::LookingUp,
                    WorkflowPhase::RemoteErrorLookup,
                ],
            ),
        ];

        for (lookup, submit_ok, expected) in cases {
            let gateway = Arc::new(FakeGateway::new(lookup, submit_ok));
            let mut phases = Vec::new();
            workflow(&gateway).submit_complaint_observed(&valid_draft(), |p| phases.push(p)).await;
            assert_eq!(phases, expected);
            assert!(phases.last().is_some_and(|p| p.is_terminal()));
        }
    }

    #[tokio::test]
    async fn test_fetch_found_declares_success_without_posting() {
        let gateway = Arc::new(FakeGateway::new(LookupBehavior::Found, true));

        let report = workflow(&gateway).fetch_parcel_details(&valid_draft()).await;

        let LookupReport::Found(ref details) = report else {
            panic!("expected Found, got {:?}", report);
        };
        assert_eq!(details.evenements[0].date, "2024-02-08T17:45");
        assert_eq!(details.evenements[1].date, "2024-02-10T09:00");
        assert_eq!(report.outcome(), Some(SubmissionOutcome::success()));
        assert!(gateway.submissions.lock().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_swallows_transport_error() {
        let gateway = Arc::new(FakeGateway::new(LookupBehavior::Fail, true));
        let wf = workflow(&gateway);

        let report = wf.fetch_parcel_details(&valid_draft()).await;

        assert_eq!(report, LookupReport::TransportFailed);
        assert_eq!(report.outcome(), None);
        assert_eq!(wf.metrics().summary().lookup_transport_errors, 1);
    }

    #[tokio::test]
    async fn test_fetch_without_events_is_swallowed() {
        let gateway = Arc::new(FakeGateway::new(LookupBehavior::Confirmed, true));
        let wf = workflow(&gateway);

        let report = wf.fetch_parcel_details(&valid_draft()).await;

        assert_eq!(report, LookupReport::TransportFailed);
        assert_eq!(report.outcome(), None);
        assert_eq!(wf.metrics().summary().lookup_transport_errors, 1);
        assert!(gateway.submissions.lock().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_invalid_and_not_found() {
        let gateway = Arc::new(FakeGateway::new(LookupBehavior::NotFound, true));
        let wf = workflow(&gateway);

        let invalid = ComplaintDraft { parcel_barcode: "12".to_string(), ..valid_draft() };
        assert_eq!(wf.fetch_parcel_details(&invalid).await, LookupReport::Invalid);
        assert!(gateway.lookups.lock().is_empty());

        let report = wf.fetch_parcel_details(&valid_draft()).await;
        assert_eq!(report, LookupReport::NotFound);
        assert_eq!(report.outcome().map(|o| o.kind), Some(OutcomeKind::NotFound));
    }
}
