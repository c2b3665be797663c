//! Form session: owns the current snapshot and runs workflow tasks
//!
//! Workflow calls run as spawned tasks and report back over a channel, so
//! the UI loop never waits on the network.

use crate::services::{spawn_expiry, Field, FormEvent, FormState, SubmissionWorkflow};
use crate::ui::input::Action;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

pub struct App {
    state: FormState,
    focus: Field,
    workflow: SubmissionWorkflow,
    notification_ttl: Duration,
    events_tx: mpsc::UnboundedSender<FormEvent>,
    events_rx: mpsc::UnboundedReceiver<FormEvent>,
}

impl App {
    pub fn new(workflow: SubmissionWorkflow, notification_ttl: Duration) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            state: FormState::new(),
            focus: Field::Barcode,
            workflow,
            notification_ttl,
            events_tx,
            events_rx,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    /// Apply an event and arm the expiry timer for any new notification
    pub fn dispatch(&mut self, event: FormEvent) {
        let before = self.state.notification_id();
        self.state = self.state.apply(event);

        if let Some(id) = self.state.notification_id() {
            if Some(id) != before {
                spawn_expiry(
                    id,
                    self.notification_ttl,
                    self.events_tx.clone(),
                    FormEvent::NotificationExpired,
                );
            }
        }
    }

    /// Returns false when the user asked to quit
    pub fn handle_action(&mut self, action: Action) -> bool {
        match action {
            Action::None => {}
            Action::Quit => return false,
            Action::FocusNext => self.focus = self.focus.next(),
            Action::FocusPrev => self.focus = self.focus.prev(),
            Action::Form(event) => self.dispatch(event),
            Action::Submit => self.start_submit(),
            Action::Lookup => self.start_lookup(),
        }
        true
    }

    fn start_submit(&mut self) {
        if !self.state.can_submit() {
            debug!("submit_ignored_in_flight");
            return;
        }
        self.dispatch(FormEvent::SubmitStarted);
        info!(barcode = %self.state.draft.parcel_barcode, "submit_started");

        let draft = self.state.draft.clone();
        let workflow = self.workflow.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let phase_tx = tx.clone();
            let outcome = workflow
                .submit_complaint_observed(&draft, move |phase| {
                    let _ = phase_tx.send(FormEvent::PhaseChanged(phase));
                })
                .await;
            let _ = tx.send(FormEvent::SubmitFinished(outcome));
        });
    }

    /// Independent of the submit guard
    fn start_lookup(&mut self) {
        info!(barcode = %self.state.draft.parcel_barcode, "lookup_started");

        let draft = self.state.draft.clone();
        let workflow = self.workflow.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let report = workflow.fetch_parcel_details(&draft).await;
            let _ = tx.send(FormEvent::LookupFinished(report));
        });
    }

    /// Apply everything the background tasks have reported so far
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.dispatch(event);
        }
    }

    /// Wait for the next background event and apply it
    pub async fn process_next(&mut self) -> Option<FormEvent> {
        let event = self.events_rx.recv().await?;
        self.dispatch(event.clone());
        Some(event)
    }
}
