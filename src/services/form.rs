//! Form state holder
//!
//! `FormState::apply` is a pure reducer: it takes an event and returns the
//! next snapshot. The UI renders snapshots; async work reports back through
//! events.

use crate::domain::validation::{accepts_barcode_input, accepts_phone_input, apply_filtered};
use crate::domain::{ComplaintDraft, ParcelDetails, ReasonCode, SubmissionOutcome};
use crate::services::notification::Notification;
use crate::services::workflow::{LookupReport, WorkflowPhase};

/// Focusable form controls, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Barcode,
    Phone,
    Subject,
    Description,
    Reason,
    Submit,
}

impl Field {
    pub const ORDER: [Field; 6] =
        [Field::Barcode, Field::Phone, Field::Subject, Field::Description, Field::Reason, Field::Submit];

    pub fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::Barcode => "Numéro de Colis (Code à barres)",
            Field::Phone => "Numéro de Téléphone",
            Field::Subject => "Objet de la Réclamation",
            Field::Description => "Description de la Réclamation",
            Field::Reason => "Motif",
            Field::Submit => "Envoyer",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Field::Barcode => "Ex: 123456789012",
            Field::Phone => "Ex: 06123456",
            Field::Subject => "Ex: Produit endommagé",
            Field::Description => "Expliquez votre réclamation ici...",
            Field::Reason | Field::Submit => "",
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Field::Barcode | Field::Phone | Field::Subject | Field::Description)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    /// Candidate value for a text field. Barcode and phone go through the
    /// typing filter; a rejected value is ignored.
    Edit { field: Field, value: String },
    SelectReason(ReasonCode),
    SubmitStarted,
    PhaseChanged(WorkflowPhase),
    SubmitFinished(SubmissionOutcome),
    LookupFinished(LookupReport),
    DismissNotification,
    NotificationExpired(u64),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormState {
    pub draft: ComplaintDraft,
    pub submitting: bool,
    pub phase: WorkflowPhase,
    pub notification: Option<Notification>,
    /// Details from the last successful lookup-only action
    pub parcel: Option<ParcelDetails>,
    notification_seq: u64,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The submit control is disabled while a submission is in flight
    pub fn can_submit(&self) -> bool {
        !self.submitting
    }

    pub fn submit_label(&self) -> &'static str {
        if self.submitting {
            "Envoi en cours..."
        } else {
            "Envoyer"
        }
    }

    pub fn field_value(&self, field: Field) -> &str {
        match field {
            Field::Barcode => &self.draft.parcel_barcode,
            Field::Phone => &self.draft.phone_number,
            Field::Subject => &self.draft.subject,
            Field::Description => &self.draft.description,
            Field::Reason => self.draft.reason.label(),
            Field::Submit => self.submit_label(),
        }
    }

    pub fn notification_id(&self) -> Option<u64> {
        self.notification.as_ref().map(|n| n.id)
    }

    /// Return the snapshot that follows `event`
    pub fn apply(&self, event: FormEvent) -> FormState {
        let mut next = self.clone();
        next.reduce(event);
        next
    }

    fn reduce(&mut self, event: FormEvent) {
        match event {
            FormEvent::Edit { field, value } => self.edit(field, value),
            FormEvent::SelectReason(reason) => self.draft.reason = reason,
            FormEvent::SubmitStarted => {
                if self.submitting {
                    return;
                }
                self.submitting = true;
                self.phase = WorkflowPhase::Idle;
            }
            FormEvent::PhaseChanged(phase) => self.phase = phase,
            FormEvent::SubmitFinished(outcome) => {
                self.submitting = false;
                if outcome.is_success() {
                    self.draft = ComplaintDraft::default();
                }
                self.show(&outcome);
            }
            FormEvent::LookupFinished(report) => {
                let outcome = report.outcome();
                match report {
                    LookupReport::Found(details) => self.parcel = Some(details),
                    LookupReport::NotFound => self.parcel = None,
                    LookupReport::Invalid | LookupReport::TransportFailed => {}
                }
                if let Some(outcome) = outcome {
                    self.show(&outcome);
                }
            }
            FormEvent::DismissNotification => self.notification = None,
            FormEvent::NotificationExpired(id) => {
                if self.notification_id() == Some(id) {
                    self.notification = None;
                }
            }
        }
    }

    fn edit(&mut self, field: Field, value: String) {
        match field {
            Field::Barcode => {
                apply_filtered(&mut self.draft.parcel_barcode, &value, accepts_barcode_input);
            }
            Field::Phone => {
                apply_filtered(&mut self.draft.phone_number, &value, accepts_phone_input);
            }
            Field::Subject => self.draft.subject = value,
            Field::Description => self.draft.description = value,
            Field::Reason | Field::Submit => {}
        }
    }

    /// Replace any visible notification; only one is shown at a time
    fn show(&mut self, outcome: &SubmissionOutcome) {
        self.notification_seq += 1;
        self.notification = Some(Notification::from_outcome(self.notification_seq, outcome));
    }
}
