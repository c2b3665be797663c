//! Domain models - complaint draft, tracking data, validation and outcomes
//!
//! - `types` - `ComplaintDraft`, `ReasonCode`, tracking events and the POST payload
//! - `validation` - phone/barcode format checks and typing filters
//! - `outcome` - `SubmissionOutcome` and the user-facing messages

pub mod outcome;
pub mod types;
pub mod validation;

pub use outcome::{OutcomeKind, Severity, SubmissionOutcome};
pub use types::{
    ComplaintDraft, ComplaintPayload, ParcelDetails, ParcelLookupResult, ReasonCode, TrackingEvent,
};
