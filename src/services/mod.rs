//! Services - form state and the submission workflow
//!
//! - `form` - Form state holder (pure reducer over `FormEvent`)
//! - `workflow` - Lookup-only and full-submit operations
//! - `notification` - Notification banner and its expiry timer

pub mod form;
pub mod notification;
pub mod workflow;

pub use form::{Field, FormEvent, FormState};
pub use notification::{spawn_expiry, Notification, NOTIFICATION_TTL};
pub use workflow::{LookupReport, SubmissionWorkflow, WorkflowPhase};
