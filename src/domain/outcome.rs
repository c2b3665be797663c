//! Submission outcomes and the messages shown for them

pub const MSG_VALIDATION: &str = "Le numéro de colis doit contenir 12 chiffres exactement et le numéro de téléphone doit contenir 8 chiffres exactement. Veuillez vérifier les valeurs.";
pub const MSG_NOT_FOUND: &str =
    "Le numéro de colis ou le numéro de téléphone est invalide. Veuillez vérifier les valeurs.";
pub const MSG_SUCCESS: &str = "Réclamation envoyée avec succès.";
pub const MSG_REMOTE_ERROR: &str =
    "Une erreur s'est produite lors de l'envoi de la réclamation. Veuillez réessayer plus tard.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    Success,
    ValidationError,
    NotFound,
    RemoteError,
}

impl OutcomeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeKind::Success => "success",
            OutcomeKind::ValidationError => "validation_error",
            OutcomeKind::NotFound => "not_found",
            OutcomeKind::RemoteError => "remote_error",
        }
    }

    /// Success is the only positive outcome; everything else is styled as an error
    pub fn severity(&self) -> Severity {
        match self {
            OutcomeKind::Success => Severity::Success,
            _ => Severity::Error,
        }
    }

    fn default_message(&self) -> &'static str {
        match self {
            OutcomeKind::Success => MSG_SUCCESS,
            OutcomeKind::ValidationError => MSG_VALIDATION,
            OutcomeKind::NotFound => MSG_NOT_FOUND,
            OutcomeKind::RemoteError => MSG_REMOTE_ERROR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// Result of one submit or lookup attempt, shown once to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub kind: OutcomeKind,
    pub message: String,
}

impl SubmissionOutcome {
    pub fn new(kind: OutcomeKind) -> Self {
        Self { kind, message: kind.default_message().to_string() }
    }

    pub fn success() -> Self {
        Self::new(OutcomeKind::Success)
    }

    pub fn validation_error() -> Self {
        Self::new(OutcomeKind::ValidationError)
    }

    pub fn not_found() -> Self {
        Self::new(OutcomeKind::NotFound)
    }

    pub fn remote_error() -> Self {
        Self::new(OutcomeKind::RemoteError)
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    pub fn is_success(&self) -> bool {
        self.kind == OutcomeKind::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_mapping() {
        assert_eq!(SubmissionOutcome::success().severity(), Severity::Success);
        assert_eq!(SubmissionOutcome::validation_error().severity(), Severity::Error);
        assert_eq!(SubmissionOutcome::not_found().severity(), Severity::Error);
        assert_eq!(SubmissionOutcome::remote_error().severity(), Severity::Error);
    }

    #[test]
    fn test_messages() {
        assert_eq!(SubmissionOutcome::success().message, "Réclamation envoyée avec succès.");
        assert!(SubmissionOutcome::validation_error().message.contains("12 chiffres"));
        assert!(SubmissionOutcome::not_found().message.contains("invalide"));
        assert!(SubmissionOutcome::remote_error().message.contains("réessayer"));
    }
}
