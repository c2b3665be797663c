//! Transient notification banner and its one-shot expiry timer

use crate::domain::{Severity, SubmissionOutcome};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Default time a notification stays visible
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(6);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Increases with every notification shown, so a stale timer can be told apart
    pub id: u64,
    pub severity: Severity,
    pub message: String,
}

impl Notification {
    pub fn from_outcome(id: u64, outcome: &SubmissionOutcome) -> Self {
        Self { id, severity: outcome.severity(), message: outcome.message.clone() }
    }
}

/// Schedule the expiry of notification `id`.
///
/// After `ttl` the value built by `expired(id)` is sent on `tx`. The timer is
/// independent of network activity; a closed channel just drops the message.
pub fn spawn_expiry<T, F>(id: u64, ttl: Duration, tx: mpsc::UnboundedSender<T>, expired: F) -> JoinHandle<()>
where
    T: Send + 'static,
    F: FnOnce(u64) -> T + Send + 'static,
{
    tokio::spawn(async move {
        tokio::time::sleep(ttl).await;
        debug!(notification_id = %id, "notification_expired");
        let _ = tx.send(expired(id));
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_outcome() {
        let n = Notification::from_outcome(3, &SubmissionOutcome::not_found());
        assert_eq!(n.id, 3);
        assert_eq!(n.severity, Severity::Error);
        assert!(n.message.starts_with("Le numéro de colis"));
    }

    #[tokio::test]
    async fn test_spawn_expiry_sends_id() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_expiry(7, Duration::from_millis(10), tx, |id| id * 10);

        let got = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await.unwrap();
        assert_eq!(got, Some(70));
    }

    #[tokio::test]
    async fn test_spawn_expiry_waits_for_ttl() {
        let (tx, mut rx) = mpsc::unbounded_channel::<u64>();
        let handle = spawn_expiry(1, Duration::from_secs(60), tx, |id| id);

        assert!(tokio::time::timeout(Duration::from_millis(20), rx.recv()).await.is_err());
        handle.abort();
    }
}
