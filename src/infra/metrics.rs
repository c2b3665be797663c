//! Outcome counters for the complaint workflow
//!
//! NOTE: Relaxed ordering throughout; these are statistics only.

use crate::domain::OutcomeKind;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

#[derive(Debug, Default)]
pub struct Metrics {
    lookups: AtomicU64,
    lookup_transport_errors: AtomicU64,
    submissions: AtomicU64,
    success: AtomicU64,
    validation_errors: AtomicU64,
    not_found: AtomicU64,
    remote_errors: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSummary {
    pub lookups: u64,
    pub lookup_transport_errors: u64,
    pub submissions: u64,
    pub success: u64,
    pub validation_errors: u64,
    pub not_found: u64,
    pub remote_errors: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_lookup(&self) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_lookup_transport_error(&self) {
        self.lookup_transport_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// A complaint POST was issued
    pub fn record_submission(&self) {
        self.submissions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_outcome(&self, kind: OutcomeKind) {
        let counter = match kind {
            OutcomeKind::Success => &self.success,
            OutcomeKind::ValidationError => &self.validation_errors,
            OutcomeKind::NotFound => &self.not_found,
            OutcomeKind::RemoteError => &self.remote_errors,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            lookups: self.lookups.load(Ordering::Relaxed),
            lookup_transport_errors: self.lookup_transport_errors.load(Ordering::Relaxed),
            submissions: self.submissions.load(Ordering::Relaxed),
            success: self.success.load(Ordering::Relaxed),
            validation_errors: self.validation_errors.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            remote_errors: self.remote_errors.load(Ordering::Relaxed),
        }
    }
}

impl MetricsSummary {
    pub fn log(&self) {
        info!(
            lookups = %self.lookups,
            lookup_transport_errors = %self.lookup_transport_errors,
            submissions = %self.submissions,
            success = %self.success,
            validation_errors = %self.validation_errors,
            not_found = %self.not_found,
            remote_errors = %self.remote_errors,
            "metrics"
        );
    }
}
