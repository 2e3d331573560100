//! Operation counters.
//!
//! Counts contact writes and the two ways a request can be turned away
//! (failed validation, missing login). Clones share the same counters.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Metrics collector for contact operations.
#[derive(Debug, Clone)]
pub struct Metrics {
    /// Contacts successfully created
    contacts_created_total: Arc<AtomicU64>,

    /// Contacts successfully updated
    contacts_updated_total: Arc<AtomicU64>,

    /// Hide calls that succeeded (including repeats)
    contacts_hidden_total: Arc<AtomicU64>,

    /// Contacts deleted
    contacts_deleted_total: Arc<AtomicU64>,

    /// Writes rejected with field errors
    validation_failures_total: Arc<AtomicU64>,

    /// Operations denied by the access policy
    authorization_denials_total: Arc<AtomicU64>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self {
            contacts_created_total: Arc::new(AtomicU64::new(0)),
            contacts_updated_total: Arc::new(AtomicU64::new(0)),
            contacts_hidden_total: Arc::new(AtomicU64::new(0)),
            contacts_deleted_total: Arc::new(AtomicU64::new(0)),
            validation_failures_total: Arc::new(AtomicU64::new(0)),
            authorization_denials_total: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn record_contact_created(&self) {
        self.contacts_created_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_contact_updated(&self) {
        self.contacts_updated_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_contact_hidden(&self) {
        self.contacts_hidden_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_contact_deleted(&self) {
        self.contacts_deleted_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_validation_failure(&self) {
        self.validation_failures_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_authorization_denial(&self) {
        self.authorization_denials_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn contacts_created_total(&self) -> u64 {
        self.contacts_created_total.load(Ordering::Relaxed)
    }

    pub fn contacts_updated_total(&self) -> u64 {
        self.contacts_updated_total.load(Ordering::Relaxed)
    }

    pub fn contacts_hidden_total(&self) -> u64 {
        self.contacts_hidden_total.load(Ordering::Relaxed)
    }

    pub fn contacts_deleted_total(&self) -> u64 {
        self.contacts_deleted_total.load(Ordering::Relaxed)
    }

    pub fn validation_failures_total(&self) -> u64 {
        self.validation_failures_total.load(Ordering::Relaxed)
    }

    pub fn authorization_denials_total(&self) -> u64 {
        self.authorization_denials_total.load(Ordering::Relaxed)
    }

    /// Get a summary of all metrics.
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            contacts_created_total: self.contacts_created_total(),
            contacts_updated_total: self.contacts_updated_total(),
            contacts_hidden_total: self.contacts_hidden_total(),
            contacts_deleted_total: self.contacts_deleted_total(),
            validation_failures_total: self.validation_failures_total(),
            authorization_denials_total: self.authorization_denials_total(),
        }
    }
}

/// A snapshot of metrics values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSummary {
    pub contacts_created_total: u64,
    pub contacts_updated_total: u64,
    pub contacts_hidden_total: u64,
    pub contacts_deleted_total: u64,
    pub validation_failures_total: u64,
    pub authorization_denials_total: u64,
}
