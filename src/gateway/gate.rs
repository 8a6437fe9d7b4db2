//! Single in-flight submission flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Allows at most one outstanding validation call.
#[derive(Debug, Default)]
pub struct SubmissionGate {
    in_flight: AtomicBool,
}

impl SubmissionGate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Claim the gate, or `None` while another call is still running.
    pub fn try_acquire(self: &Arc<Self>) -> Option<SubmissionPermit> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmissionPermit { gate: self.clone() })
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

/// Held for the duration of one call; releases the gate when dropped.
#[derive(Debug)]
pub struct SubmissionPermit {
    gate: Arc<SubmissionGate>,
}

impl Drop for SubmissionPermit {
    fn drop(&mut self) {
        self.gate.in_flight.store(false, Ordering::Release);
    }
}
