//! The single-occupancy worker slot.

use std::sync::atomic::{AtomicBool, Ordering};

/// Admission token representing "one job owns the recognition engine now".
///
/// Owned exclusively by the admission controller; nothing else reads or
/// writes it. Held from admission until the job's terminal state.
#[derive(Debug, Default)]
pub struct WorkerSlot {
    busy: AtomicBool,
}

impl WorkerSlot {
    /// A free slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot. Returns `false` without side effects if it is held.
    pub fn try_acquire(&self) -> bool {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Return the slot to idle.
    pub fn release(&self) {
        self.busy.store(false, Ordering::Release);
    }

    /// Whether a job currently holds the slot.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}
