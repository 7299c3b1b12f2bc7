//! Single-slot busy flag for network actions (submit, avatar upload).

use std::sync::atomic::{AtomicBool, Ordering};

/// Holds the flag while an action runs and releases it on drop, including
/// when the action's future is cancelled mid-request.
pub(crate) struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    /// Claim `flag`, or `None` if another action holds it.
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
