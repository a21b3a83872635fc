//! Lock-free position/length pair for progress readers

use std::sync::atomic::{AtomicU64, Ordering};

/// Last decoded position and total length of the current track, in ms
///
/// Written by the run loop on every checkpoint; the two fields are updated
/// independently, so a reader may briefly see a position from one track
/// paired with the length of the next.
#[derive(Debug, Default)]
pub struct ProgressClock {
    position_ms: AtomicU64,
    duration_ms: AtomicU64,
}

impl ProgressClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new track
    pub fn reset(&self, duration_ms: u64) {
        self.duration_ms.store(duration_ms, Ordering::Relaxed);
        self.position_ms.store(0, Ordering::Relaxed);
    }

    /// Record a checkpoint
    pub fn advance(&self, position_ms: u64) {
        self.position_ms.store(position_ms, Ordering::Relaxed);
    }

    /// `(position_ms, duration_ms)`
    pub fn times(&self) -> (u64, u64) {
        (
            self.position_ms.load(Ordering::Relaxed),
            self.duration_ms.load(Ordering::Relaxed),
        )
    }
}
