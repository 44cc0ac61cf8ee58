//! Single-slot flush scheduling.
use std::sync::atomic::{AtomicBool, Ordering};

/// Tracks whether a flush is in flight.
///
/// At most one holder can arm the scheduler at a time; it stays armed until the
/// flush it stands for has handed its batch to the subscriber.
#[derive(Debug, Default)]
pub struct FlushScheduler {
    armed: AtomicBool,
}

impl FlushScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the scheduler. Returns `true` only for the caller that flipped it
    /// from idle, which then owns scheduling the flush.
    pub fn try_arm(&self) -> bool {
        self.armed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn disarm(&self) {
        self.armed.store(false, Ordering::Release);
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_first_arm_wins() {
        let scheduler = FlushScheduler::new();
        assert!(scheduler.try_arm());
        assert!(!scheduler.try_arm());
        assert!(scheduler.is_armed());

        scheduler.disarm();
        assert!(!scheduler.is_armed());
        assert!(scheduler.try_arm());
    }
}
