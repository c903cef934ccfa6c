use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One-way flag recording that the review has ended.
///
/// Shared between the normal end-of-review path and the teardown hook; only
/// the first `try_close` wins.
#[derive(Debug, Clone, Default)]
pub struct CloseLatch {
    closed: Arc<AtomicBool>,
}

impl CloseLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the latch. Returns true only for the call that flipped it.
    pub fn try_close(&self) -> bool {
        !self.closed.swap(true, Ordering::AcqRel)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_first_close_wins() {
        let latch = CloseLatch::new();
        let shared = latch.clone();
        assert!(!latch.is_closed());
        assert!(latch.try_close());
        assert!(!shared.try_close());
        assert!(shared.is_closed());
    }

    #[test]
    fn test_concurrent_closers_flip_once() {
        let latch = CloseLatch::new();
        let winners: usize = (0..8)
            .map(|_| {
                let l = latch.clone();
                std::thread::spawn(move || l.try_close())
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|h| h.join().unwrap() as usize)
            .sum();
        assert_eq!(winners, 1);
    }
}
