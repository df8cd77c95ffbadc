use std::sync::atomic::{AtomicU64, Ordering};

pub type UserId = u64;
pub type MovieId = u64;
pub type ShowId = u64;
pub type BookingId = u64;

/// First id handed out to a registered user.
pub const INITIAL_USER_ID: UserId = 1;

/// First booking id. Offset from user and movie ids so they are easy to tell apart.
pub const INITIAL_BOOKING_ID: BookingId = 1001;

/// Monotonic id generator shared across request handlers.
#[derive(Debug)]
pub struct IdSequence {
    next: AtomicU64,
}

impl IdSequence {
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    pub fn for_users() -> Self {
        Self::starting_at(INITIAL_USER_ID)
    }

    pub fn for_bookings() -> Self {
        Self::starting_at(INITIAL_BOOKING_ID)
    }

    /// Allocate the next id. Never returns the same value twice.
    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_sequence_is_monotonic() {
        let seq = IdSequence::for_bookings();
        assert_eq!(seq.next_id(), 1001);
        assert_eq!(seq.next_id(), 1002);
        assert_eq!(seq.next_id(), 1003);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_sequence_unique_under_contention() {
        let seq = Arc::new(IdSequence::for_users());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let seq = seq.clone();
            handles.push(tokio::spawn(async move {
                (0..100).map(|_| seq.next_id()).collect::<Vec<_>>()
            }));
        }

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.await.unwrap() {
                assert!(seen.insert(id), "duplicate id {}", id);
            }
        }
        assert_eq!(seen.len(), 800);
        assert_eq!(seq.next_id(), 801);
    }
}
