use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use marquee_core::ShowId;

use crate::movie::{Movie, Show};

/// Upper bound on seats in a single booking.
pub const MAX_SEATS_PER_BOOKING: u32 = 10;

/// Seat counter for one show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatPool {
    pub show_id: ShowId,
    pub capacity: u32,
    pub available: u32,
}

impl SeatPool {
    /// Seats currently held by confirmed bookings.
    pub fn committed(&self) -> u32 {
        self.capacity - self.available
    }
}

/// A record that holds seats from a pool, i.e. a booking.
///
/// The ledger reads the held quantity and writes the new quantity and status back in the
/// same critical section as the counter update.
pub trait SeatHold {
    fn show_id(&self) -> ShowId;
    fn seats(&self) -> u32;
    fn is_released(&self) -> bool;
    fn apply_resize(&mut self, seats: u32, total_amount: u64);
    fn mark_released(&mut self, released_at: DateTime<Utc>);
}

/// Per-show seat accounting.
///
/// `reserve`, `resize` and `release` are the only writers of a pool's `available` counter.
/// Each one runs its check and its update while holding the pool's map entry, so concurrent
/// callers on the same show are serialized and callers on different shows are not.
#[derive(Debug, Default)]
pub struct InventoryLedger {
    pools: DashMap<ShowId, SeatPool>,
}

impl InventoryLedger {
    pub fn new() -> Self {
        Self {
            pools: DashMap::new(),
        }
    }

    /// Build a ledger with one full pool per show in the catalog.
    pub fn from_movies(movies: &[Movie]) -> Self {
        let ledger = Self::new();
        for show in movies.iter().flat_map(|m| &m.shows) {
            ledger.register(show);
        }
        ledger
    }

    /// Initialize (or reset) the pool for a show at full capacity.
    pub fn register(&self, show: &Show) {
        self.pools.insert(
            show.show_id,
            SeatPool {
                show_id: show.show_id,
                capacity: show.capacity,
                available: show.capacity,
            },
        );
    }

    pub fn pool(&self, show_id: ShowId) -> Option<SeatPool> {
        self.pools.get(&show_id).map(|pool| *pool)
    }

    pub fn available(&self, show_id: ShowId) -> Option<u32> {
        self.pool(show_id).map(|pool| pool.available)
    }

    pub fn capacity(&self, show_id: ShowId) -> Option<u32> {
        self.pool(show_id).map(|pool| pool.capacity)
    }

    /// Take `seats` out of the show's pool.
    pub fn reserve(&self, show: &Show, seats: u32) -> Result<SeatPool, InventoryError> {
        check_quantity(seats)?;

        let mut pool = self
            .pools
            .get_mut(&show.show_id)
            .ok_or(InventoryError::UnknownShow(show.show_id))?;

        if pool.available < seats {
            return Err(InventoryError::InsufficientInventory {
                requested: seats,
                available: pool.available,
                additional: false,
            });
        }

        pool.available -= seats;
        Ok(*pool)
    }

    /// Change the number of seats held by `hold` to `new_seats`, moving only the difference
    /// in or out of the pool, and reprice the hold at the show's current price.
    pub fn resize<H>(&self, show: &Show, hold: &mut H, new_seats: u32) -> Result<SeatPool, InventoryError>
    where
        H: SeatHold + ?Sized,
    {
        check_hold(show, hold)?;
        check_quantity(new_seats)?;

        let mut pool = self
            .pools
            .get_mut(&show.show_id)
            .ok_or(InventoryError::UnknownShow(show.show_id))?;

        let current = hold.seats();
        match new_seats.cmp(&current) {
            Ordering::Greater => {
                let delta = new_seats - current;
                if pool.available < delta {
                    return Err(InventoryError::InsufficientInventory {
                        requested: delta,
                        available: pool.available,
                        additional: true,
                    });
                }
                pool.available -= delta;
            }
            Ordering::Less => restore(&mut *pool, current - new_seats)?,
            Ordering::Equal => {}
        }

        hold.apply_resize(new_seats, show.price_for(new_seats));
        Ok(*pool)
    }

    /// Return every seat held by `hold` to the pool and mark it released.
    pub fn release<H>(&self, show: &Show, hold: &mut H) -> Result<SeatPool, InventoryError>
    where
        H: SeatHold + ?Sized,
    {
        check_hold(show, hold)?;

        let mut pool = self
            .pools
            .get_mut(&show.show_id)
            .ok_or(InventoryError::UnknownShow(show.show_id))?;

        restore(&mut *pool, hold.seats())?;
        hold.mark_released(Utc::now());
        Ok(*pool)
    }
}

/// Validate a client-supplied seat count and narrow it to the ledger's unit.
pub fn validate_quantity(requested: i64) -> Result<u32, InventoryError> {
    if requested < 1 || requested > i64::from(MAX_SEATS_PER_BOOKING) {
        return Err(InventoryError::InvalidQuantity { requested });
    }
    u32::try_from(requested).map_err(|_| InventoryError::InvalidQuantity { requested })
}

fn check_quantity(seats: u32) -> Result<(), InventoryError> {
    validate_quantity(i64::from(seats)).map(|_| ())
}

fn check_hold<H: SeatHold + ?Sized>(show: &Show, hold: &H) -> Result<(), InventoryError> {
    if hold.is_released() {
        return Err(InventoryError::AlreadyReleased);
    }
    if hold.show_id() != show.show_id {
        return Err(InventoryError::ShowMismatch {
            expected: hold.show_id(),
            actual: show.show_id,
        });
    }
    Ok(())
}

// Returning seats never blocks on availability, only on the pool's own capacity.
fn restore(pool: &mut SeatPool, seats: u32) -> Result<(), InventoryError> {
    let restored = pool.available.saturating_add(seats);
    if restored > pool.capacity {
        tracing::error!(
            show_id = pool.show_id,
            available = pool.available,
            returning = seats,
            capacity = pool.capacity,
            "Seat pool would exceed capacity"
        );
        return Err(InventoryError::CapacityExceeded {
            show_id: pool.show_id,
            capacity: pool.capacity,
        });
    }
    pool.available = restored;
    Ok(())
}

fn quantity_message(requested: &i64) -> &'static str {
    if *requested > i64::from(MAX_SEATS_PER_BOOKING) {
        "Cannot book more than 10 seats at once"
    } else {
        "Seats must be a positive integer"
    }
}

fn shortfall_scope(additional: &bool) -> &'static str {
    if *additional {
        " additional"
    } else {
        ""
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InventoryError {
    #[error("Show not found in inventory: {0}")]
    UnknownShow(ShowId),

    #[error("{}", quantity_message(.requested))]
    InvalidQuantity { requested: i64 },

    #[error("Not enough seats available. Only {available}{} seats remaining", shortfall_scope(.additional))]
    InsufficientInventory {
        requested: u32,
        available: u32,
        additional: bool,
    },

    #[error("Booking already cancelled")]
    AlreadyReleased,

    #[error("Hold belongs to show {expected}, not {actual}")]
    ShowMismatch { expected: ShowId, actual: ShowId },

    #[error("Seat pool for show {show_id} would exceed its capacity of {capacity}")]
    CapacityExceeded { show_id: ShowId, capacity: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct TestHold {
        show_id: ShowId,
        seats: u32,
        total: u64,
        released_at: Option<DateTime<Utc>>,
    }

    impl TestHold {
        fn new(show: &Show, seats: u32) -> Self {
            Self {
                show_id: show.show_id,
                seats,
                total: show.price_for(seats),
                released_at: None,
            }
        }
    }

    impl SeatHold for TestHold {
        fn show_id(&self) -> ShowId {
            self.show_id
        }
        fn seats(&self) -> u32 {
            self.seats
        }
        fn is_released(&self) -> bool {
            self.released_at.is_some()
        }
        fn apply_resize(&mut self, seats: u32, total_amount: u64) {
            self.seats = seats;
            self.total = total_amount;
        }
        fn mark_released(&mut self, released_at: DateTime<Utc>) {
            self.released_at = Some(released_at);
        }
    }

    fn show(show_id: ShowId, price: u64) -> Show {
        Show {
            show_id,
            time: "10:00 AM".to_string(),
            price_per_seat: price,
            capacity: 50,
        }
    }

    fn ledger_with(show: &Show) -> InventoryLedger {
        let ledger = InventoryLedger::new();
        ledger.register(show);
        ledger
    }

    fn assert_conserved(ledger: &InventoryLedger, show: &Show, holds: &[&TestHold]) {
        let held: u32 = holds.iter().filter(|h| !h.is_released()).map(|h| h.seats).sum();
        assert_eq!(ledger.available(show.show_id).unwrap() + held, show.capacity);
    }

    #[test]
    fn test_reserve_decrements() {
        let show = show(101, 200);
        let ledger = ledger_with(&show);

        let pool = ledger.reserve(&show, 2).unwrap();
        assert_eq!(pool.available, 48);
        assert_eq!(pool.committed(), 2);
        assert_eq!(show.price_for(2), 400);
    }

    #[test]
    fn test_reserve_insufficient_leaves_pool_untouched() {
        let show = show(101, 200);
        let ledger = ledger_with(&show);
        for _ in 0..4 {
            ledger.reserve(&show, 10).unwrap();
        }
        ledger.reserve(&show, 5).unwrap();

        let err = ledger.reserve(&show, 6).unwrap_err();
        assert_eq!(
            err,
            InventoryError::InsufficientInventory { requested: 6, available: 5, additional: false }
        );
        assert_eq!(err.to_string(), "Not enough seats available. Only 5 seats remaining");
        assert_eq!(ledger.available(101), Some(5));
    }

    #[test]
    fn test_reserve_more_than_capacity_fails() {
        let show = show(101, 200);
        let ledger = ledger_with(&show);

        assert!(matches!(
            validate_quantity(51),
            Err(InventoryError::InvalidQuantity { requested: 51 })
        ));
        assert!(matches!(ledger.reserve(&show, 51), Err(InventoryError::InvalidQuantity { .. })));
        assert_eq!(ledger.available(101), Some(50));
    }

    #[test]
    fn test_quantity_bounds() {
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
        assert!(validate_quantity(11).is_err());
        assert_eq!(validate_quantity(1).unwrap(), 1);
        assert_eq!(validate_quantity(10).unwrap(), 10);

        assert_eq!(validate_quantity(0).unwrap_err().to_string(), "Seats must be a positive integer");
        assert_eq!(
            validate_quantity(11).unwrap_err().to_string(),
            "Cannot book more than 10 seats at once"
        );
    }

    #[test]
    fn test_unknown_show() {
        let ledger = InventoryLedger::new();
        assert_eq!(ledger.reserve(&show(9, 100), 1), Err(InventoryError::UnknownShow(9)));
    }

    #[test]
    fn test_resize_up_and_down() {
        let show = show(101, 200);
        let ledger = ledger_with(&show);
        ledger.reserve(&show, 2).unwrap();
        let mut hold = TestHold::new(&show, 2);

        let pool = ledger.resize(&show, &mut hold, 5).unwrap();
        assert_eq!(pool.available, 45);
        assert_eq!(hold.seats, 5);
        assert_eq!(hold.total, 1000);

        let pool = ledger.resize(&show, &mut hold, 1).unwrap();
        assert_eq!(pool.available, 49);
        assert_eq!(hold.total, 200);
        assert_conserved(&ledger, &show, &[&hold]);
    }

    #[test]
    fn test_resize_same_size_is_noop_on_pool() {
        let show = show(101, 200);
        let ledger = ledger_with(&show);
        ledger.reserve(&show, 3).unwrap();
        let mut hold = TestHold::new(&show, 3);

        let pool = ledger.resize(&show, &mut hold, 3).unwrap();
        assert_eq!(pool.available, 47);
        assert_eq!(hold.total, 600);
    }

    #[test]
    fn test_resize_symmetry() {
        let show = show(101, 250);
        let ledger = ledger_with(&show);
        ledger.reserve(&show, 4).unwrap();
        let mut hold = TestHold::new(&show, 4);
        let before = ledger.available(101).unwrap();
        let original_total = hold.total;

        ledger.resize(&show, &mut hold, 9).unwrap();
        ledger.resize(&show, &mut hold, 4).unwrap();

        assert_eq!(ledger.available(101).unwrap(), before);
        assert_eq!(hold.total, original_total);
    }

    #[test]
    fn test_resize_reprices_at_live_price() {
        let mut show = show(101, 200);
        let ledger = ledger_with(&show);
        ledger.reserve(&show, 2).unwrap();
        let mut hold = TestHold::new(&show, 2);

        show.price_per_seat = 300;
        ledger.resize(&show, &mut hold, 3).unwrap();
        assert_eq!(hold.total, 900);
    }

    #[test]
    fn test_resize_insufficient_reports_additional() {
        let show = show(101, 200);
        let ledger = ledger_with(&show);
        for _ in 0..4 {
            ledger.reserve(&show, 10).unwrap();
        }
        ledger.reserve(&show, 4).unwrap();
        ledger.reserve(&show, 5).unwrap();
        let mut hold = TestHold::new(&show, 5);

        let err = ledger.resize(&show, &mut hold, 8).unwrap_err();
        assert_eq!(
            err,
            InventoryError::InsufficientInventory { requested: 3, available: 1, additional: true }
        );
        assert_eq!(err.to_string(), "Not enough seats available. Only 1 additional seats remaining");
        assert_eq!(ledger.available(101), Some(1));
        assert_eq!(hold.seats, 5);
        assert_eq!(hold.total, 1000);

        ledger.resize(&show, &mut hold, 6).unwrap();
        assert_eq!(ledger.available(101), Some(0));
    }

    #[test]
    fn test_resize_rejects_out_of_range() {
        let show = show(101, 200);
        let ledger = ledger_with(&show);
        ledger.reserve(&show, 2).unwrap();
        let mut hold = TestHold::new(&show, 2);

        assert!(matches!(ledger.resize(&show, &mut hold, 0), Err(InventoryError::InvalidQuantity { .. })));
        assert!(matches!(ledger.resize(&show, &mut hold, 11), Err(InventoryError::InvalidQuantity { .. })));
        assert_eq!(ledger.available(101), Some(48));
        assert_eq!(hold.seats, 2);
    }

    #[test]
    fn test_release_restores_once() {
        let show = show(101, 200);
        let ledger = ledger_with(&show);
        ledger.reserve(&show, 2).unwrap();
        let mut hold = TestHold::new(&show, 2);

        let pool = ledger.release(&show, &mut hold).unwrap();
        assert_eq!(pool.available, 50);
        assert!(hold.is_released());

        assert_eq!(ledger.release(&show, &mut hold), Err(InventoryError::AlreadyReleased));
        assert_eq!(ledger.available(101), Some(50));
    }

    #[test]
    fn test_resize_after_release_fails() {
        let show = show(101, 200);
        let ledger = ledger_with(&show);
        ledger.reserve(&show, 2).unwrap();
        let mut hold = TestHold::new(&show, 2);
        ledger.release(&show, &mut hold).unwrap();

        assert_eq!(ledger.resize(&show, &mut hold, 5), Err(InventoryError::AlreadyReleased));
        assert_eq!(ledger.available(101), Some(50));
    }

    #[test]
    fn test_hold_for_other_show_rejected() {
        let first = show(101, 200);
        let second = show(102, 200);
        let ledger = ledger_with(&first);
        ledger.register(&second);
        ledger.reserve(&first, 2).unwrap();
        let mut hold = TestHold::new(&first, 2);

        assert_eq!(
            ledger.release(&second, &mut hold),
            Err(InventoryError::ShowMismatch { expected: 101, actual: 102 })
        );
        assert_eq!(ledger.available(102), Some(50));
    }

    #[test]
    fn test_release_beyond_capacity_is_rejected() {
        let show = show(101, 200);
        let ledger = ledger_with(&show);
        // A hold that never went through reserve.
        let mut phantom = TestHold::new(&show, 3);

        assert!(matches!(
            ledger.release(&show, &mut phantom),
            Err(InventoryError::CapacityExceeded { show_id: 101, capacity: 50 })
        ));
        assert!(!phantom.is_released());
        assert_eq!(ledger.available(101), Some(50));
    }

    #[test]
    fn test_conservation_across_mixed_operations() {
        let show = show(101, 150);
        let ledger = ledger_with(&show);
        let mut holds = Vec::new();

        for seats in [3, 7, 1, 10, 4] {
            ledger.reserve(&show, seats).unwrap();
            holds.push(TestHold::new(&show, seats));
        }
        ledger.resize(&show, &mut holds[0], 9).unwrap();
        ledger.resize(&show, &mut holds[3], 2).unwrap();
        ledger.release(&show, &mut holds[1]).unwrap();
        ledger.resize(&show, &mut holds[4], 10).unwrap();
        ledger.release(&show, &mut holds[2]).unwrap();

        let refs: Vec<&TestHold> = holds.iter().collect();
        assert_conserved(&ledger, &show, &refs);
        assert_eq!(ledger.available(101), Some(50 - 9 - 2 - 10));
    }

    #[test]
    fn test_concurrent_reserves_never_oversell() {
        let show = show(101, 200);
        let ledger = ledger_with(&show);

        let granted: u32 = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..16)
                .map(|_| {
                    scope.spawn(|| {
                        let mut granted = 0u32;
                        for _ in 0..10 {
                            if ledger.reserve(&show, 1).is_ok() {
                                granted += 1;
                            }
                        }
                        granted
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });

        assert_eq!(granted, 50);
        assert_eq!(ledger.available(101), Some(0));
    }

    #[test]
    fn test_from_movies_registers_every_show() {
        let movies = crate::seed::default_catalog().unwrap();
        let ledger = InventoryLedger::from_movies(&movies);
        assert_eq!(ledger.available(101), Some(50));
        assert_eq!(ledger.capacity(5003), Some(50));
        assert_eq!(ledger.pool(1), None);
    }
}
