use marquee_core::{MovieId, ShowId};
use serde::{Deserialize, Serialize};

/// A scheduled screening. `capacity` is the size of the seat pool at startup; the live
/// counter is owned by the [`InventoryLedger`](crate::InventoryLedger).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Show {
    pub show_id: ShowId,
    pub time: String,
    pub price_per_seat: u64,
    pub capacity: u32,
}

impl Show {
    /// Total charged for `seats` at this show's current price.
    pub fn price_for(&self, seats: u32) -> u64 {
        u64::from(seats) * self.price_per_seat
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub genre: String,
    /// Running time in minutes.
    pub duration: u32,
    pub shows: Vec<Show>,
}

impl Movie {
    pub fn show(&self, show_id: ShowId) -> Option<&Show> {
        self.shows.iter().find(|s| s.show_id == show_id)
    }
}
