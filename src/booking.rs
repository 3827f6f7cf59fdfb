//! Multi-room booking selection and price/tax aggregation.
//!
//! Everything here is synchronous and side-effect free. Selections are copy-on-write
//! snapshots: [`change_room_count`] hands back a new [`SelectedRooms`] and leaves the input
//! untouched, so display components holding an older snapshot keep rendering consistent data.

pub mod rooms;
pub mod totals;

pub use rooms::*;
pub use totals::*;
