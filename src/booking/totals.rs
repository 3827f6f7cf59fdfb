//! Price, tax, and weighted tax-rate aggregation over a room selection.

// self
use crate::{_prelude::*, booking::SelectedRooms};

/// Figures rendered by the booking summary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingTotals {
	/// Σ price × count × nights.
	pub subtotal: f64,
	/// Σ of each line's subtotal at that line's own tax rate.
	pub tax: f64,
	/// `subtotal + tax`.
	pub total: f64,
	/// Room-count-weighted mean tax rate, rounded half-up to one decimal.
	pub average_tax_rate: f64,
	/// Rooms across all types.
	pub room_count: u32,
	/// Nights the totals were computed for.
	pub nights: u32,
}

/// Aggregates `rooms` over a stay of `nights`.
///
/// An empty selection or a non-positive stay yields all zeros. Lines are summed in room-type
/// order, so the result does not depend on how the selection was built.
pub fn compute_totals(rooms: &SelectedRooms, nights: i64) -> BookingTotals {
	if rooms.is_empty() || nights <= 0 {
		return BookingTotals::default();
	}

	let mut subtotal = 0.0;
	let mut tax = 0.0;
	let mut weighted_rate = 0.0;
	let mut room_count = 0_u32;

	for (_, line) in rooms.iter() {
		subtotal += line.line_subtotal(nights);
		tax += line.line_tax(nights);
		weighted_rate += line.effective_tax_rate() * f64::from(line.count);
		room_count += u32::from(line.count);
	}

	let average_tax_rate = if room_count == 0 {
		0.0
	} else {
		round_half_up_tenths(weighted_rate / f64::from(room_count))
	};

	BookingTotals {
		subtotal,
		tax,
		total: subtotal + tax,
		average_tax_rate,
		room_count,
		nights: u32::try_from(nights).unwrap_or(u32::MAX),
	}
}

fn round_half_up_tenths(value: f64) -> f64 {
	// Ties such as 10.05 must round up despite representation error.
	((value * 10.0) + 0.5 + 1e-9).floor() / 10.0
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{booking::RoomCountChange, id::RoomTypeId};

	fn room(id: &str) -> RoomTypeId {
		RoomTypeId::new(id).expect("Room type fixture should be valid.")
	}

	fn pick(
		rooms: SelectedRooms,
		id: &str,
		times: usize,
		price: f64,
		tax_rate: Option<f64>,
	) -> SelectedRooms {
		let id = room(id);

		(0..times).fold(rooms, |acc, _| {
			acc.change_room_count(&id, RoomCountChange::Increment, price, tax_rate, None)
		})
	}

	#[test]
	fn empty_selection_is_zero_for_any_stay() {
		for nights in [-3, 0, 1, 14] {
			assert_eq!(compute_totals(&SelectedRooms::new(), nights), BookingTotals::default());
		}
	}

	#[test]
	fn non_positive_stay_is_zero() {
		let rooms = pick(SelectedRooms::new(), "deluxe", 2, 100.0, Some(10.0));

		assert_eq!(compute_totals(&rooms, 0), BookingTotals::default());
		assert_eq!(compute_totals(&rooms, -1), BookingTotals::default());
	}

	#[test]
	fn mixed_rooms_with_default_rate() {
		let rooms = pick(SelectedRooms::new(), "a", 2, 100.0, Some(10.0));
		let rooms = pick(rooms, "b", 1, 200.0, None);
		let totals = compute_totals(&rooms, 3);

		assert_eq!(totals.subtotal, 1200.0);
		assert_eq!(totals.tax, 120.0);
		assert_eq!(totals.total, 1320.0);
		assert_eq!(totals.average_tax_rate, 10.0);
		assert_eq!(totals.room_count, 3);
		assert_eq!(totals.nights, 3);
	}

	#[test]
	fn single_room_with_own_rate() {
		let rooms = pick(SelectedRooms::new(), "a", 1, 150.0, Some(18.0));
		let totals = compute_totals(&rooms, 2);

		assert_eq!(totals.subtotal, 300.0);
		assert_eq!(totals.tax, 54.0);
		assert_eq!(totals.total, 354.0);
		assert_eq!(totals.average_tax_rate, 18.0);
	}

	#[test]
	fn rates_apply_per_line_and_average_is_count_weighted() {
		let rooms = pick(SelectedRooms::new(), "city", 2, 100.0, Some(10.0));
		let rooms = pick(rooms, "sea", 1, 100.0, Some(18.0));
		let totals = compute_totals(&rooms, 1);

		assert_eq!(totals.subtotal, 300.0);
		assert_eq!(totals.tax, 38.0);
		assert_eq!(totals.average_tax_rate, 12.7);
	}

	#[test]
	fn average_rounds_ties_up() {
		let rooms = pick(SelectedRooms::new(), "a", 1, 50.0, Some(10.1));
		let rooms = pick(rooms, "b", 1, 50.0, Some(10.0));

		assert_eq!(compute_totals(&rooms, 1).average_tax_rate, 10.1);
	}

	#[test]
	fn build_order_does_not_change_totals() {
		let forward = pick(SelectedRooms::new(), "alpha", 2, 99.9, Some(7.5));
		let forward = pick(forward, "beta", 3, 149.5, None);
		let forward = pick(forward, "gamma", 1, 310.25, Some(21.0));
		let reverse = pick(SelectedRooms::new(), "gamma", 1, 310.25, Some(21.0));
		let reverse = pick(reverse, "beta", 3, 149.5, None);
		let reverse = pick(reverse, "alpha", 2, 99.9, Some(7.5));

		assert_eq!(forward, reverse);
		assert_eq!(compute_totals(&forward, 4), compute_totals(&reverse, 4));
		assert_eq!(compute_totals(&forward, 4), compute_totals(&forward, 4));
	}
}
