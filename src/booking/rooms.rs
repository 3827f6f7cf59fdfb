//! Room-type selections keyed by [`RoomTypeId`].

// self
use crate::{_prelude::*, id::RoomTypeId};

/// Upper bound on rooms of a single type within one booking.
pub const MAX_ROOMS_PER_TYPE: u8 = 5;
/// Tax percentage applied to rooms whose offer does not state one.
pub const DEFAULT_TAX_RATE: f64 = 10.0;

/// Direction of a count change requested by the room picker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomCountChange {
	/// Add one room, up to [`MAX_ROOMS_PER_TYPE`].
	Increment,
	/// Remove one room; the entry disappears at zero.
	Decrement,
}

/// One line of a multi-room booking.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSelection {
	/// Per-night rate for one room of this type.
	pub price: f64,
	/// Rooms of this type, always within `1..=MAX_ROOMS_PER_TYPE` while stored.
	pub count: u8,
	/// Tax percentage; [`DEFAULT_TAX_RATE`] applies when absent.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tax_rate: Option<f64>,
	/// Display-only price including tax, as quoted by the offer.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub price_with_tax: Option<f64>,
}
impl RoomSelection {
	/// Tax percentage used in aggregation.
	pub fn effective_tax_rate(&self) -> f64 {
		self.tax_rate.unwrap_or(DEFAULT_TAX_RATE)
	}

	/// `price × count × nights`, or zero for a non-positive stay.
	pub fn line_subtotal(&self, nights: i64) -> f64 {
		if nights <= 0 {
			return 0.0;
		}

		self.price * f64::from(self.count) * nights as f64
	}

	/// Tax owed on [`RoomSelection::line_subtotal`] at this line's own rate.
	pub fn line_tax(&self, nights: i64) -> f64 {
		self.line_subtotal(nights) * self.effective_tax_rate() / 100.0
	}
}

/// Errors raised when an externally supplied selection violates its invariants.
#[derive(Clone, Debug, PartialEq, ThisError)]
pub enum SelectionError {
	/// Stored counts must stay within `1..=MAX_ROOMS_PER_TYPE`.
	#[error("Room type `{room}` has count {count}; counts must be between 1 and {max}.")]
	CountOutOfRange {
		/// Offending room type.
		room: RoomTypeId,
		/// Supplied count.
		count: u8,
		/// Maximum permitted count.
		max: u8,
	},
	/// Prices must be finite and non-negative.
	#[error("Room type `{room}` has an invalid price.")]
	InvalidPrice {
		/// Offending room type.
		room: RoomTypeId,
	},
	/// Tax rates must be finite and non-negative.
	#[error("Room type `{room}` has an invalid tax rate.")]
	InvalidTaxRate {
		/// Offending room type.
		room: RoomTypeId,
	},
}

/// Copy-on-write snapshot of the rooms picked in one booking session.
///
/// Iteration is ordered by room type so aggregation sums in a stable order. Cloning is cheap;
/// unchanged snapshots share storage, which [`SelectedRooms::ptr_eq`] exposes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(
	try_from = "BTreeMap<RoomTypeId, RoomSelection>",
	into = "BTreeMap<RoomTypeId, RoomSelection>"
)]
pub struct SelectedRooms(Arc<BTreeMap<RoomTypeId, RoomSelection>>);
impl SelectedRooms {
	/// Creates an empty selection.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns `true` if no room is selected.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Number of distinct room types selected.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Total rooms across all types.
	pub fn room_count(&self) -> u32 {
		self.0.values().map(|selection| u32::from(selection.count)).sum()
	}

	/// Returns the line for `room`, if selected.
	pub fn get(&self, room: &str) -> Option<&RoomSelection> {
		self.0.get(room)
	}

	/// Rooms of type `room` currently selected (zero when absent).
	pub fn count_of(&self, room: &str) -> u8 {
		self.get(room).map_or(0, |selection| selection.count)
	}

	/// Iterates lines ordered by room type.
	pub fn iter(&self) -> impl Iterator<Item = (&RoomTypeId, &RoomSelection)> {
		self.0.iter()
	}

	/// Returns `true` if both snapshots share the same storage.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}

	/// Applies one picker step and returns the resulting snapshot.
	///
	/// Incrementing stores the supplied price and rates on the line. Requests that cannot
	/// change anything (a sixth room, removing an absent room, an unusable price or rate) return
	/// a snapshot sharing storage with `self`.
	pub fn change_room_count(
		&self,
		room: &RoomTypeId,
		change: RoomCountChange,
		price: f64,
		tax_rate: Option<f64>,
		price_with_tax: Option<f64>,
	) -> Self {
		let current = self.count_of(room);

		match change {
			RoomCountChange::Increment => {
				if current >= MAX_ROOMS_PER_TYPE
					|| !is_valid_amount(price)
					|| tax_rate.is_some_and(|rate| !is_valid_amount(rate))
				{
					return self.clone();
				}

				let mut next = self.clone();

				Arc::make_mut(&mut next.0).insert(
					room.clone(),
					RoomSelection { price, count: current + 1, tax_rate, price_with_tax },
				);

				next
			},
			RoomCountChange::Decrement => {
				if current == 0 {
					return self.clone();
				}

				let mut next = self.clone();
				let lines = Arc::make_mut(&mut next.0);

				if current == 1 {
					lines.remove(room);
				} else if let Some(selection) = lines.get_mut(room) {
					selection.count = current - 1;
				}

				next
			},
		}
	}
}
impl TryFrom<BTreeMap<RoomTypeId, RoomSelection>> for SelectedRooms {
	type Error = SelectionError;

	fn try_from(lines: BTreeMap<RoomTypeId, RoomSelection>) -> Result<Self, Self::Error> {
		for (room, selection) in &lines {
			if !(1..=MAX_ROOMS_PER_TYPE).contains(&selection.count) {
				return Err(SelectionError::CountOutOfRange {
					room: room.clone(),
					count: selection.count,
					max: MAX_ROOMS_PER_TYPE,
				});
			}
			if !is_valid_amount(selection.price) {
				return Err(SelectionError::InvalidPrice { room: room.clone() });
			}
			if selection.tax_rate.is_some_and(|rate| !is_valid_amount(rate)) {
				return Err(SelectionError::InvalidTaxRate { room: room.clone() });
			}
		}

		Ok(Self(Arc::new(lines)))
	}
}
impl From<SelectedRooms> for BTreeMap<RoomTypeId, RoomSelection> {
	fn from(rooms: SelectedRooms) -> Self {
		Arc::unwrap_or_clone(rooms.0)
	}
}

/// Applies one picker step to `rooms`; see [`SelectedRooms::change_room_count`].
pub fn change_room_count(
	rooms: &SelectedRooms,
	room: &RoomTypeId,
	change: RoomCountChange,
	price: f64,
	tax_rate: Option<f64>,
	price_with_tax: Option<f64>,
) -> SelectedRooms {
	rooms.change_room_count(room, change, price, tax_rate, price_with_tax)
}

fn is_valid_amount(value: f64) -> bool {
	value.is_finite() && value >= 0.0
}
