//! Walks through one booking screen: a signed-in traveler whose cached token has expired loads a
//! hotel through the request pipeline, then picks rooms and renders the price summary.

// std
use std::sync::{
	Arc,
	atomic::{AtomicU32, Ordering},
};
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde::Deserialize;
use url::Url;
// self
use travel_booking_core::{
	auth::{BearerToken, IdentityError, Principal, PrincipalFuture, Session},
	booking::{RoomCountChange, SelectedRooms, compute_totals},
	client::ReqwestApiClient,
	config::ClientConfig,
	id::{PrincipalId, RoomTypeId},
	navigation::QueuedNavigator,
	store::MemoryStore,
};

/// Stand-in for an identity provider SDK that rotates tokens on every forced refresh.
struct DemoTraveler {
	id: PrincipalId,
	generation: AtomicU32,
}
impl Principal for DemoTraveler {
	fn id(&self) -> &PrincipalId {
		&self.id
	}

	fn token(&self, force_refresh: bool) -> PrincipalFuture<'_, BearerToken> {
		Box::pin(async move {
			let generation = if force_refresh {
				self.generation.fetch_add(1, Ordering::SeqCst) + 1
			} else {
				self.generation.load(Ordering::SeqCst)
			};

			Ok::<_, IdentityError>(BearerToken::new(format!("demo-token-{generation}")))
		})
	}
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoomOffer {
	room_type: String,
	price: f64,
	tax_rate: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Hotel {
	name: String,
	rooms: Vec<RoomOffer>,
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let expired = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/v1/hotels/hanoi-lotus")
				.header("authorization", "Bearer demo-token-0");
			then.status(401);
		})
		.await;
	let hotel_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/v1/hotels/hanoi-lotus")
				.header("authorization", "Bearer demo-token-1");
			then.status(200).header("content-type", "application/json").body(
				r#"{"name":"Lotus Hanoi","rooms":[
					{"roomType":"deluxe","price":100.0,"taxRate":10.0},
					{"roomType":"suite","price":200.0}
				]}"#,
			);
		})
		.await;
	let config = ClientConfig::builder(Url::parse(&server.url("/v1/"))?).build()?;
	let session = Arc::new(Session::new(Arc::new(MemoryStore::default())));
	let navigator = QueuedNavigator::default();
	let traveler: Arc<dyn Principal> = Arc::new(DemoTraveler {
		id: PrincipalId::new("traveler-1")?,
		generation: AtomicU32::new(0),
	});

	session.on_state_change(Some(traveler)).await?;

	let client = ReqwestApiClient::new(config, session.clone(), Arc::new(navigator.clone()))?;
	let hotel: Hotel = client.get_json("hotels/hanoi-lotus").await?;

	expired.assert_async().await;
	hotel_mock.assert_async().await;

	println!(
		"Loaded {} after {} credential refresh(es).",
		hotel.name,
		client.refresh_metrics.recovered()
	);

	let mut selection = SelectedRooms::new();

	for (offer, count) in hotel.rooms.iter().zip([2, 1]) {
		let room = RoomTypeId::new(&offer.room_type)?;

		for _ in 0..count {
			selection = selection.change_room_count(
				&room,
				RoomCountChange::Increment,
				offer.price,
				offer.tax_rate,
				None,
			);
		}
	}

	let totals = compute_totals(&selection, 3);

	println!("{}", serde_json::to_string_pretty(&totals)?);
	println!("Pending redirects: {:?}.", navigator.drain());

	Ok(())
}
