//! [`CredentialStore`] for contexts without durable client-side storage.

// self
use crate::store::{CredentialStore, StoreFuture};

/// Store that never retains anything; reads miss and writes are dropped.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullStore;
impl CredentialStore for NullStore {
	fn get<'a>(&'a self, _key: &'a str) -> StoreFuture<'a, Option<String>> {
		Box::pin(async { Ok(None) })
	}

	fn set<'a>(&'a self, _key: &'a str, _value: String) -> StoreFuture<'a, ()> {
		Box::pin(async { Ok(()) })
	}

	fn remove<'a>(&'a self, _key: &'a str) -> StoreFuture<'a, ()> {
		Box::pin(async { Ok(()) })
	}
}
