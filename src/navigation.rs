//! Navigation surface used to send a signed-out user back to the login screen.

// self
use crate::_prelude::*;

/// Routes the user interface to another in-app path.
///
/// Implementations must not block; a browser shell typically sets `location`, a native shell
/// pushes a route. Contexts without a user interface use [`NoopNavigator`].
pub trait Navigator
where
	Self: Send + Sync,
{
	/// Navigates to `path`.
	fn redirect_to(&self, path: &str);
}

/// Navigator for headless contexts; every redirect is ignored.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopNavigator;
impl Navigator for NoopNavigator {
	fn redirect_to(&self, _path: &str) {}
}

/// Navigator that remembers every redirect instead of performing it.
///
/// Useful for native shells that drain pending routes on their own event loop.
#[derive(Clone, Debug, Default)]
pub struct QueuedNavigator(Arc<Mutex<Vec<String>>>);
impl QueuedNavigator {
	/// Removes and returns all queued redirects in arrival order.
	pub fn drain(&self) -> Vec<String> {
		std::mem::take(&mut *self.0.lock())
	}

	/// Number of redirects waiting to be drained.
	pub fn pending(&self) -> usize {
		self.0.lock().len()
	}
}
impl Navigator for QueuedNavigator {
	fn redirect_to(&self, path: &str) {
		self.0.lock().push(path.to_owned());
	}
}
