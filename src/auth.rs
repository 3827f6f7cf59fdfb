//! Identity-provider seams, redacted bearer credentials, and the owned sign-in session.

pub mod principal;
pub mod secret;
pub mod session;

pub use principal::*;
pub use secret::*;
pub use session::*;
