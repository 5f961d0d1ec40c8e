//! Credential primitives: redacted secrets, the stored credential pair, and the wire shapes the
//! backend issues them in.

pub mod credentials;
pub mod secret;

pub use credentials::*;
pub use secret::*;
