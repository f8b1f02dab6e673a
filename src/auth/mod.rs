//! Authentication: token storage and the login/refresh session.
//!
//! A [`Session`] starts unauthenticated or resumes from persisted tokens,
//! and obtains fresh tokens by authenticating (with or without a one-time
//! passcode). Token state lives in a [`TokenStore`] with merge-on-update
//! semantics; nothing is persisted by this crate.

mod session;
mod tokens;

pub use session::{OtpProvider, Session, StaticOtp};
pub use tokens::{TokenStore, TokenUpdate};
