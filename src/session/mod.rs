//! Signed session cookies.
//!
//! The layers build on each other:
//!
//! | Layer | Role |
//! |-------|------|
//! | [`Signer`] | `payload:mac` with HMAC-SHA256 and constant-time verification |
//! | [`CookieCodec`] | base64 around the signed value, for use as a cookie value |
//! | [`build_cookie`] / [`build_removal_cookie`] | `Set-Cookie` attributes |
//!
//! There is no server-side session store. The payload of the `user` cookie is
//! the numeric user id and the cookie's own `Expires` governs its lifetime.
//! Rotating the secret invalidates every outstanding cookie at once.

mod codec;
mod config;
mod cookie;
mod signer;

pub use codec::CookieCodec;
pub use config::{SameSite, SessionConfig};
pub use cookie::{CookieOptions, build_cookie, build_removal_cookie};
pub use signer::{Signer, Verification, sign, unsign};
