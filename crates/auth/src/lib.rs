//! Sessions, tokens, and password hashing.
//!
//! A session is a signed JWT mirrored into a volatile cache under two keys,
//! `user:{id}:token` and `token:{jwt}`. A token is only honoured while both
//! its signature verifies and the cache still maps it back to its subject,
//! so deleting the cache entries revokes it immediately.
//!
//! ## Security
//!
//! - [`Crypto`] — JWT signing and verification
//! - [`Claims`] — JWT payload structure
//! - [`password`] — Argon2 hashing and verification
//!
//! ## Sessions
//!
//! - [`Cache`] — Key/value store with per-key expiry
//! - [`Redis`] / [`Volatile`] — Production and in-process caches
//! - [`Sessions`] — Issue, validate, refresh, revoke
//! - [`Ticket`] — Token handed back to the client
mod cache;
mod claims;
mod crypto;
pub mod password;
mod session;

pub use cache::*;
pub use claims::*;
pub use crypto::*;
pub use session::*;
