//! URL shortening service implementation.
//!
//! This crate provides [`ShortenerService`], which validates long URLs,
//! derives content-based short codes, and registers them idempotently in a
//! [`Store`](snip_core::Store). Core types are re-exported from `snip_core`.

pub mod service;

pub use service::{ShortenerService, ShortenerSettings};
pub use snip_core::{ShortCode, Shortened, Shortener, ShortenerError};
