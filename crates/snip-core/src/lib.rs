//! Core types and traits for the Snip URL shortener.
//!
//! This crate provides the types shared by the store, the shortening
//! service, and the HTTP gateway.

pub mod error;
pub mod shortcode;
pub mod shortener;
pub mod store;

pub use error::{CoreError, ShortenerError, StoreError};
pub use shortcode::ShortCode;
pub use shortener::{Shortened, Shortener};
pub use store::{Mapping, ReadStore, Store};
