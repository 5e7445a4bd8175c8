//! HTTP gateway for the Snip URL shortener.
//!
//! A thin axum adapter: it decodes requests, calls a [`Shortener`], and maps
//! the result onto status codes and JSON bodies.
//!
//! [`Shortener`]: snip_core::Shortener

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use state::AppState;
