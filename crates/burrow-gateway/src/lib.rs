//! HTTP gateway for the Burrow URL shortener.
//!
//! Exposes `POST /shorten` and `GET /sh/{code}` on top of any
//! [`Shortener`][burrow_core::Shortener].

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;
pub mod telemetry;

pub use app::App;
pub use state::AppState;
