//! HTTP request handlers for the pricing API.

pub mod health;
pub mod metrics_handler;
pub mod moderate;
pub mod suggest;

pub use suggest::AppState;
