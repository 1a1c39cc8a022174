//! # bridge-api
//!
//! HTTP surface of the bridge: route handlers, extractors, error→HTTP
//! mapping, middleware, and server wiring. The WebSocket endpoint is mounted
//! here but lives in `bridge-gateway`.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run};
pub use state::AppState;
