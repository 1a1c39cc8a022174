//! # bridge-gateway
//!
//! WebSocket side of the bridge: a connection registry mapping sessions to
//! sockets, a per-session pump that forwards the library's update stream,
//! and a dispatcher for the handful of inbound client commands.

pub mod dispatch;
pub mod handler;
pub mod protocol;
pub mod registry;
pub mod state;
pub mod updates;

pub use handler::gateway_handler;
pub use protocol::Envelope;
pub use registry::ConnectionRegistry;
pub use state::GatewayState;
