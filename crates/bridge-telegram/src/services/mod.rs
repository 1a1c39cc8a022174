//! Per-domain services
//!
//! Each service borrows the shared context and translates one family of API
//! operations into library calls.

mod auth;
mod chats;
mod media;
mod messages;

pub use auth::{AuthService, SignInOutcome};
pub use chats::ChatService;
pub use media::MediaService;
pub use messages::MessageService;
