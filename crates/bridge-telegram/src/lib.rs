//! # bridge-telegram
//!
//! The session/client registry and the per-domain services that translate
//! API requests into `layer-client` calls and reshape the library's TL
//! objects into JSON views.
//!
//! Nothing in this crate speaks MTProto: protocol framing, encryption, and
//! transport all live inside the wrapped library.

pub mod context;
pub mod directory;
pub mod error;
pub mod format;
pub mod peer;
pub mod registry;
pub mod services;
pub mod store;
pub mod types;

pub use context::BridgeContext;
pub use directory::{PeerDirectory, PeerInfo};
pub use registry::ClientRegistry;
pub use services::{AuthService, ChatService, MediaService, MessageService, SignInOutcome};
pub use store::{SessionRecord, SessionStore};
pub use types::{ChatKind, DialogSummary, EntitySummary, MediaDownload, MediaKind, MessageView, UserProfile};
