//! Request extractors

mod query;
mod session;
mod validated;

pub use query::{DialogsQuery, HistoryQuery, ValidatedQuery};
pub use session::SessionId;
pub use validated::ValidatedJson;
