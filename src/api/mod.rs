pub mod client;
pub mod error;
pub mod models;

pub use client::ApiClient;
pub use error::ApiError;
pub use models::{AdminRequest, ChatReply, HistoryEntry, Patent, SearchPage, SearchQuery, User};
