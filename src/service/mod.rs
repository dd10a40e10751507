//! HTTP client for the remote literature search service and response normalization.

pub mod client;
pub mod normalize;
pub mod types;

pub use client::{SearchBackend, ServiceClient, ServiceError};
pub use normalize::{ResultMeta, SearchOutcome, SearchResult};
pub use types::SearchRequest;
