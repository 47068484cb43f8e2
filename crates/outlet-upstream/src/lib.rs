//! HTTP client for the upstream outlet data/search service.

pub mod client;
pub mod error;

pub use client::UpstreamClient;
pub use error::UpstreamError;
