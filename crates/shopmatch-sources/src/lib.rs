//! HTTP client for the upstream shop source.
//!
//! The source exposes the list of reporting companies and, per company, the
//! shops it reports. [`SourceClient::fetch_grouped`] combines both into the
//! ordered company → shops mapping the matcher consumes.

pub mod client;
pub mod error;
pub(crate) mod retry;

pub use client::SourceClient;
pub use error::SourceError;
