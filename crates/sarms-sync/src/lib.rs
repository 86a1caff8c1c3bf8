//! Sync layer: pushes validated status changes and assignments to the backend.

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{BackendClient, SyncError};
