//! Fake Store API access: HTTP client and data models.

pub mod client;
pub mod models;

pub use client::{FetchError, StoreApi, StoreClient};
pub use models::{Product, Rating};
