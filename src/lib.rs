//! catalog-front - Product catalog front-end for the Fake Store API
//!
//! A listing page showing the first products of the collection and a detail
//! page with a local favorite toggle, both driven by one generic fetch state
//! machine that discards stale responses.

pub mod commands;
pub mod config;
pub mod format;
pub mod loader;
pub mod pages;
pub mod routes;
pub mod session;
pub mod store;

pub use config::Config;
pub use loader::{FetchState, Phase, ResourceLoader};
pub use pages::{DetailPage, ListPage};
pub use routes::Route;
pub use store::{Product, Rating, StoreApi, StoreClient};
