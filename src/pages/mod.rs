//! Page controllers built on the shared resource loader.

pub mod detail;
pub mod image;
pub mod list;

pub use detail::{DetailPage, ProductLookup};
pub use image::ImageStatus;
pub use list::{CatalogListing, ListPage, LIST_FAILURE_MESSAGE};
