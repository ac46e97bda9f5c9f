//! Data models for Fake Store products and ratings.

use serde::{Deserialize, Serialize};

/// A product as served by the store API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product id, also the detail route parameter
    pub id: u64,
    /// Product title
    pub title: String,
    /// Unit price in USD
    pub price: f64,
    /// Long-form description
    pub description: String,
    /// Category name (e.g. "electronics")
    pub category: String,
    /// Image URI, possibly unreachable
    pub image: String,
    /// Aggregate customer rating
    pub rating: Rating,
}

impl Product {
    /// Returns the price formatted as dollars, e.g. `$9.99`.
    pub fn display_price(&self) -> String {
        format!("${:.2}", self.price)
    }

    /// Returns the route path of this product's detail view.
    pub fn detail_path(&self) -> String {
        format!("/products/{}", self.id)
    }
}

/// Product rating and review count.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rating {
    /// Average rating (0.0 - 5.0)
    pub rate: f64,
    /// Number of ratings
    pub count: u32,
}

impl Rating {
    /// Creates a new rating, clamping the rate into 0.0 - 5.0.
    pub fn new(rate: f64, count: u32) -> Self {
        Self { rate: rate.clamp(0.0, 5.0), count }
    }
}
