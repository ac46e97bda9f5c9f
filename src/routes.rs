//! Route table for the catalog front-end.

use std::fmt;

/// Links shown in the navigation bar, in order.
pub const NAV_LINKS: [(&str, &str); 2] = [("Home", "/"), ("Contact", "/Contact")];

/// A resolved front-end route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/` - product listing
    Home,
    /// `/products/{id}` - product detail; the id may be empty
    Product(String),
    /// `/Contact` - linked from the navbar, no page behind it
    Contact,
    /// Anything else
    NotFound(String),
}

impl Route {
    /// Resolves a path. Query strings, fragments and trailing slashes are ignored.
    /// The product id is percent-decoded; invalid UTF-8 keeps the raw segment.
    pub fn parse(path: &str) -> Self {
        let path = path.trim();
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');

        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["products"] => Route::Product(String::new()),
            ["products", id] => Route::Product(decode_segment(id)),
            ["Contact"] => Route::Contact,
            _ => Route::NotFound(path.to_string()),
        }
    }

    /// Canonical path of this route.
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Product(id) => format!("/products/{}", urlencoding::encode(id)),
            Route::Contact => "/Contact".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }
}

fn decode_segment(segment: &str) -> String {
    urlencoding::decode(segment).map(|s| s.into_owned()).unwrap_or_else(|_| segment.to_string())
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}
