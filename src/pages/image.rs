//! Image load tracking and placeholder substitution.
//!
//! Image failures are view-local: they swap the rendered URI for a placeholder
//! and never touch the fetch phase of the page.

/// Placeholder shown on listing cards when a product image fails.
pub const CARD_PLACEHOLDER: &str = "https://placehold.co/150x150/607D8B/FFFFFF?text=Image+Error";

/// Placeholder shown on the detail view when the product image fails.
pub const DETAIL_PLACEHOLDER: &str = "https://placehold.co/256x256/607D8B/FFFFFF?text=Image+Error";

/// Load status of one rendered image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageStatus {
    /// Not probed yet; rendered optimistically.
    #[default]
    Unknown,
    Loaded,
    Failed,
}

impl ImageStatus {
    /// Status from a reachability probe.
    pub fn from_probe(reachable: bool) -> Self {
        if reachable {
            ImageStatus::Loaded
        } else {
            ImageStatus::Failed
        }
    }

    /// The URI to render: the original unless the image failed.
    pub fn source<'a>(&self, original: &'a str, placeholder: &'a str) -> &'a str {
        match self {
            ImageStatus::Failed => placeholder,
            _ => original,
        }
    }
}
