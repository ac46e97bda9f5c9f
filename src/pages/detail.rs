//! Product detail page with a local favorite toggle.

use crate::loader::{FetchState, Resource, ResourceLoader, Ticket};
use crate::pages::image::{ImageStatus, DETAIL_PLACEHOLDER};
use crate::store::{FetchError, Product, StoreApi};
use async_trait::async_trait;
use tracing::{debug, info};

/// A single product looked up by its route id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductLookup;

#[async_trait]
impl Resource for ProductLookup {
    type Key = String;
    type Output = Product;

    async fn fetch(&self, api: &dyn StoreApi, id: &String) -> Result<Product, FetchError> {
        api.product(id).await
    }

    fn failure_message(&self, id: &String) -> String {
        format!("Error loading product {}", id)
    }
}

/// Controller for the detail view.
pub struct DetailPage {
    loader: ResourceLoader<ProductLookup>,
    favorite: bool,
    image: ImageStatus,
}

impl DetailPage {
    /// Creates an unmounted detail page.
    pub fn new() -> Self {
        Self {
            loader: ResourceLoader::new(ProductLookup),
            favorite: false,
            image: ImageStatus::Unknown,
        }
    }

    /// Points the page at a product id.
    ///
    /// A missing or blank id moves to `NoTarget` without a request. A new id
    /// starts a request and returns its ticket; the id already shown is a no-op.
    pub fn set_target(&mut self, id: Option<&str>) -> Option<Ticket<String>> {
        let id = id.map(str::trim).filter(|id| !id.is_empty());

        let Some(id) = id else {
            debug!("No product id, nothing to load");
            self.reset_local();
            self.loader.clear();
            return None;
        };

        if self.loader.key().is_some_and(|current| current == id) {
            return None;
        }

        info!("Loading product {}", id);
        self.reset_local();
        Some(self.loader.begin(id.to_string()))
    }

    /// Discards state and the favorite flag.
    pub fn unmount(&mut self) {
        self.reset_local();
        self.loader.clear();
    }

    /// Commits the response for `ticket`.
    pub fn resolve(
        &mut self,
        ticket: &Ticket<String>,
        outcome: Result<Product, FetchError>,
    ) -> bool {
        self.loader.resolve(ticket, outcome)
    }

    /// Targets `id`, then fetches and commits in one step.
    pub async fn load(&mut self, api: &dyn StoreApi, id: Option<&str>) -> &FetchState<Product> {
        if let Some(ticket) = self.set_target(id) {
            let outcome = self.loader.resource().fetch(api, ticket.key()).await;
            self.loader.resolve(&ticket, outcome);
        }
        self.loader.state()
    }

    pub fn state(&self) -> &FetchState<Product> {
        self.loader.state()
    }

    /// Id of the product currently targeted.
    pub fn target(&self) -> Option<&str> {
        self.loader.key().map(String::as_str)
    }

    /// True if `ticket` is the newest request of this page.
    pub fn is_current(&self, ticket: &Ticket<String>) -> bool {
        self.loader.is_current(ticket)
    }

    pub fn is_favorite(&self) -> bool {
        self.favorite
    }

    /// Flips the favorite flag and returns the new value. Only a loaded
    /// product can be favorited; in any other phase this does nothing.
    pub fn toggle_favorite(&mut self) -> bool {
        if self.loader.state().is_ready() {
            self.favorite = !self.favorite;
        }
        self.favorite
    }

    /// Records an image probe result for the product of `ticket`.
    pub fn mark_image(&mut self, ticket: &Ticket<String>, reachable: bool) {
        if self.is_current(ticket) && self.loader.state().is_ready() {
            self.image = ImageStatus::from_probe(reachable);
        }
    }

    /// Marks the current product image as broken.
    pub fn mark_image_failed(&mut self) {
        if self.loader.state().is_ready() {
            self.image = ImageStatus::Failed;
        }
    }

    pub fn image_status(&self) -> ImageStatus {
        self.image
    }

    /// Image URI to render for the loaded product.
    pub fn image_src<'a>(&self, product: &'a Product) -> &'a str {
        self.image.source(&product.image, DETAIL_PLACEHOLDER)
    }

    fn reset_local(&mut self) {
        self.favorite = false;
        self.image = ImageStatus::Unknown;
    }
}

impl Default for DetailPage {
    fn default() -> Self {
        Self::new()
    }
}
