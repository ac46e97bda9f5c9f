//! Product listing page: the first few products of the collection.

use crate::loader::{FetchState, Resource, ResourceLoader, Ticket};
use crate::pages::image::{ImageStatus, CARD_PLACEHOLDER};
use crate::store::{FetchError, Product, StoreApi};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::info;

/// Shown for any listing failure, whatever the cause.
pub const LIST_FAILURE_MESSAGE: &str =
    "Failed to fetch products after multiple retries. Please check the network.";

/// Number of products the listing shows by default.
pub const DEFAULT_LIST_LIMIT: usize = 5;

/// The product collection, truncated to `limit` entries in server order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogListing {
    limit: usize,
}

impl CatalogListing {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for CatalogListing {
    fn default() -> Self {
        Self::new(DEFAULT_LIST_LIMIT)
    }
}

#[async_trait]
impl Resource for CatalogListing {
    type Key = ();
    type Output = Vec<Product>;

    async fn fetch(&self, api: &dyn StoreApi, _key: &()) -> Result<Vec<Product>, FetchError> {
        let mut products = api.products().await?;
        products.truncate(self.limit);
        Ok(products)
    }

    fn failure_message(&self, _key: &()) -> String {
        LIST_FAILURE_MESSAGE.to_string()
    }
}

/// Controller for the listing view.
pub struct ListPage {
    loader: ResourceLoader<CatalogListing>,
    images: HashMap<u64, ImageStatus>,
}

impl ListPage {
    /// Creates an unmounted listing page.
    pub fn new(limit: usize) -> Self {
        Self { loader: ResourceLoader::new(CatalogListing::new(limit)), images: HashMap::new() }
    }

    /// Mounts the page, starting its single collection request.
    pub fn mount(&mut self) -> Ticket<()> {
        info!("Loading product listing");
        self.images.clear();
        self.loader.begin(())
    }

    /// Discards state; a response still in flight will be dropped.
    pub fn unmount(&mut self) {
        self.images.clear();
        self.loader.clear();
    }

    /// Commits the collection response for `ticket`.
    pub fn resolve(
        &mut self,
        ticket: &Ticket<()>,
        outcome: Result<Vec<Product>, FetchError>,
    ) -> bool {
        self.loader.resolve(ticket, outcome)
    }

    /// Mounts, fetches and commits in one step.
    pub async fn load(&mut self, api: &dyn StoreApi) -> &FetchState<Vec<Product>> {
        self.images.clear();
        self.loader.load(api, ()).await
    }

    pub fn state(&self) -> &FetchState<Vec<Product>> {
        self.loader.state()
    }

    pub fn listing(&self) -> &CatalogListing {
        self.loader.resource()
    }

    /// True if `ticket` is the request of the current mount.
    pub fn is_current(&self, ticket: &Ticket<()>) -> bool {
        self.loader.is_current(ticket)
    }

    /// Records an image probe result for a displayed product. Ignored for
    /// stale mounts and for products not on the page.
    pub fn mark_image(&mut self, ticket: &Ticket<()>, product_id: u64, reachable: bool) {
        if !self.is_current(ticket) {
            return;
        }

        let shown = self
            .state()
            .value()
            .is_some_and(|products| products.iter().any(|p| p.id == product_id));

        if shown {
            self.images.insert(product_id, ImageStatus::from_probe(reachable));
        }
    }

    pub fn image_status(&self, product_id: u64) -> ImageStatus {
        self.images.get(&product_id).copied().unwrap_or_default()
    }

    /// Image URI to render for a listed product.
    pub fn image_src<'a>(&self, product: &'a Product) -> &'a str {
        self.image_status(product.id).source(&product.image, CARD_PLACEHOLDER)
    }
}

impl Default for ListPage {
    fn default() -> Self {
        Self::new(DEFAULT_LIST_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::Phase;
    use crate::store::Rating;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock store returning a fixed collection.
    struct MockStore {
        products: Vec<Product>,
        should_fail: Option<FetchError>,
        calls: AtomicUsize,
    }

    impl MockStore {
        fn with_products(count: u64) -> Self {
            Self {
                products: (1..=count).map(make_product).collect(),
                should_fail: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(error: FetchError) -> Self {
            Self { products: Vec::new(), should_fail: Some(error), calls: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl StoreApi for MockStore {
        async fn products(&self) -> Result<Vec<Product>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.should_fail {
                Some(e) => Err(e.clone()),
                None => Ok(self.products.clone()),
            }
        }

        async fn product(&self, _id: &str) -> Result<Product, FetchError> {
            unreachable!("listing never fetches single products")
        }

        async fn probe_image(&self, _url: &str) -> bool {
            true
        }
    }

    fn make_product(id: u64) -> Product {
        Product {
            id,
            title: format!("Product {}", id),
            price: id as f64 * 10.0,
            description: "desc".to_string(),
            category: "misc".to_string(),
            image: format!("https://img.example/{}.jpg", id),
            rating: Rating::new(4.0, 10),
        }
    }

    fn ids(state: &FetchState<Vec<Product>>) -> Vec<u64> {
        state.value().unwrap().iter().map(|p| p.id).collect()
    }

    #[tokio::test]
    async fn test_truncates_to_first_five_in_order() {
        let store = MockStore::with_products(20);
        let mut page = ListPage::default();

        let state = page.load(&store).await;
        assert_eq!(state.phase(), Phase::Ready);
        assert_eq!(ids(state), vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_exactly_five() {
        let store = MockStore::with_products(5);
        let mut page = ListPage::default();

        assert_eq!(ids(page.load(&store).await), vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_fewer_than_five_shows_all() {
        let store = MockStore::with_products(3);
        let mut page = ListPage::default();

        assert_eq!(ids(page.load(&store).await), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_empty_collection_is_ready() {
        let store = MockStore::with_products(0);
        let mut page = ListPage::default();

        let state = page.load(&store).await;
        assert_eq!(state.phase(), Phase::Ready);
        assert!(state.value().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_server_order_preserved() {
        let mut store = MockStore::with_products(0);
        store.products = vec![make_product(9), make_product(3), make_product(7)];
        let mut page = ListPage::default();

        assert_eq!(ids(page.load(&store).await), vec![9, 3, 7]);
    }

    #[tokio::test]
    async fn test_custom_limit() {
        let store = MockStore::with_products(10);
        let mut page = ListPage::new(2);

        assert_eq!(ids(page.load(&store).await), vec![1, 2]);
        assert_eq!(page.listing().limit(), 2);
    }

    #[tokio::test]
    async fn test_failure_message_is_fixed_for_every_cause() {
        for error in [
            FetchError::Status(404),
            FetchError::Status(500),
            FetchError::Transport("connection refused".to_string()),
            FetchError::Decode("expected array".to_string()),
        ] {
            let store = MockStore::failing(error);
            let mut page = ListPage::default();

            let state = page.load(&store).await;
            assert_eq!(state.phase(), Phase::Error);
            assert_eq!(state.error_message(), Some(LIST_FAILURE_MESSAGE));
        }
    }

    #[tokio::test]
    async fn test_no_retry_on_failure() {
        let store = MockStore::failing(FetchError::Status(503));
        let mut page = ListPage::default();

        page.load(&store).await;
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_each_mount_fetches_again() {
        let store = MockStore::with_products(3);
        let mut page = ListPage::default();

        page.load(&store).await;
        page.unmount();
        page.load(&store).await;
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_mount_enters_loading() {
        let mut page = ListPage::default();
        assert_eq!(page.state().phase(), Phase::NoTarget);

        let ticket = page.mount();
        assert_eq!(page.state().phase(), Phase::Loading);
        assert!(page.is_current(&ticket));
    }

    #[test]
    fn test_response_after_unmount_is_dropped() {
        let mut page = ListPage::default();
        let ticket = page.mount();
        page.unmount();

        assert!(!page.resolve(&ticket, Ok(vec![make_product(1)])));
        assert_eq!(page.state().phase(), Phase::NoTarget);
    }

    #[test]
    fn test_response_from_previous_mount_is_dropped() {
        let mut page = ListPage::default();
        let first = page.mount();
        page.unmount();
        let second = page.mount();

        assert!(!page.resolve(&first, Ok(vec![make_product(1)])));
        assert!(page.resolve(&second, Ok(vec![make_product(2)])));
        assert_eq!(ids(page.state()), vec![2]);
    }

    #[test]
    fn test_image_failure_keeps_phase() {
        let mut page = ListPage::default();
        let ticket = page.mount();
        page.resolve(&ticket, Ok(vec![make_product(1), make_product(2)]));

        page.mark_image(&ticket, 1, false);
        page.mark_image(&ticket, 2, true);

        assert_eq!(page.state().phase(), Phase::Ready);
        let products = page.state().value().unwrap().clone();
        assert_eq!(page.image_src(&products[0]), CARD_PLACEHOLDER);
        assert_eq!(page.image_src(&products[1]), "https://img.example/2.jpg");
    }

    #[test]
    fn test_image_marks_ignored_when_stale_or_unlisted() {
        let mut page = ListPage::default();
        let old = page.mount();
        let ticket = page.mount();
        page.resolve(&ticket, Ok(vec![make_product(1)]));

        page.mark_image(&old, 1, false);
        page.mark_image(&ticket, 99, false);

        assert_eq!(page.image_status(1), ImageStatus::Unknown);
        assert_eq!(page.image_status(99), ImageStatus::Unknown);
    }
}
