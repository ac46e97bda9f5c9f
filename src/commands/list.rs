//! Listing command implementation.

use crate::config::Config;
use crate::format::Formatter;
use crate::loader::Resource;
use crate::pages::ListPage;
use crate::store::{StoreApi, StoreClient};
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Renders the product listing page.
pub struct ListCommand {
    config: Config,
}

impl ListCommand {
    /// Creates a new list command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Fetches the listing and returns the rendered page.
    pub async fn execute(&self) -> Result<String> {
        let client = StoreClient::new(&self.config).context("Failed to create HTTP client")?;

        self.execute_with_client(Arc::new(client)).await
    }

    /// Fetches the listing with a provided client (for testing).
    pub async fn execute_with_client(&self, client: Arc<dyn StoreApi>) -> Result<String> {
        let mut page = ListPage::new(self.config.list_limit);

        let ticket = page.mount();
        let listing = *page.listing();
        let outcome = listing.fetch(&*client, ticket.key()).await;
        page.resolve(&ticket, outcome);

        if self.config.probe_images {
            let images: Vec<(u64, String)> = page
                .state()
                .value()
                .map(|products| products.iter().map(|p| (p.id, p.image.clone())).collect())
                .unwrap_or_default();

            let mut probes = JoinSet::new();
            for (id, url) in images {
                let client = Arc::clone(&client);
                probes.spawn(async move { (id, client.probe_image(&url).await) });
            }

            while let Some(joined) = probes.join_next().await {
                match joined {
                    Ok((id, reachable)) => {
                        debug!("Image for product {} reachable: {}", id, reachable);
                        page.mark_image(&ticket, id, reachable);
                    }
                    Err(e) => warn!("Image check failed: {}", e),
                }
            }
        }

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.render_list(&page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::pages::image::CARD_PLACEHOLDER;
    use crate::pages::LIST_FAILURE_MESSAGE;
    use crate::store::{FetchError, Product, Rating};
    use async_trait::async_trait;
    use std::time::{Duration, Instant};

    /// Mock store client for testing.
    struct MockStoreClient {
        count: u64,
        should_fail: bool,
        broken_image: Option<u64>,
        image_delay: Duration,
    }

    impl MockStoreClient {
        fn new(count: u64) -> Self {
            Self { count, should_fail: false, broken_image: None, image_delay: Duration::ZERO }
        }

        fn failing() -> Self {
            Self { count: 0, should_fail: true, broken_image: None, image_delay: Duration::ZERO }
        }
    }

    #[async_trait]
    impl StoreApi for MockStoreClient {
        async fn products(&self) -> Result<Vec<Product>, FetchError> {
            if self.should_fail {
                return Err(FetchError::Transport("Simulated network error".to_string()));
            }
            Ok((1..=self.count).map(make_product).collect())
        }

        async fn product(&self, _id: &str) -> Result<Product, FetchError> {
            Err(FetchError::Status(404))
        }

        async fn probe_image(&self, url: &str) -> bool {
            tokio::time::sleep(self.image_delay).await;
            match self.broken_image {
                Some(id) => !url.ends_with(&format!("/{}.jpg", id)),
                None => true,
            }
        }
    }

    fn make_product(id: u64) -> Product {
        Product {
            id,
            title: format!("Item {}", id),
            price: 12.5,
            description: "desc".to_string(),
            category: "misc".to_string(),
            image: format!("https://img.example/{}.jpg", id),
            rating: Rating::new(3.9, 120),
        }
    }

    fn make_test_config() -> Config {
        Config { probe_images: false, ..Config::default() }
    }

    #[tokio::test]
    async fn test_list_command_basic() {
        let client = MockStoreClient::new(7);
        let cmd = ListCommand::new(make_test_config());

        let output = cmd.execute_with_client(Arc::new(client)).await.unwrap();
        assert!(output.contains("Product Catalog"));
        assert!(output.contains("[5] Item 5"));
        assert!(!output.contains("[6] Item 6"));
    }

    #[tokio::test]
    async fn test_list_command_limit_from_config() {
        let client = MockStoreClient::new(7);
        let mut config = make_test_config();
        config.list_limit = 2;
        let cmd = ListCommand::new(config);

        let output = cmd.execute_with_client(Arc::new(client)).await.unwrap();
        assert!(output.contains("[2] Item 2"));
        assert!(!output.contains("[3] Item 3"));
    }

    #[tokio::test]
    async fn test_list_command_network_error_renders_error_view() {
        let client = MockStoreClient::failing();
        let cmd = ListCommand::new(make_test_config());

        let output = cmd.execute_with_client(Arc::new(client)).await.unwrap();
        assert!(output.contains(LIST_FAILURE_MESSAGE));
        assert!(!output.contains("Simulated network error"));
    }

    #[tokio::test]
    async fn test_list_command_json_format() {
        let client = MockStoreClient::new(3);
        let mut config = make_test_config();
        config.format = OutputFormat::Json;
        let cmd = ListCommand::new(config);

        let output = cmd.execute_with_client(Arc::new(client)).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["value"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_list_command_probes_images() {
        let mut client = MockStoreClient::new(3);
        client.broken_image = Some(2);
        let config = Config { probe_images: true, ..Config::default() };
        let cmd = ListCommand::new(config);

        let output = cmd.execute_with_client(Arc::new(client)).await.unwrap();
        assert!(output.contains("https://img.example/1.jpg"));
        assert!(!output.contains("https://img.example/2.jpg"));
        assert!(output.contains(CARD_PLACEHOLDER));
    }

    #[tokio::test]
    async fn test_list_command_checks_images_concurrently() {
        let mut client = MockStoreClient::new(5);
        client.image_delay = Duration::from_millis(200);
        let config = Config { probe_images: true, ..Config::default() };
        let cmd = ListCommand::new(config);

        let started = Instant::now();
        let output = cmd.execute_with_client(Arc::new(client)).await.unwrap();

        assert!(started.elapsed() < Duration::from_millis(800));
        assert!(output.contains("https://img.example/5.jpg"));
        assert!(!output.contains(CARD_PLACEHOLDER));
    }
}
