//! Product detail command implementation.

use crate::config::Config;
use crate::format::Formatter;
use crate::loader::Resource;
use crate::pages::{DetailPage, ProductLookup};
use crate::store::{StoreApi, StoreClient};
use anyhow::{Context, Result};
use tracing::debug;

/// Renders the detail page of one product.
pub struct ShowCommand {
    config: Config,
}

impl ShowCommand {
    /// Creates a new show command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Fetches a product and returns the rendered page.
    pub async fn execute(&self, id: &str, favorite: bool) -> Result<String> {
        let client = StoreClient::new(&self.config).context("Failed to create HTTP client")?;

        self.execute_with_client(&client, id, favorite).await
    }

    /// Fetches a product with a provided client (for testing). With
    /// `favorite` set the product is shown as favorited once loaded.
    pub async fn execute_with_client(
        &self,
        client: &impl StoreApi,
        id: &str,
        favorite: bool,
    ) -> Result<String> {
        let mut page = DetailPage::new();

        if let Some(ticket) = page.set_target(Some(id)) {
            let outcome = ProductLookup.fetch(client, ticket.key()).await;
            page.resolve(&ticket, outcome);

            if self.config.probe_images {
                if let Some(url) = page.state().value().map(|p| p.image.clone()) {
                    let reachable = client.probe_image(&url).await;
                    debug!("Image for product {} reachable: {}", id, reachable);
                    page.mark_image(&ticket, reachable);
                }
            }
        }

        if favorite {
            page.toggle_favorite();
        }

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.render_detail(&page))
    }
}
