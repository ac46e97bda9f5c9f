//! Route rendering and interactive browsing commands.

use crate::config::Config;
use crate::session::Session;
use crate::store::{StoreApi, StoreClient};
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::info;

/// Drives a [`Session`] over the store client.
pub struct BrowseCommand {
    config: Config,
}

impl BrowseCommand {
    /// Creates a new browse command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    fn client(&self) -> Result<Arc<dyn StoreApi>> {
        let client = StoreClient::new(&self.config).context("Failed to create HTTP client")?;
        Ok(Arc::new(client))
    }

    /// Renders a single route once all of its requests have settled.
    pub async fn open(&self, path: &str) -> Result<String> {
        let client = self.client()?;
        Ok(self.open_with_client(client, path).await)
    }

    /// Renders a single route with a provided client (for testing).
    pub async fn open_with_client(&self, client: Arc<dyn StoreApi>, path: &str) -> String {
        let mut session = Session::new(client, &self.config);
        session.navigate(path);
        session.settle().await;
        session.render()
    }

    /// Runs an interactive session on stdin/stdout starting at `start`.
    pub async fn interactive(&self, start: &str) -> Result<()> {
        let mut session = Session::new(self.client()?, &self.config);
        session.navigate(start);

        info!("Starting browse session at {}", start);
        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        session.run(stdin, &mut stdout).await
    }
}
