//! catalog-front - Product catalog front-end for the Fake Store API
//!
//! Renders the listing and detail pages in the terminal, or browses them
//! interactively by route.

use anyhow::Result;
use catalog_front::commands::{BrowseCommand, ListCommand, ShowCommand};
use catalog_front::config::{Config, OutputFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "catalog-front",
    version,
    about = "Product catalog front-end for the Fake Store API",
    long_about = "Lists products, shows product details and browses the catalog by route."
)]
struct Cli {
    /// Store API base URL
    #[arg(long, global = true, env = "CATALOG_API_URL")]
    api_url: Option<String>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "CATALOG_PROXY")]
    proxy: Option<String>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Number of products on the listing page
    #[arg(short, long, global = true)]
    limit: Option<usize>,

    /// Skip checking product images
    #[arg(long, global = true)]
    no_image_check: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the product listing
    #[command(alias = "ls")]
    List,

    /// Show one product
    #[command(alias = "p")]
    Show {
        /// Product id
        id: String,

        /// Show the product as favorited
        #[arg(long)]
        favorite: bool,
    },

    /// Render a route, e.g. / or /products/3
    Open {
        /// Route path
        path: String,
    },

    /// Browse interactively from a starting route
    #[command(alias = "b")]
    Browse {
        /// Starting route
        #[arg(default_value = "/")]
        start: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so rendered pages stay clean on stdout
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(limit) = cli.limit {
        config.list_limit = limit;
    }
    if cli.no_image_check {
        config.probe_images = false;
    }

    match cli.command {
        Commands::List => {
            let output = ListCommand::new(config).execute().await?;
            println!("{}", output);
        }

        Commands::Show { id, favorite } => {
            let output = ShowCommand::new(config).execute(&id, favorite).await?;
            println!("{}", output);
        }

        Commands::Open { path } => {
            let output = BrowseCommand::new(config).open(&path).await?;
            println!("{}", output);
        }

        Commands::Browse { start } => {
            BrowseCommand::new(config).interactive(&start).await?;
        }
    }

    Ok(())
}
