//! Interactive browsing session.
//!
//! Reads navigation commands line by line and keeps both page controllers
//! mounted or unmounted according to the current route. Requests run as tasks
//! on a [`JoinSet`]; each completion carries the ticket it was issued under and
//! is committed only if that ticket is still current, so a slow response for a
//! product the user already navigated away from never overwrites the view.

use crate::config::Config;
use crate::format::Formatter;
use crate::loader::{Resource, Ticket};
use crate::pages::{DetailPage, ListPage, ProductLookup};
use crate::routes::Route;
use crate::store::{FetchError, Product, StoreApi};
use anyhow::Result;
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::task::JoinSet;
use tracing::{debug, warn};

const HELP: &str = "Commands:
  open <path>    navigate to /, /products/<id> or /Contact
  fav            toggle favorite on the product page
  image-failed   treat the product image as broken
  show           render the current page again
  help           show this message
  quit           leave the session";

/// A line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(String),
    Favorite,
    ImageFailed,
    Show,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (verb, arg) = match s.split_once(char::is_whitespace) {
            Some((verb, arg)) => (verb, arg.trim()),
            None => (s, ""),
        };

        match verb {
            path if path.starts_with('/') => Ok(Command::Open(path.to_string())),
            "open" | "go" if !arg.is_empty() => Ok(Command::Open(arg.to_string())),
            "open" | "go" => Err(format!("Usage: {} <path>", verb)),
            "fav" | "favorite" => Ok(Command::Favorite),
            "image-failed" => Ok(Command::ImageFailed),
            "show" => Ok(Command::Show),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            _ => Err(format!("Unknown command: {}. Type 'help' for commands.", s)),
        }
    }
}

/// Result of a background task, tagged with the request it belongs to.
#[derive(Debug)]
pub enum Completion {
    List(Ticket<()>, Result<Vec<Product>, FetchError>),
    Detail(Ticket<String>, Result<Product, FetchError>),
    ListImage(Ticket<()>, u64, bool),
    DetailImage(Ticket<String>, bool),
}

/// Route-driven front-end session.
pub struct Session {
    api: Arc<dyn StoreApi>,
    formatter: Formatter,
    probe_images: bool,
    route: Option<Route>,
    list: ListPage,
    detail: DetailPage,
    tasks: JoinSet<Completion>,
}

impl Session {
    /// Creates a session with no page mounted.
    pub fn new(api: Arc<dyn StoreApi>, config: &Config) -> Self {
        Self {
            api,
            formatter: Formatter::new(config.format),
            probe_images: config.probe_images,
            route: None,
            list: ListPage::new(config.list_limit),
            detail: DetailPage::new(),
            tasks: JoinSet::new(),
        }
    }

    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    pub fn list(&self) -> &ListPage {
        &self.list
    }

    pub fn detail(&self) -> &DetailPage {
        &self.detail
    }

    /// Number of requests and probes still running.
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Navigates to `path`, unmounting the page being left and mounting the
    /// page entered. Moving between product ids keeps the detail page mounted
    /// and only refetches.
    pub fn navigate(&mut self, path: &str) {
        let next = Route::parse(path);
        if self.route.as_ref() == Some(&next) {
            return;
        }

        debug!("Navigating to {}", next);
        let previous = self.route.replace(next.clone());

        match previous {
            Some(Route::Home) => self.list.unmount(),
            Some(Route::Product(_)) if !matches!(next, Route::Product(_)) => self.detail.unmount(),
            _ => {}
        }

        match next {
            Route::Home => {
                let ticket = self.list.mount();
                self.spawn_list(ticket);
            }
            Route::Product(id) => {
                if let Some(ticket) = self.detail.set_target(Some(id.as_str())) {
                    self.spawn_detail(ticket);
                }
            }
            Route::Contact | Route::NotFound(_) => {}
        }
    }

    /// Toggles the favorite flag when the product page is showing.
    pub fn toggle_favorite(&mut self) -> bool {
        match self.route {
            Some(Route::Product(_)) => self.detail.toggle_favorite(),
            _ => false,
        }
    }

    /// Commits a finished task. Returns true if the visible page changed.
    pub fn apply(&mut self, completion: Completion) -> bool {
        match completion {
            Completion::List(ticket, outcome) => {
                if !self.list.resolve(&ticket, outcome) {
                    return false;
                }
                if self.probe_images {
                    let images: Vec<(u64, String)> = self
                        .list
                        .state()
                        .value()
                        .map(|products| products.iter().map(|p| (p.id, p.image.clone())).collect())
                        .unwrap_or_default();

                    for (id, url) in images {
                        self.spawn_list_image(ticket.clone(), id, url);
                    }
                }
                true
            }
            Completion::Detail(ticket, outcome) => {
                if !self.detail.resolve(&ticket, outcome) {
                    return false;
                }
                if self.probe_images {
                    if let Some(url) = self.detail.state().value().map(|p| p.image.clone()) {
                        self.spawn_detail_image(ticket, url);
                    }
                }
                true
            }
            Completion::ListImage(ticket, id, reachable) => {
                if !self.list.is_current(&ticket) {
                    return false;
                }
                self.list.mark_image(&ticket, id, reachable);
                !reachable
            }
            Completion::DetailImage(ticket, reachable) => {
                if !self.detail.is_current(&ticket) {
                    return false;
                }
                self.detail.mark_image(&ticket, reachable);
                !reachable
            }
        }
    }

    /// Waits for every running task and commits the results.
    pub async fn settle(&mut self) {
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(completion) => {
                    self.apply(completion);
                }
                Err(e) => warn!("Background task failed: {}", e),
            }
        }
    }

    /// Renders the page for the current route.
    pub fn render(&self) -> String {
        match &self.route {
            None | Some(Route::Home) => self.formatter.render_list(&self.list),
            Some(Route::Product(_)) => self.formatter.render_detail(&self.detail),
            Some(Route::Contact) => self.formatter.render_contact(),
            Some(Route::NotFound(path)) => self.formatter.render_not_found(path),
        }
    }

    /// Runs the command loop until `quit`, or until input ends and all
    /// in-flight tasks have settled. The page is rendered after each change.
    pub async fn run<R, W>(&mut self, input: R, output: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        let mut input_open = true;

        write_block(output, &self.render()).await?;

        loop {
            if !input_open && self.tasks.is_empty() {
                break;
            }

            tokio::select! {
                line = lines.next_line(), if input_open => {
                    let Some(line) = line? else {
                        debug!("Input closed, waiting for {} task(s)", self.tasks.len());
                        input_open = false;
                        continue;
                    };

                    if line.trim().is_empty() {
                        continue;
                    }

                    match line.parse::<Command>() {
                        Ok(Command::Quit) => {
                            self.tasks.abort_all();
                            break;
                        }
                        Ok(Command::Help) => write_block(output, HELP).await?,
                        Ok(command) => {
                            self.execute(command);
                            write_block(output, &self.render()).await?;
                        }
                        Err(e) => write_block(output, &e).await?,
                    }
                }
                Some(joined) = self.tasks.join_next(), if !self.tasks.is_empty() => {
                    match joined {
                        Ok(completion) => {
                            if self.apply(completion) {
                                write_block(output, &self.render()).await?;
                            }
                        }
                        Err(e) => warn!("Background task failed: {}", e),
                    }
                }
            }
        }

        Ok(())
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::Open(path) => self.navigate(&path),
            Command::Favorite => {
                self.toggle_favorite();
            }
            Command::ImageFailed => {
                if matches!(self.route, Some(Route::Product(_))) {
                    self.detail.mark_image_failed();
                }
            }
            Command::Show | Command::Help | Command::Quit => {}
        }
    }

    fn spawn_list(&mut self, ticket: Ticket<()>) {
        let api = Arc::clone(&self.api);
        let listing = *self.list.listing();

        self.tasks.spawn(async move {
            let outcome = listing.fetch(&*api, ticket.key()).await;
            Completion::List(ticket, outcome)
        });
    }

    fn spawn_detail(&mut self, ticket: Ticket<String>) {
        let api = Arc::clone(&self.api);

        self.tasks.spawn(async move {
            let outcome = ProductLookup.fetch(&*api, ticket.key()).await;
            Completion::Detail(ticket, outcome)
        });
    }

    fn spawn_list_image(&mut self, ticket: Ticket<()>, id: u64, url: String) {
        let api = Arc::clone(&self.api);

        self.tasks.spawn(async move {
            let reachable = api.probe_image(&url).await;
            Completion::ListImage(ticket, id, reachable)
        });
    }

    fn spawn_detail_image(&mut self, ticket: Ticket<String>, url: String) {
        let api = Arc::clone(&self.api);

        self.tasks.spawn(async move {
            let reachable = api.probe_image(&url).await;
            Completion::DetailImage(ticket, reachable)
        });
    }
}

async fn write_block<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n\n").await?;
    output.flush().await?;
    Ok(())
}
