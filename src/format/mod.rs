//! Output rendering for catalog pages (table, JSON, markdown, HTML).
//!
//! Every page renders exactly one view for its fetch phase: a loading
//! indicator, an error panel, the populated content, or a no-target notice.

mod html;

use crate::config::OutputFormat;
use crate::loader::FetchState;
use crate::pages::{DetailPage, ListPage};
use crate::routes::{Route, NAV_LINKS};
use crate::store::{Product, Rating};
use serde::Serialize;

pub use html::escape_html;

/// Listing header.
pub const CATALOG_HEADING: &str = "Product Catalog";

const LIST_LOADING: &str = "Loading products...";
const LIST_IDLE: &str = "The catalog is not loaded.";
const DETAIL_LOADING: &str = "Loading...";
const DETAIL_NO_TARGET: &str = "Product not found";
const CONTACT_NOTICE: &str = "The contact page is not available yet.";

/// One listing card as rendered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView<'a> {
    pub id: u64,
    pub title: &'a str,
    pub image: &'a str,
    pub href: String,
}

/// The detail view as rendered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView<'a> {
    pub id: u64,
    pub title: &'a str,
    pub price: f64,
    pub display_price: String,
    pub category: &'a str,
    pub description: &'a str,
    pub image: &'a str,
    pub rating: Rating,
    pub favorite: bool,
}

/// Renders pages in one output format.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Renders the listing page.
    pub fn render_list(&self, page: &ListPage) -> String {
        let state = page.state().map_value(|products| cards(page, products));

        let body = match self.format {
            OutputFormat::Json => return json(&state),
            OutputFormat::Table => self.table_list(&state),
            OutputFormat::Markdown => self.markdown_list(&state),
            OutputFormat::Html => html::list(&state),
        };

        self.with_navbar(body)
    }

    /// Renders the detail page.
    pub fn render_detail(&self, page: &DetailPage) -> String {
        let state = page.state().map_value(|product| detail_view(page, product));

        let body = match self.format {
            OutputFormat::Json => return json(&state),
            OutputFormat::Table => self.table_detail(&state),
            OutputFormat::Markdown => self.markdown_detail(&state),
            OutputFormat::Html => html::detail(&state),
        };

        self.with_navbar(body)
    }

    /// Renders the contact placeholder.
    pub fn render_contact(&self) -> String {
        self.render_notice(&Route::Contact, CONTACT_NOTICE)
    }

    /// Renders an unknown route.
    pub fn render_not_found(&self, path: &str) -> String {
        let route = Route::NotFound(path.to_string());
        self.render_notice(&route, &format!("Page not found: {}", path))
    }

    fn render_notice(&self, route: &Route, text: &str) -> String {
        let body = match self.format {
            OutputFormat::Json => {
                return json(&serde_json::json!({ "route": route.path(), "notice": text }))
            }
            OutputFormat::Table | OutputFormat::Markdown => text.to_string(),
            OutputFormat::Html => html::notice(text),
        };

        self.with_navbar(body)
    }

    fn with_navbar(&self, body: String) -> String {
        let nav = match self.format {
            OutputFormat::Json => return body,
            OutputFormat::Table => NAV_LINKS
                .iter()
                .map(|(label, href)| format!("{} ({})", label, href))
                .collect::<Vec<_>>()
                .join(" | "),
            OutputFormat::Markdown => NAV_LINKS
                .iter()
                .map(|(label, href)| format!("[{}]({})", label, href))
                .collect::<Vec<_>>()
                .join(" · "),
            OutputFormat::Html => return html::page(&body),
        };

        format!("{}\n\n{}", nav, body)
    }

    // Table formatting

    fn table_list(&self, state: &FetchState<Vec<CardView>>) -> String {
        match state {
            FetchState::Loading => LIST_LOADING.to_string(),
            FetchState::NoTarget => LIST_IDLE.to_string(),
            FetchState::Error { message } => format!("Error: {}", message),
            FetchState::Ready { value } => {
                let mut lines = Vec::new();
                lines.push(CATALOG_HEADING.to_string());
                lines.push(format!("{:=<width$}", "", width = CATALOG_HEADING.len()));

                if value.is_empty() {
                    lines.push(String::new());
                    lines.push("No products found.".to_string());
                }

                for card in value {
                    lines.push(String::new());
                    lines.push(format!("[{}] {}", card.id, card.title));
                    lines.push(format!("    Image:   {}", card.image));
                    lines.push(format!("    Details: {}", card.href));
                }

                lines.join("\n")
            }
        }
    }

    fn table_detail(&self, state: &FetchState<DetailView>) -> String {
        match state {
            FetchState::Loading => DETAIL_LOADING.to_string(),
            FetchState::Error { message } => message.clone(),
            FetchState::NoTarget => DETAIL_NO_TARGET.to_string(),
            FetchState::Ready { value } => {
                let lines = [
                    format!("Title:       {}", value.title),
                    format!("Price:       {}", summary_line(value)),
                    format!("Image:       {}", value.image),
                    format!("Description: {}", value.description),
                    format!("Favorite:    {}", if value.favorite { "♥ yes" } else { "no" }),
                ];
                lines.join("\n")
            }
        }
    }

    // Markdown formatting

    fn markdown_list(&self, state: &FetchState<Vec<CardView>>) -> String {
        match state {
            FetchState::Loading => format!("*{}*", LIST_LOADING),
            FetchState::NoTarget => format!("*{}*", LIST_IDLE),
            FetchState::Error { message } => format!("> **Error:** {}", message),
            FetchState::Ready { value } => {
                let mut lines = vec![format!("# {}", CATALOG_HEADING)];

                if value.is_empty() {
                    lines.push(String::new());
                    lines.push("No products found.".to_string());
                }

                for card in value {
                    lines.push(String::new());
                    lines.push(format!("### {}", card.title));
                    lines.push(String::new());
                    lines.push(format!("![{}]({})", card.title, card.image));
                    lines.push(String::new());
                    lines.push(format!("[View Details]({})", card.href));
                }

                lines.join("\n")
            }
        }
    }

    fn markdown_detail(&self, state: &FetchState<DetailView>) -> String {
        match state {
            FetchState::Loading => format!("*{}*", DETAIL_LOADING),
            FetchState::Error { message } => format!("> **{}**", message),
            FetchState::NoTarget => format!("*{}*", DETAIL_NO_TARGET),
            FetchState::Ready { value } => {
                let lines = [
                    format!("# {}", value.title),
                    String::new(),
                    format!("**{}**", summary_line(value)),
                    String::new(),
                    format!("![{}]({})", value.title, value.image),
                    String::new(),
                    value.description.to_string(),
                    String::new(),
                    format!("Favorite: {}", if value.favorite { "★" } else { "☆" }),
                ];
                lines.join("\n")
            }
        }
    }
}

/// `$9.99 - category - ⭐4.1 (259)`
fn summary_line(view: &DetailView) -> String {
    format!(
        "{} - {} - ⭐{} ({})",
        view.display_price, view.category, view.rating.rate, view.rating.count
    )
}

fn cards<'a>(page: &ListPage, products: &'a [Product]) -> Vec<CardView<'a>> {
    products
        .iter()
        .map(|product| CardView {
            id: product.id,
            title: &product.title,
            image: page.image_src(product),
            href: product.detail_path(),
        })
        .collect()
}

fn detail_view<'a>(page: &DetailPage, product: &'a Product) -> DetailView<'a> {
    DetailView {
        id: product.id,
        title: &product.title,
        price: product.price,
        display_price: product.display_price(),
        category: &product.category,
        description: &product.description,
        image: page.image_src(product),
        rating: product.rating,
        favorite: page.is_favorite(),
    }
}

fn json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}
