//! HTML fragments for the catalog pages.

use super::{
    summary_line, CardView, DetailView, CATALOG_HEADING, DETAIL_LOADING, DETAIL_NO_TARGET,
    LIST_IDLE, LIST_LOADING,
};
use crate::loader::FetchState;
use crate::routes::NAV_LINKS;

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wraps a page body with the navigation bar.
pub(super) fn page(body: &str) -> String {
    let links: Vec<String> = NAV_LINKS
        .iter()
        .map(|(label, href)| format!(r#"<a href="{}">{}</a>"#, href, label))
        .collect();

    format!("<nav>{}</nav>\n<main>\n{}\n</main>", links.join(""), body)
}

pub(super) fn list(state: &FetchState<Vec<CardView>>) -> String {
    match state {
        FetchState::Loading => format!(r#"<div class="loading">{}</div>"#, LIST_LOADING),
        FetchState::NoTarget => format!(r#"<div class="notice">{}</div>"#, LIST_IDLE),
        FetchState::Error { message } => {
            format!(r#"<div class="error">Error: {}</div>"#, escape_html(message))
        }
        FetchState::Ready { value } => {
            let mut lines = vec![format!("<header><h1>{}</h1></header>", CATALOG_HEADING)];

            for card in value {
                let title = escape_html(card.title);
                lines.push(format!(
                    r#"<div class="card"><img src="{}" alt="{}"><h2>{}</h2><a href="{}">View Details</a></div>"#,
                    escape_html(card.image),
                    title,
                    title,
                    escape_html(&card.href)
                ));
            }

            lines.join("\n")
        }
    }
}

pub(super) fn detail(state: &FetchState<DetailView>) -> String {
    match state {
        FetchState::Loading => format!(r#"<div class="loading">{}</div>"#, DETAIL_LOADING),
        FetchState::Error { message } => {
            format!(r#"<div class="error">{}</div>"#, escape_html(message))
        }
        FetchState::NoTarget => format!(r#"<div class="notice">{}</div>"#, DETAIL_NO_TARGET),
        FetchState::Ready { value } => {
            let title = escape_html(value.title);
            let favorite_class = if value.favorite { "favorite active" } else { "favorite" };

            [
                format!("<h1>{}</h1>", title),
                format!(r#"<p class="summary">{}</p>"#, escape_html(&summary_line(value))),
                format!(r#"<img src="{}" alt="{}">"#, escape_html(value.image), title),
                format!("<p>{}</p>", escape_html(value.description)),
                format!(
                    r#"<button class="{}" aria-pressed="{}">Favorite</button>"#,
                    favorite_class, value.favorite
                ),
            ]
            .join("\n")
        }
    }
}

pub(super) fn notice(text: &str) -> String {
    format!(r#"<div class="notice">{}</div>"#, escape_html(text))
}
