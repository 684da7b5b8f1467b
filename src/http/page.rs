//! Protected page rendering.

use std::fs;
use std::io;

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
};

use crate::config::SiteConfig;
use crate::http::server::AppState;

/// The landing page, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Page {
    html: String,
}

impl Page {
    /// Read `site.index_path`, or fall back to the built-in page.
    pub fn load(config: &SiteConfig) -> io::Result<Self> {
        let html = match &config.index_path {
            Some(path) => fs::read_to_string(path)?,
            None => default_page(&config.title),
        };
        Ok(Self { html })
    }

    pub fn from_html(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    pub fn html(&self) -> &str {
        &self.html
    }
}

fn default_page(title: &str) -> String {
    let title = escape(title);
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <meta name=\"robots\" content=\"noindex, nofollow\">\n\
         <title>{title}</title>\n</head>\n<body>\n<main><h1>{title}</h1></main>\n</body>\n</html>\n"
    )
}

fn escape(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            c => c.to_string(),
        })
        .collect()
}

/// `GET /`
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, "no-store")],
        Html(state.page.html().to_string()),
    )
}
