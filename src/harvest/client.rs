use anyhow::{Context, Result};
use reqwest::blocking::Client;
use std::collections::HashMap;
use url::Url;

/// Source of HTML pages. The harvester only ever issues GETs.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<String>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("school-atlas/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("Failed to fetch {}", url))?
            .error_for_status()
            .with_context(|| format!("Bad status from {}", url))?;

        response.text().context("Failed to read response")
    }
}

/// Canned pages keyed by URL, for offline runs and tests
#[derive(Debug, Default)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }
}

impl Fetch for StaticFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        self.pages
            .get(url)
            .cloned()
            .with_context(|| format!("Failed to fetch {}: no such page", url))
    }
}

/// Resolve a possibly relative link against the site base
pub fn resolve_link(base: &Url, href: &str) -> Result<String> {
    let resolved = base
        .join(href.trim())
        .with_context(|| format!("Invalid link: {}", href))?;
    Ok(resolved.to_string())
}
