use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::config::ScrapingConfig;
use crate::models::Result;

/// Fetch seam between the crawl loop and the network. The crawler only ever
/// sees page bodies, so tests can drive it with canned pages.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Thin wrapper around one `reqwest::Client`; the whole run shares it and
/// drives one navigation at a time.
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(config: &ScrapingConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;
        Ok(Self { client })
    }

    async fn fetch_once(&self, url: &str) -> Result<String> {
        debug!("Fetching: {}", url);
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(format!("HTTP error: {}", response.status()).into());
        }
        let html = response.text().await?;
        debug!("Fetched {} bytes from {}", html.len(), url);
        Ok(html)
    }
}

#[async_trait]
impl Fetch for PageFetcher {
    /// Transient failures get exactly one retry before the error is handed
    /// back to the caller to skip the unit of work.
    async fn fetch(&self, url: &str) -> Result<String> {
        match self.fetch_once(url).await {
            Ok(html) => Ok(html),
            Err(e) => {
                warn!("Retrying {} after error: {}", url, e);
                tokio::time::sleep(Duration::from_millis(1500)).await;
                self.fetch_once(url).await
            }
        }
    }
}

/// Resolve an href against the page it appeared on. Absolute hrefs pass
/// through, relative ones are joined onto the base.
pub fn resolve_url(href: &str, base_url: &str) -> Option<String> {
    match Url::parse(href) {
        Ok(url) => Some(url.to_string()),
        Err(_) => Url::parse(base_url)
            .ok()
            .and_then(|base| base.join(href).ok())
            .map(|u| u.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_relative_href() {
        let out = resolve_url(
            "/business-broker/jane-doe/acme/BW123",
            "https://www.bizquest.com/new-york-business-brokers/",
        );
        assert_eq!(
            out.as_deref(),
            Some("https://www.bizquest.com/business-broker/jane-doe/acme/BW123")
        );
    }

    #[test]
    fn passes_absolute_href_through() {
        let out = resolve_url("https://example.com/a", "https://other.com/");
        assert_eq!(out.as_deref(), Some("https://example.com/a"));
    }

    #[test]
    fn garbage_base_and_relative_href_is_none() {
        assert_eq!(resolve_url("profile.aspx", "not a url"), None);
    }
}
