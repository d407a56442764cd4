use std::time::Duration;

use async_trait::async_trait;
use itertools::Itertools;
use reqwest::{header, ClientBuilder, StatusCode};
use tracing::{instrument, warn};

use crate::{logging::MsStoreEvent, traits::PlatformSource, util::retry::RetryPolicy, Status};

/// Scrapes Microsoft Store product pages for the platforms a product is
/// released on.
pub struct MsStoreScrape {
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl MsStoreScrape {
    pub fn new() -> Result<Self, Status> {
        Self::with_retry(RetryPolicy::new(
            3,
            Duration::from_secs(1),
            Duration::from_secs(3),
        ))
    }

    pub fn with_retry(retry: RetryPolicy) -> Result<Self, Status> {
        let client = ClientBuilder::new()
            .default_headers(default_headers())
            .cookie_store(true)
            .build()?;

        Ok(MsStoreScrape { client, retry })
    }

    /// Returns the product page of `store_id`. A missing product yields an
    /// empty page.
    #[instrument(level = "trace", skip(self))]
    pub async fn fetch_page(&self, store_id: &str) -> Result<ProductPage, Status> {
        let url = format!("{MSS_PRODUCT_URL}/{store_id}");
        self.retry
            .run(&format!("{store_id}: product page"), || self.fetch_once(&url))
            .await
    }

    async fn fetch_once(&self, url: &str) -> Result<ProductPage, Status> {
        let mut resp = self.client.get(url).send().await?;
        match resp.status() {
            StatusCode::NOT_FOUND => return Ok(ProductPage::default()),
            status if !status.is_success() => {
                return Err(Status::unavailable(format!("{url} returned {status}")))
            }
            _ => {}
        }

        let mut body = vec![];
        let mut truncated = false;
        loop {
            match resp.chunk().await {
                Ok(Some(chunk)) => body.extend_from_slice(&chunk),
                Ok(None) => break,
                Err(e) if body.is_empty() => return Err(e.into()),
                Err(e) => {
                    warn!("{url}: partial read: {e}");
                    truncated = true;
                    break;
                }
            }
        }

        Ok(ProductPage {
            html: String::from_utf8_lossy(&body).into_owned(),
            truncated,
        })
    }

    /// Returns platform labels that immediately follow an icon in the page.
    pub fn extract_platforms(html: &str) -> Vec<String> {
        lazy_static! {
            static ref RE: Regex =
                Regex::new(r"<svg .*?</svg>(?P<platform>PC|Xbox One|Xbox Series X\|S)").unwrap();
        }
        RE.captures_iter(html)
            .filter_map(|cap| {
                cap.name("platform")
                    .map(|platform| platform.as_str().to_owned())
            })
            .unique()
            .collect()
    }
}

#[async_trait]
impl PlatformSource for MsStoreScrape {
    async fn platforms(&self, store_id: &str) -> Result<Vec<String>, Status> {
        match self.fetch_page(store_id).await {
            Ok(page) => {
                let platforms = MsStoreScrape::extract_platforms(&page.html);
                MsStoreEvent::scrape_product_page(store_id, page.truncated, platforms.len(), None);
                Ok(platforms)
            }
            Err(status) => {
                MsStoreEvent::scrape_product_page(store_id, false, 0, Some(status.to_string()));
                Err(status)
            }
        }
    }
}

#[derive(Default, Clone, Debug)]
pub struct ProductPage {
    pub html: String,

    /// The connection dropped before the whole body was read.
    pub truncated: bool,
}

fn default_headers() -> header::HeaderMap {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::USER_AGENT,
        header::HeaderValue::from_static(USER_AGENT),
    );
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        ),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        header::HeaderValue::from_static("en-US,en;q=0.8"),
    );
    headers
}

use lazy_static::lazy_static;
use regex::Regex;

const MSS_PRODUCT_URL: &str = "https://www.microsoft.com/en-us/p/-";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.11 (KHTML, like Gecko) Chrome/23.0.1271.64 Safari/537.11";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_platforms_after_icons() {
        let html = concat!(
            r#"<div><svg class="icon"><path d="M0"/></svg>PC</div>"#,
            r#"<div><svg class="icon"><path d="M1"/></svg>Xbox One</div>"#,
            r#"<div><svg class="icon"><path d="M2"/></svg>Xbox Series X|S</div>"#,
        );

        assert_eq!(
            MsStoreScrape::extract_platforms(html),
            vec!["PC", "Xbox One", "Xbox Series X|S"]
        );
    }

    #[test]
    fn extract_platforms_ignores_unmarked_labels() {
        let html = r#"<p>Available on PC and Xbox One</p><svg class="x"></svg>HoloLens"#;
        assert!(MsStoreScrape::extract_platforms(html).is_empty());
    }

    #[test]
    fn extract_platforms_collapses_duplicates() {
        let html = concat!(
            r#"<svg a></svg>PC<span>"#,
            r#"<svg b></svg>PC</span>"#,
        );
        assert_eq!(MsStoreScrape::extract_platforms(html), vec!["PC"]);
    }

    #[test]
    fn extract_platforms_from_empty_page() {
        assert!(MsStoreScrape::extract_platforms("").is_empty());
    }
}
