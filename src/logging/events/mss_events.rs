use serde::{Deserialize, Serialize};
use valuable::Valuable;

use crate::{log_event, logging::LogEvent};

#[derive(Serialize, Deserialize, Valuable, Default, Clone, Debug)]
pub struct MsStoreEvent {
    pub scrape_product_page: Option<ScrapeProductPage>,
}

#[derive(Serialize, Deserialize, Valuable, Default, Clone, Debug)]
pub struct ScrapeProductPage {
    store_id: String,
    truncated: bool,
    platforms: usize,
    error: Option<String>,
}

impl MsStoreEvent {
    pub fn scrape_product_page(
        store_id: &str,
        truncated: bool,
        platforms: usize,
        error: Option<String>,
    ) {
        log_event!(LogEvent::MsStore(MsStoreEvent {
            scrape_product_page: Some(ScrapeProductPage {
                store_id: store_id.to_owned(),
                truncated,
                platforms,
                error,
            }),
        }));
    }
}
