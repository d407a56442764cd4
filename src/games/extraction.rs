use tracing::{info, instrument, warn};

use crate::{
    documents::{ExtractionMap, StoreLink},
    traits::GameDatabase,
    Status,
};

use super::StoreRegistry;

/// Retrieves the storefront links of `candidate_id` and extracts the
/// identifiers they carry.
#[instrument(level = "trace", skip(db))]
pub async fn fetch_and_extract(
    db: &impl GameDatabase,
    candidate_id: &str,
) -> Result<ExtractionMap, Status> {
    let links = db.store_links(candidate_id).await?;
    Ok(extract(candidate_id, &links))
}

/// Maps each link to its store's property and normalized identifier.
///
/// Links from unknown stores and urls that do not have the store's expected
/// shape are skipped. If two links resolve to the same property the later one
/// wins.
pub fn extract(candidate_id: &str, links: &[StoreLink]) -> ExtractionMap {
    let mut result = ExtractionMap::new();
    for link in links {
        let store = match StoreRegistry::lookup_by_key(link.store_id) {
            Ok(store) => store,
            Err(status) => {
                warn!("{candidate_id}: {status}");
                continue;
            }
        };

        match store.extract(&link.url) {
            Some(value) => {
                result.insert(store.property.to_owned(), value);
            }
            None => info!(
                "{} ID of `{candidate_id}` element doesn't match the regex mask: {}",
                store.title, link.url
            ),
        }
    }
    result
}
