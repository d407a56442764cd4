use std::fmt;

use async_trait::async_trait;
use phf::phf_map;
use tracing::{instrument, warn};

use crate::{
    documents::{ClaimValue, Entity},
    logging::PlatformCounters,
    traits::{KnowledgeBase, PlatformSource},
    Status,
};

use super::runner::EntityProcessor;

/// Adds platform qualifiers to Microsoft Store ID claims.
pub struct PlatformQualifier<'a, K: KnowledgeBase, S: PlatformSource> {
    kb: &'a K,
    source: &'a S,
}

impl<'a, K: KnowledgeBase, S: PlatformSource> PlatformQualifier<'a, K, S> {
    pub fn new(kb: &'a K, source: &'a S) -> Self {
        PlatformQualifier { kb, source }
    }

    /// Selects items with a store id claim that has no platform qualifier.
    pub fn query() -> String {
        format!(
            "SELECT DISTINCT ?item {{\n    ?item p:{STORE_PROPERTY} ?s\n    FILTER NOT EXISTS {{ ?s pq:{PLATFORM_PROPERTY} [] }}\n}}"
        )
    }

    #[instrument(level = "trace", skip(self, entity), fields(entity_id = %entity.id))]
    pub async fn qualify(&self, entity: &mut Entity) -> Result<PlatformOutcome, Status> {
        let mut outcome = PlatformOutcome::default();

        let entity_id = &entity.id;
        let claims = match entity.claims.get_mut(STORE_PROPERTY) {
            Some(claims) => claims,
            None => return Ok(outcome),
        };

        for claim in claims.iter_mut() {
            let store_id = match claim.value.as_str() {
                Some(store_id) => store_id.to_owned(),
                None => continue,
            };
            if claim.has_qualifier(PLATFORM_PROPERTY) {
                PlatformCounters::already_set(&store_id);
                outcome.already_set += 1;
                continue;
            }

            let platforms = match self.source.platforms(&store_id).await {
                Ok(platforms) => platforms,
                Err(status) => {
                    PlatformCounters::fetch_fail(&store_id, &status);
                    outcome.failed += 1;
                    continue;
                }
            };

            let items: Vec<_> = platforms
                .iter()
                .filter_map(|platform| match PLATFORM_ITEMS.get(platform.as_str()) {
                    Some(item) => Some((platform, *item)),
                    None => {
                        warn!("{store_id}: unknown platform '{platform}'");
                        None
                    }
                })
                .collect();
            if items.is_empty() {
                PlatformCounters::not_found(&store_id);
                outcome.not_found += 1;
                continue;
            }

            let summary = format!("Adding qualifier to Microsoft Store ID `{store_id}`");
            for (platform, item) in items {
                self.kb
                    .add_qualifier(
                        entity_id,
                        claim,
                        PLATFORM_PROPERTY,
                        ClaimValue::Item(item.to_owned()),
                        &summary,
                    )
                    .await?;
                PlatformCounters::qualifier_added(&store_id, platform);
                outcome.qualifiers_added += 1;
            }
        }

        Ok(outcome)
    }
}

#[async_trait]
impl<'a, K: KnowledgeBase, S: PlatformSource> EntityProcessor for PlatformQualifier<'a, K, S> {
    type Outcome = PlatformOutcome;

    async fn process(&self, entity: &mut Entity) -> Result<PlatformOutcome, Status> {
        self.qualify(entity).await
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct PlatformOutcome {
    pub qualifiers_added: usize,
    pub already_set: usize,
    pub not_found: usize,
    pub failed: usize,
}

impl fmt::Display for PlatformOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} qualifiers added, {} already set, {} without platforms, {} failed",
            self.qualifiers_added, self.already_set, self.not_found, self.failed
        )
    }
}

pub const STORE_PROPERTY: &str = "P5885";
pub const PLATFORM_PROPERTY: &str = "P400";

static PLATFORM_ITEMS: phf::Map<&'static str, &'static str> = phf_map! {
    "PC" => "Q1406",
    "Xbox One" => "Q13361286",
    "Xbox Series X|S" => "Q98973368",
};
