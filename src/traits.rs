use async_trait::async_trait;

use crate::{
    documents::{Claim, ClaimValue, Entity, StoreLink},
    Status,
};

/// Read and append access to the knowledge base being enriched.
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    /// Returns the item ids bound to `?item` by a SPARQL query.
    async fn query_items(&self, sparql: &str) -> Result<Vec<String>, Status>;

    async fn get_entity(&self, id: &str) -> Result<Entity, Status>;

    /// Creates `claim` on the entity and appends it to `entity` on success.
    async fn add_claim(&self, entity: &mut Entity, claim: Claim, summary: &str)
        -> Result<(), Status>;

    /// Adds a qualifier to an existing `claim` of entity `entity_id`.
    async fn add_qualifier(
        &self,
        entity_id: &str,
        claim: &mut Claim,
        property: &str,
        value: ClaimValue,
        summary: &str,
    ) -> Result<(), Status>;
}

/// External game database that links a game to its storefront pages.
#[async_trait]
pub trait GameDatabase: Send + Sync {
    /// Returns candidate ids matching `query` among games sold on `store_key`,
    /// in relevance order.
    async fn search(
        &self,
        query: &str,
        store_key: u64,
        max_results: usize,
    ) -> Result<Vec<String>, Status>;

    async fn store_links(&self, candidate_id: &str) -> Result<Vec<StoreLink>, Status>;
}

/// Source of the platforms a Microsoft Store product is released on.
#[async_trait]
pub trait PlatformSource: Send + Sync {
    async fn platforms(&self, store_id: &str) -> Result<Vec<String>, Status>;
}
