//! In-memory stand-ins for the external services.

use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;

use crate::{
    documents::{Claim, ClaimValue, Entity, StoreLink},
    traits::{GameDatabase, KnowledgeBase, PlatformSource},
    Status,
};

#[derive(Default)]
pub(crate) struct FakeKnowledgeBase {
    items: Vec<String>,
    entities: HashMap<String, Entity>,
    writes: Mutex<Vec<(String, String, ClaimValue)>>,
    summaries: Mutex<Vec<String>>,
}

impl FakeKnowledgeBase {
    pub fn with_items(mut self, items: &[&str]) -> Self {
        self.items = items.iter().map(|item| item.to_string()).collect();
        self
    }

    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.entities.insert(entity.id.clone(), entity);
        self
    }

    /// Edits sent so far as (entity id, property, value).
    pub fn writes(&self) -> Vec<(String, String, ClaimValue)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn summaries(&self) -> Vec<String> {
        self.summaries.lock().unwrap().clone()
    }

    fn record(&self, entity_id: &str, property: &str, value: &ClaimValue, summary: &str) {
        self.writes.lock().unwrap().push((
            entity_id.to_owned(),
            property.to_owned(),
            value.clone(),
        ));
        self.summaries.lock().unwrap().push(summary.to_owned());
    }
}

#[async_trait]
impl KnowledgeBase for FakeKnowledgeBase {
    async fn query_items(&self, _sparql: &str) -> Result<Vec<String>, Status> {
        Ok(self.items.clone())
    }

    async fn get_entity(&self, id: &str) -> Result<Entity, Status> {
        match self.entities.get(id) {
            Some(entity) => Ok(entity.clone()),
            None => Err(Status::not_found(format!("Entity {id} was not found"))),
        }
    }

    async fn add_claim(
        &self,
        entity: &mut Entity,
        claim: Claim,
        summary: &str,
    ) -> Result<(), Status> {
        self.record(&entity.id, &claim.property, &claim.value, summary);
        entity.push(claim);
        Ok(())
    }

    async fn add_qualifier(
        &self,
        entity_id: &str,
        claim: &mut Claim,
        property: &str,
        value: ClaimValue,
        summary: &str,
    ) -> Result<(), Status> {
        self.record(entity_id, property, &value, summary);
        claim
            .qualifiers
            .entry(property.to_owned())
            .or_default()
            .push(value);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeGameDatabase {
    search_results: HashMap<String, Result<Vec<String>, Status>>,
    links: HashMap<String, Result<Vec<StoreLink>, Status>>,
    searches: Mutex<Vec<(String, u64, usize)>>,
    fetched: Mutex<Vec<String>>,
}

impl FakeGameDatabase {
    pub fn with_search(mut self, query: &str, candidates: Vec<&str>) -> Self {
        self.search_results.insert(
            query.to_owned(),
            Ok(candidates.into_iter().map(|c| c.to_owned()).collect()),
        );
        self
    }

    pub fn with_search_error(mut self, query: &str, status: Status) -> Self {
        self.search_results.insert(query.to_owned(), Err(status));
        self
    }

    pub fn with_links(mut self, candidate_id: &str, links: Vec<StoreLink>) -> Self {
        self.links.insert(candidate_id.to_owned(), Ok(links));
        self
    }

    pub fn with_links_error(mut self, candidate_id: &str, status: Status) -> Self {
        self.links.insert(candidate_id.to_owned(), Err(status));
        self
    }

    /// Searches issued so far as (query, store key, max results).
    pub fn searches(&self) -> Vec<(String, u64, usize)> {
        self.searches.lock().unwrap().clone()
    }

    /// Candidates whose store links were requested.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl GameDatabase for FakeGameDatabase {
    async fn search(
        &self,
        query: &str,
        store_key: u64,
        max_results: usize,
    ) -> Result<Vec<String>, Status> {
        self.searches
            .lock()
            .unwrap()
            .push((query.to_owned(), store_key, max_results));
        match self.search_results.get(query) {
            Some(Ok(candidates)) => Ok(candidates.iter().take(max_results).cloned().collect()),
            Some(Err(status)) => Err(status.clone()),
            None => Ok(vec![]),
        }
    }

    async fn store_links(&self, candidate_id: &str) -> Result<Vec<StoreLink>, Status> {
        self.fetched.lock().unwrap().push(candidate_id.to_owned());
        match self.links.get(candidate_id) {
            Some(links) => links.clone(),
            None => Ok(vec![]),
        }
    }
}

#[derive(Default)]
pub(crate) struct FakePlatformSource {
    platforms: HashMap<String, Result<Vec<String>, Status>>,
    requested: Mutex<Vec<String>>,
}

impl FakePlatformSource {
    pub fn with_platforms(mut self, store_id: &str, platforms: &[&str]) -> Self {
        self.platforms.insert(
            store_id.to_owned(),
            Ok(platforms.iter().map(|p| p.to_string()).collect()),
        );
        self
    }

    pub fn with_error(mut self, store_id: &str, status: Status) -> Self {
        self.platforms.insert(store_id.to_owned(), Err(status));
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlatformSource for FakePlatformSource {
    async fn platforms(&self, store_id: &str) -> Result<Vec<String>, Status> {
        self.requested.lock().unwrap().push(store_id.to_owned());
        match self.platforms.get(store_id) {
            Some(platforms) => platforms.clone(),
            None => Ok(vec![]),
        }
    }
}
