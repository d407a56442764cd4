use async_trait::async_trait;
use reqwest::header;
use tracing::instrument;

use crate::{
    documents::StoreLink, logging::RawgEvent, traits::GameDatabase, util::retry::RetryPolicy,
    Status,
};

use super::{backend::get, RawgSearchResponse, RawgStoresResponse};

pub struct RawgApi {
    api_key: String,
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl RawgApi {
    pub fn new(api_key: &str) -> Result<RawgApi, Status> {
        let client = reqwest::Client::builder()
            .default_headers(default_headers())
            .build()?;

        Ok(RawgApi {
            api_key: String::from(api_key),
            client,
            retry: RetryPolicy::once(),
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Returns slugs of games sold on `store_key` that match `query`.
    #[instrument(level = "trace", skip(self))]
    pub async fn search_games(
        &self,
        query: &str,
        store_key: u64,
        max_results: usize,
    ) -> Result<Vec<String>, Status> {
        if query.is_empty() {
            return Err(Status::invalid_argument("search query is empty"));
        }
        if max_results == 0 {
            return Err(Status::invalid_argument("max_results must be at least 1"));
        }

        let params = [
            ("key", self.api_key.clone()),
            ("search", query.to_owned()),
            ("page_size", max_results.to_string()),
            ("page", "1".to_owned()),
            ("stores", store_key.to_string()),
        ];
        let response = self
            .retry
            .run("rawg search", || {
                get::<RawgSearchResponse>(&self.client, GAMES_ENDPOINT, &params)
            })
            .await
            .map(|resp| {
                resp.results
                    .into_iter()
                    .map(|game| game.slug)
                    .collect::<Vec<_>>()
            })
            .map_err(|status| match status {
                Status::Unavailable(msg) => Status::unavailable(format!("search unavailable: {msg}")),
                status => status,
            });

        RawgEvent::search(query, store_key, &response);
        response
    }

    /// Returns the storefront links RAWG has for game `candidate_id`.
    #[instrument(level = "trace", skip(self))]
    pub async fn get_stores(&self, candidate_id: &str) -> Result<Vec<StoreLink>, Status> {
        let endpoint = format!("{GAMES_ENDPOINT}/{candidate_id}/stores");
        let params = [("key", self.api_key.clone())];
        let response = self
            .retry
            .run("rawg stores", || {
                get::<RawgStoresResponse>(&self.client, &endpoint, &params)
            })
            .await
            .map(|resp| resp.results);

        RawgEvent::stores(candidate_id, &response);
        response
    }
}

#[async_trait]
impl GameDatabase for RawgApi {
    async fn search(
        &self,
        query: &str,
        store_key: u64,
        max_results: usize,
    ) -> Result<Vec<String>, Status> {
        self.search_games(query, store_key, max_results).await
    }

    async fn store_links(&self, candidate_id: &str) -> Result<Vec<StoreLink>, Status> {
        self.get_stores(candidate_id).await
    }
}

fn default_headers() -> header::HeaderMap {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::USER_AGENT,
        header::HeaderValue::from_static(USER_AGENT),
    );
    headers
}

const GAMES_ENDPOINT: &str = "games";
const USER_AGENT: &str = "Wikidata connecting bot";
