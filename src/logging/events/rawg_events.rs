use serde::{Deserialize, Serialize};
use valuable::Valuable;

use crate::{documents::StoreLink, log_event, logging::LogEvent, Status};

#[derive(Serialize, Deserialize, Valuable, Clone, Debug)]
pub enum RawgEvent {
    Search(SearchRequest),
    Stores(StoresRequest),
}

impl RawgEvent {
    pub fn search(query: &str, store_key: u64, response: &Result<Vec<String>, Status>) {
        log_event!(LogEvent::Rawg(RawgEvent::Search(SearchRequest {
            query: query.to_owned(),
            store_key,
            result: match response {
                Ok(candidates) => Response::Success(candidates.len()),
                Err(status) => Response::Error(status.to_string()),
            },
        })))
    }

    pub fn stores(candidate_id: &str, response: &Result<Vec<StoreLink>, Status>) {
        log_event!(LogEvent::Rawg(RawgEvent::Stores(StoresRequest {
            candidate_id: candidate_id.to_owned(),
            result: match response {
                Ok(links) => Response::Success(links.len()),
                Err(status) => Response::Error(status.to_string()),
            },
        })))
    }
}

#[derive(Serialize, Deserialize, Valuable, Clone, Debug)]
pub struct SearchRequest {
    query: String,
    store_key: u64,
    result: Response,
}

#[derive(Serialize, Deserialize, Valuable, Clone, Debug)]
pub struct StoresRequest {
    candidate_id: String,
    result: Response,
}

#[derive(Serialize, Deserialize, Valuable, Clone, Debug)]
enum Response {
    Success(usize),
    Error(String),
}
