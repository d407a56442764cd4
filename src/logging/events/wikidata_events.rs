use serde::{Deserialize, Serialize};
use valuable::Valuable;

use crate::{log_event, logging::LogEvent, Status};

#[derive(Serialize, Deserialize, Valuable, Clone, Debug)]
pub enum WikidataEvent {
    Query(QueryRequest),
    GetEntity(EditRequest),
    AddClaim(EditRequest),
    AddQualifier(EditRequest),
}

impl WikidataEvent {
    pub fn query(response: &Result<Vec<String>, Status>) {
        log_event!(LogEvent::Wikidata(WikidataEvent::Query(QueryRequest {
            items: match response {
                Ok(items) => items.len(),
                Err(_) => 0,
            },
            error: response.as_ref().err().map(|status| status.to_string()),
        })))
    }

    pub fn get_entity<T>(entity_id: &str, response: &Result<T, Status>) {
        log_event!(LogEvent::Wikidata(WikidataEvent::GetEntity(
            EditRequest::new(entity_id, "", response)
        )))
    }

    pub fn add_claim<T>(entity_id: &str, property: &str, response: &Result<T, Status>) {
        log_event!(LogEvent::Wikidata(WikidataEvent::AddClaim(
            EditRequest::new(entity_id, property, response)
        )))
    }

    pub fn add_qualifier<T>(entity_id: &str, property: &str, response: &Result<T, Status>) {
        log_event!(LogEvent::Wikidata(WikidataEvent::AddQualifier(
            EditRequest::new(entity_id, property, response)
        )))
    }
}

#[derive(Serialize, Deserialize, Valuable, Clone, Debug)]
pub struct QueryRequest {
    items: usize,
    error: Option<String>,
}

#[derive(Serialize, Deserialize, Valuable, Clone, Debug)]
pub struct EditRequest {
    entity_id: String,
    property: String,
    error: Option<String>,
}

impl EditRequest {
    fn new<T>(entity_id: &str, property: &str, response: &Result<T, Status>) -> Self {
        EditRequest {
            entity_id: entity_id.to_owned(),
            property: property.to_owned(),
            error: response.as_ref().err().map(|status| status.to_string()),
        }
    }
}
