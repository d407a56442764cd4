use async_trait::async_trait;
use reqwest::header;
use serde::de::DeserializeOwned;
use serde_json::json;
use tokio::sync::OnceCell;
use tracing::{error, info, instrument};

use crate::{
    documents::{Claim, ClaimValue, Entity},
    logging::WikidataEvent,
    traits::KnowledgeBase,
    Status,
};

use super::{SparqlResponse, WbEditResponse, WbEntitiesResponse, WbTokensResponse};

/// Wikidata client over the Action API and the query service.
///
/// Edits are authorized with a pre-issued bearer token. Without a token the
/// client runs in dry-run mode: edits are applied to the in-memory entity and
/// logged, but never sent.
pub struct WikidataApi {
    client: reqwest::Client,
    token: Option<String>,
    csrf_token: OnceCell<String>,
}

impl WikidataApi {
    pub fn new(token: Option<String>) -> Result<WikidataApi, Status> {
        let client = reqwest::Client::builder()
            .default_headers(default_headers())
            .build()?;

        Ok(WikidataApi {
            client,
            token,
            csrf_token: OnceCell::new(),
        })
    }

    pub fn dry_run(&self) -> bool {
        self.token.is_none()
    }

    async fn csrf_token(&self) -> Result<&str, Status> {
        let token = self
            .csrf_token
            .get_or_try_init(|| async {
                let params = [
                    ("action", "query"),
                    ("meta", "tokens"),
                    ("type", "csrf"),
                    ("format", "json"),
                ];
                let resp: WbTokensResponse =
                    parse(self.authorized(self.client.get(API_URL).query(&params))).await?;
                let csrftoken = resp.query.tokens.csrftoken;
                match csrftoken == ANONYMOUS_TOKEN {
                    true => Err(Status::invalid_argument(
                        "Wikidata token was rejected, edits would be anonymous",
                    )),
                    false => Ok::<String, Status>(csrftoken),
                }
            })
            .await?;
        Ok(token)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn edit(&self, params: &[(&str, String)]) -> Result<WbEditResponse, Status> {
        let csrf_token = self.csrf_token().await?.to_owned();
        let mut form = params.to_vec();
        form.extend([
            ("token", csrf_token),
            ("bot", "1".to_owned()),
            ("format", "json".to_owned()),
        ]);

        let resp: WbEditResponse =
            parse(self.authorized(self.client.post(API_URL).form(&form))).await?;
        match resp.error {
            Some(error) => Err(Status::internal(format!(
                "Wikidata edit failed ({}): {}",
                error.code, error.info
            ))),
            None => Ok(resp),
        }
    }
}

#[async_trait]
impl KnowledgeBase for WikidataApi {
    #[instrument(level = "trace", skip(self, sparql))]
    async fn query_items(&self, sparql: &str) -> Result<Vec<String>, Status> {
        let request = self
            .client
            .get(SPARQL_URL)
            .header(header::ACCEPT, "application/sparql-results+json")
            .query(&[("query", sparql), ("format", "json")]);

        let response = parse::<SparqlResponse>(request)
            .await
            .map(|resp| resp.item_ids());
        WikidataEvent::query(&response);
        response
    }

    #[instrument(level = "trace", skip(self))]
    async fn get_entity(&self, id: &str) -> Result<Entity, Status> {
        let params = [
            ("action", "wbgetentities"),
            ("ids", id),
            ("props", "claims"),
            ("format", "json"),
        ];
        let response = match parse::<WbEntitiesResponse>(self.client.get(API_URL).query(&params))
            .await
        {
            Ok(WbEntitiesResponse {
                error: Some(error), ..
            }) => Err(Status::internal(format!(
                "wbgetentities failed for {id} ({}): {}",
                error.code, error.info
            ))),
            Ok(mut resp) => match resp.entities.remove(id) {
                Some(entity) if entity.missing.is_none() => Ok(Entity::from(entity)),
                _ => Err(Status::not_found(format!("Entity {id} was not found"))),
            },
            Err(status) => Err(status),
        };

        WikidataEvent::get_entity(id, &response);
        response
    }

    #[instrument(level = "trace", skip(self, entity, claim), fields(entity_id = %entity.id, property = %claim.property))]
    async fn add_claim(
        &self,
        entity: &mut Entity,
        mut claim: Claim,
        summary: &str,
    ) -> Result<(), Status> {
        if self.dry_run() {
            info!(
                "(dry run) {}: {} = {} [{summary}]",
                entity.id, claim.property, claim.value
            );
            entity.push(claim);
            return Ok(());
        }

        let params = [
            ("action", "wbcreateclaim".to_owned()),
            ("entity", entity.id.clone()),
            ("property", claim.property.clone()),
            ("snaktype", "value".to_owned()),
            ("value", encode_value(&claim.value)?),
            ("summary", summary.to_owned()),
        ];
        let response = self.edit(&params).await;
        WikidataEvent::add_claim(&entity.id, &claim.property, &response);

        if let Some(statement) = response?.claim {
            claim.id = statement.id;
        }
        entity.push(claim);
        Ok(())
    }

    #[instrument(level = "trace", skip(self, claim, value))]
    async fn add_qualifier(
        &self,
        entity_id: &str,
        claim: &mut Claim,
        property: &str,
        value: ClaimValue,
        summary: &str,
    ) -> Result<(), Status> {
        if self.dry_run() {
            info!(
                "(dry run) {entity_id}: {} qualifier {property} = {value} [{summary}]",
                claim.property
            );
        } else {
            if claim.id.is_empty() {
                return Err(Status::invalid_argument(format!(
                    "{entity_id}: cannot qualify an unsaved {} claim",
                    claim.property
                )));
            }

            let params = [
                ("action", "wbsetqualifier".to_owned()),
                ("claim", claim.id.clone()),
                ("property", property.to_owned()),
                ("snaktype", "value".to_owned()),
                ("value", encode_value(&value)?),
                ("summary", summary.to_owned()),
            ];
            let response = self.edit(&params).await;
            WikidataEvent::add_qualifier(entity_id, property, &response);
            response?;
        }

        claim
            .qualifiers
            .entry(property.to_owned())
            .or_default()
            .push(value);
        Ok(())
    }
}

/// Sends `request` and parses the json response.
async fn parse<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T, Status> {
    let resp = request.send().await?;
    let status = resp.status();
    let text = resp.text().await?;
    if !status.is_success() {
        return Err(Status::unavailable(format!("Wikidata returned {status}: {text}")));
    }

    serde_json::from_str::<T>(&text).map_err(|e| {
        let msg = format!("Failed to parse response: {e}\n{text}");
        error!(msg);
        Status::unavailable(msg)
    })
}

/// Encodes a claim value the way the Action API expects it in `value`.
fn encode_value(value: &ClaimValue) -> Result<String, Status> {
    match value {
        ClaimValue::String(value) => Ok(serde_json::to_string(value)?),
        ClaimValue::Item(id) => match id.strip_prefix('Q').and_then(|n| n.parse::<u64>().ok()) {
            Some(numeric_id) => {
                Ok(json!({"entity-type": "item", "numeric-id": numeric_id}).to_string())
            }
            None => Err(Status::invalid_argument(format!("'{id}' is not an item id"))),
        },
        value => Err(Status::invalid_argument(format!(
            "cannot write claim value '{value}'"
        ))),
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

const API_URL: &str = "https://www.wikidata.org/w/api.php";
const SPARQL_URL: &str = "https://query.wikidata.org/sparql";
const USER_AGENT: &str = "storefront_linker/0.1 (Wikidata storefront connecting bot)";
const ANONYMOUS_TOKEN: &str = "+\\";
