use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::documents::{Claim, ClaimValue, Entity};

#[derive(Serialize, Deserialize, Default, Debug)]
pub struct SparqlResponse {
    pub results: SparqlResults,
}

#[derive(Serialize, Deserialize, Default, Debug)]
pub struct SparqlResults {
    #[serde(default)]
    pub bindings: Vec<HashMap<String, SparqlBinding>>,
}

#[derive(Serialize, Deserialize, Default, Debug)]
pub struct SparqlBinding {
    pub value: String,
}

impl SparqlResponse {
    /// Returns the item ids bound to `?item`, in result order.
    pub fn item_ids(self) -> Vec<String> {
        self.results
            .bindings
            .into_iter()
            .filter_map(|mut binding| binding.remove("item"))
            .filter_map(|binding| {
                binding
                    .value
                    .rsplit('/')
                    .next()
                    .filter(|id| !id.is_empty())
                    .map(|id| id.to_owned())
            })
            .collect()
    }
}

#[derive(Serialize, Deserialize, Default, Debug)]
pub struct WbEntitiesResponse {
    #[serde(default)]
    pub entities: HashMap<String, WbEntity>,

    #[serde(default)]
    pub error: Option<WbError>,
}

#[derive(Serialize, Deserialize, Default, Debug)]
pub struct WbEntity {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub claims: HashMap<String, Vec<WbStatement>>,

    #[serde(default)]
    pub missing: Option<String>,
}

#[derive(Serialize, Deserialize, Default, Debug)]
pub struct WbStatement {
    #[serde(default)]
    pub id: String,
    pub mainsnak: WbSnak,

    #[serde(default)]
    pub qualifiers: HashMap<String, Vec<WbSnak>>,
}

#[derive(Serialize, Deserialize, Default, Debug)]
pub struct WbSnak {
    pub snaktype: String,
    pub property: String,

    #[serde(default)]
    pub datavalue: Option<WbDataValue>,
}

#[derive(Serialize, Deserialize, Default, Debug)]
pub struct WbDataValue {
    pub value: serde_json::Value,

    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Serialize, Deserialize, Default, Debug)]
pub struct WbError {
    #[serde(default)]
    pub code: String,

    #[serde(default)]
    pub info: String,
}

#[derive(Serialize, Deserialize, Default, Debug)]
pub struct WbEditResponse {
    #[serde(default)]
    pub success: Option<u64>,

    #[serde(default)]
    pub claim: Option<WbStatement>,

    #[serde(default)]
    pub error: Option<WbError>,
}

#[derive(Serialize, Deserialize, Default, Debug)]
pub struct WbTokensResponse {
    pub query: WbTokensQuery,
}

#[derive(Serialize, Deserialize, Default, Debug)]
pub struct WbTokensQuery {
    pub tokens: WbTokens,
}

#[derive(Serialize, Deserialize, Default, Debug)]
pub struct WbTokens {
    pub csrftoken: String,
}

impl From<WbSnak> for ClaimValue {
    fn from(snak: WbSnak) -> Self {
        match (snak.snaktype.as_str(), snak.datavalue) {
            ("value", Some(datavalue)) => match (datavalue.kind.as_str(), datavalue.value) {
                ("string", serde_json::Value::String(value)) => ClaimValue::String(value),
                ("wikibase-entityid", value) => match value.get("id").and_then(|id| id.as_str()) {
                    Some(id) => ClaimValue::Item(id.to_owned()),
                    None => ClaimValue::Other(value.to_string()),
                },
                (_, value) => ClaimValue::Other(value.to_string()),
            },
            _ => ClaimValue::NoValue,
        }
    }
}

impl From<WbStatement> for Claim {
    fn from(statement: WbStatement) -> Self {
        Claim {
            id: statement.id,
            property: statement.mainsnak.property.clone(),
            value: ClaimValue::from(statement.mainsnak),
            qualifiers: statement
                .qualifiers
                .into_iter()
                .map(|(property, snaks)| {
                    (
                        property,
                        snaks.into_iter().map(ClaimValue::from).collect(),
                    )
                })
                .collect(),
        }
    }
}

impl From<WbEntity> for Entity {
    fn from(entity: WbEntity) -> Self {
        Entity {
            id: entity.id,
            claims: entity
                .claims
                .into_iter()
                .map(|(property, statements)| {
                    (
                        property,
                        statements.into_iter().map(Claim::from).collect(),
                    )
                })
                .collect(),
        }
    }
}
