use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};

/// A Wikidata item together with its statements grouped by property.
#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct Entity {
    pub id: String,

    #[serde(default)]
    pub claims: HashMap<String, Vec<Claim>>,
}

impl Entity {
    pub fn new(id: impl Into<String>) -> Self {
        Entity {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn has_claim(&self, property: &str) -> bool {
        match self.claims.get(property) {
            Some(claims) => !claims.is_empty(),
            None => false,
        }
    }

    pub fn claims(&self, property: &str) -> &[Claim] {
        match self.claims.get(property) {
            Some(claims) => claims,
            None => &[],
        }
    }

    /// Returns the string values of all claims for `property`.
    pub fn values(&self, property: &str) -> Vec<&str> {
        self.claims(property)
            .iter()
            .filter_map(|claim| claim.value.as_str())
            .collect()
    }

    /// Appends `claim` under its property.
    pub fn push(&mut self, claim: Claim) {
        self.claims
            .entry(claim.property.clone())
            .or_default()
            .push(claim);
    }
}

#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
pub struct Claim {
    /// Statement GUID, empty until the claim is written.
    #[serde(default)]
    pub id: String,
    pub property: String,
    pub value: ClaimValue,

    #[serde(default)]
    pub qualifiers: HashMap<String, Vec<ClaimValue>>,
}

impl Claim {
    pub fn new(property: impl Into<String>, value: ClaimValue) -> Self {
        Claim {
            property: property.into(),
            value,
            ..Default::default()
        }
    }

    pub fn has_qualifier(&self, property: &str) -> bool {
        match self.qualifiers.get(property) {
            Some(values) => !values.is_empty(),
            None => false,
        }
    }
}

#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClaimValue {
    /// External identifiers and other plain strings.
    String(String),

    /// Reference to another item, e.g. `Q1406`.
    Item(String),

    /// Datatypes the bots never write, kept as raw json.
    Other(String),

    #[default]
    NoValue,
}

impl ClaimValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ClaimValue::String(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for ClaimValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimValue::String(value) => write!(f, "{value}"),
            ClaimValue::Item(id) => write!(f, "{id}"),
            ClaimValue::Other(json) => write!(f, "{json}"),
            ClaimValue::NoValue => write!(f, "novalue"),
        }
    }
}
