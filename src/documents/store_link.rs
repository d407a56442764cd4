use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A game's page on one storefront as reported by the game database.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
pub struct StoreLink {
    pub store_id: u64,

    #[serde(default)]
    pub url: String,
}

/// Property id to normalized identifier, built from one candidate's store links.
pub type ExtractionMap = BTreeMap<String, String>;
