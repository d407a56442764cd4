use serde::{Deserialize, Serialize};

use crate::documents::StoreLink;

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct RawgSearchResponse {
    #[serde(default)]
    pub count: u64,

    #[serde(default)]
    pub results: Vec<RawgGame>,
}

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct RawgGame {
    #[serde(default)]
    pub id: u64,
    pub slug: String,

    #[serde(default)]
    pub name: String,
}

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct RawgStoresResponse {
    #[serde(default)]
    pub results: Vec<StoreLink>,
}
