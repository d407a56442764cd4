mod docs;
mod wikidata;

pub use docs::*;
pub use wikidata::WikidataApi;
