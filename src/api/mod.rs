mod mss;
mod rawg;
mod wikidata;

pub use mss::MsStoreScrape;
pub use rawg::*;
pub use wikidata::*;
