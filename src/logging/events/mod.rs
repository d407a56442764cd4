mod mss_events;
mod rawg_events;
mod wikidata_events;

pub use mss_events::*;
pub use rawg_events::*;
pub use wikidata_events::*;
