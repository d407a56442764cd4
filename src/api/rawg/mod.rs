mod backend;
mod docs;
mod rawg;

pub use docs::*;
pub use rawg::RawgApi;
