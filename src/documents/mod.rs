mod entity;
mod store_link;

pub use entity::*;
pub use store_link::*;
