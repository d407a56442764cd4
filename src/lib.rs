pub mod api;
pub mod documents;
pub mod games;
pub mod logging;
pub mod traits;
pub mod util;

#[cfg(test)]
mod testing;

mod status;
pub use status::Status;

mod tracing;
pub use crate::tracing::Tracing;
