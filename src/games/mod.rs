mod extraction;
mod platforms;
mod reconciler;
mod runner;
mod stores;

pub use extraction::{extract, fetch_and_extract};
pub use platforms::{PlatformOutcome, PlatformQualifier, PLATFORM_PROPERTY, STORE_PROPERTY};
pub use reconciler::{Reconciler, SeekOutcome, SeekerConfig};
pub use runner::{run, select_items, EntityProcessor, RunSummary};
pub use stores::{StoreDefinition, StoreRegistry};
