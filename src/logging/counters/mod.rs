mod counters;
mod platform_counters;
mod seek_counters;

pub use counters::{counter, entity_description, error_counter};
pub use platform_counters::PlatformCounters;
pub use seek_counters::SeekCounters;
