use tracing::info;

use crate::{documents::Entity, Status};

pub const COUNTERS: &str = "counters";

pub fn counter(name: &str, description: &str) {
    info!(
        labels.log_type = COUNTERS,
        labels.counter = name,
        description
    );
}

pub fn error_counter(name: &str, description: &str, status: &Status) {
    info!(
        labels.log_type = COUNTERS,
        labels.counter_type = "error",
        labels.status = status.to_string(),
        labels.counter = name,
        description
    );
}

pub fn entity_description(entity: &Entity, property: &str) -> String {
    format!(
        "{}, {property}: {}",
        entity.id,
        match entity.values(property).first() {
            Some(value) => value.to_string(),
            None => "none".to_owned(),
        }
    )
}
