use crate::{documents::Entity, Status};

use super::counters::*;

/// Counters for the search-and-match workflow, one per entity outcome.
pub struct SeekCounters;

impl SeekCounters {
    pub fn no_matching_property(entity: &Entity) {
        counter(
            "seek_no_matching_property",
            &format!("{}: no supported matching property", entity.id),
        )
    }

    pub fn no_match(entity: &Entity, property: &str) {
        counter(
            "seek_no_match",
            &format!("No match: {}", entity_description(entity, property)),
        )
    }

    pub fn ambiguous(entity: &Entity, property: &str, candidates: &[String]) {
        counter(
            "seek_ambiguous",
            &format!(
                "Ambiguous, skipped ({}): {}",
                candidates.join(", "),
                entity_description(entity, property)
            ),
        )
    }

    pub fn conflict(entity: &Entity, property: &str, candidates: &[String]) {
        counter(
            "seek_conflict",
            &format!(
                "Existing id not among candidates ({}): {}",
                candidates.join(", "),
                entity_description(entity, property)
            ),
        )
    }

    pub fn mismatch(entity: &Entity, property: &str, candidate: &str, found: &str) {
        counter(
            "seek_mismatch",
            &format!(
                "Candidate `{candidate}` lists {property} `{found}`: {}",
                entity_description(entity, property)
            ),
        )
    }

    pub fn claim_added(entity: &Entity, property: &str, value: &str) {
        counter(
            "seek_claim_added",
            &format!("{}: {property} set to `{value}`", entity.id),
        )
    }

    pub fn already_has_value(entity: &Entity, property: &str) {
        counter(
            "seek_already_has_value",
            &format!("{}: {property} already has a value", entity.id),
        )
    }

    pub fn search_unavailable(entity: &Entity, property: &str, status: &Status) {
        error_counter(
            "seek_search_unavailable",
            &format!(
                "Search unavailable: {}",
                entity_description(entity, property)
            ),
            status,
        )
    }
}
