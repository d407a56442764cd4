use crate::Status;

use super::counters::*;

pub struct PlatformCounters;

impl PlatformCounters {
    pub fn already_set(store_id: &str) {
        counter(
            "platform_already_set",
            &format!("{store_id}: already has a qualifier"),
        )
    }

    pub fn not_found(store_id: &str) {
        counter(
            "platform_not_found",
            &format!("{store_id}: can't get platforms"),
        )
    }

    pub fn qualifier_added(store_id: &str, platform: &str) {
        counter(
            "platform_qualifier_added",
            &format!("{store_id}: platform set to {platform}"),
        )
    }

    pub fn fetch_fail(store_id: &str, status: &Status) {
        error_counter(
            "platform_fetch_fail",
            &format!("{store_id}: store page fetch failed"),
            status,
        )
    }
}
