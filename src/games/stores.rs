use std::collections::HashMap;

use lazy_static::lazy_static;
use phf::phf_map;
use regex::Regex;

use crate::Status;

/// A storefront known to the game database and the Wikidata property that
/// holds its identifiers.
#[derive(Debug)]
pub struct StoreDefinition {
    pub store_key: u64,
    pub title: &'static str,
    pub property: &'static str,
    pattern: &'static str,
    normalize: Option<fn(&str) -> String>,
}

impl StoreDefinition {
    /// Returns the normalized identifier captured from a store `url`.
    pub fn extract(&self, url: &str) -> Option<String> {
        let re = PATTERNS.get(&self.store_key)?;
        re.captures(url)
            .and_then(|cap| cap.get(1))
            .map(|id| self.normalize(id.as_str()))
    }

    pub fn normalize(&self, value: &str) -> String {
        match self.normalize {
            Some(normalize) => normalize(value),
            None => value.to_owned(),
        }
    }
}

pub struct StoreRegistry;

impl StoreRegistry {
    pub fn lookup_by_key(store_key: u64) -> Result<&'static StoreDefinition, Status> {
        STORES
            .get(&store_key)
            .ok_or_else(|| Status::not_found(format!("no data for store {store_key} set")))
    }

    pub fn lookup_by_property(property: &str) -> Result<u64, Status> {
        REVERSE_MATCHING.get(property).copied().ok_or_else(|| {
            Status::invalid_argument(format!("property {property} is not a supported store"))
        })
    }

    /// Properties of all registered stores ordered by store key.
    pub fn properties() -> Vec<&'static str> {
        let mut stores: Vec<_> = STORES.values().collect();
        stores.sort_by_key(|store| store.store_key);
        stores.into_iter().map(|store| store.property).collect()
    }
}

fn lowercase(value: &str) -> String {
    value.to_lowercase()
}

static STORES: phf::Map<u64, StoreDefinition> = phf_map! {
    1u64 => StoreDefinition {
        store_key: 1,
        title: "Steam",
        property: "P1733",
        pattern: r"^https?://(?:store\.)?steam(?:community|powered)\.com/app/(\d+)",
        normalize: None,
    },
    2u64 => StoreDefinition {
        store_key: 2,
        title: "Microsoft Store",
        property: "P5885",
        pattern: r"^https?://www\.microsoft\.com/(?:[-a-z]+/)?(?:store/)?p/(?:[^/]+/)?([a-zA-Z0-9]{12})(?:[/?#]|$)",
        normalize: Some(lowercase),
    },
    3u64 => StoreDefinition {
        store_key: 3,
        title: "PlayStation Store",
        property: "P5944",
        pattern: r"^https?://store\.playstation\.com/[-a-z]+/product/(UP\d{4}-[A-Z]{4}\d{5}_00-[\dA-Z_]{16})",
        normalize: None,
    },
    4u64 => StoreDefinition {
        store_key: 4,
        title: "App Store",
        property: "P3861",
        pattern: r"^https?://(?:apps|itunes)\.apple\.com/(?:[^/]+/)?app/(?:[^/]+/)?id([1-9][0-9]*)",
        normalize: None,
    },
    5u64 => StoreDefinition {
        store_key: 5,
        title: "GOG",
        property: "P2725",
        pattern: r"^https?://www\.gog\.com/(?:\w{2}/)?((?:movie/|game/)[a-z0-9_]+)",
        normalize: None,
    },
    6u64 => StoreDefinition {
        store_key: 6,
        title: "Nintendo eShop",
        property: "P8084",
        pattern: r"^https?://www\.nintendo\.com/(?:store/products|games/detail)/([-a-z0-9]+-(?:switch|wii-u|3ds))",
        normalize: None,
    },
    7u64 => StoreDefinition {
        store_key: 7,
        title: "Xbox 360 Store",
        property: "P11789",
        pattern: r"^https://marketplace\.xbox\.com/(?:en-US/)?Product/(?:[^/]+/)?([0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12})",
        normalize: Some(lowercase),
    },
    8u64 => StoreDefinition {
        store_key: 8,
        title: "Google Play",
        property: "P3418",
        pattern: r"^https?://play\.google\.com/store/apps/details\?(?:hl=.+&)?id=([a-zA-Z0-9_]+(?:\.[a-zA-Z0-9_]+)+)",
        normalize: None,
    },
    9u64 => StoreDefinition {
        store_key: 9,
        title: "itch.io",
        property: "P7294",
        pattern: r"^(https?://[a-zA-Z0-9_-]+\.itch\.io/[a-zA-Z0-9_-]+)",
        normalize: None,
    },
    11u64 => StoreDefinition {
        store_key: 11,
        title: "Epic Games Store",
        property: "P6278",
        pattern: r"^https?://(?:www\.)?(?:store\.)?epicgames\.com/(?:store/)?(?:(?:ar|de|en-US|es-ES|es-MX|fr|it|ja|ko|pl|pt-BR|ru|th|tr|zh-CN|zh-Hant)/)?p(?:roduct)?/([a-z\d]+(?:-{0,3}_?[^\sA-Z\W_]+)*)",
        normalize: None,
    },
};

lazy_static! {
    static ref PATTERNS: HashMap<u64, Regex> = STORES
        .entries()
        .map(|(key, store)| (*key, Regex::new(store.pattern).unwrap()))
        .collect();
    static ref REVERSE_MATCHING: HashMap<&'static str, u64> = STORES
        .entries()
        .map(|(key, store)| (store.property, *key))
        .collect();
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn every_pattern_has_exactly_one_capture_group() {
        for store in STORES.values() {
            let re = Regex::new(store.pattern).unwrap();
            assert_eq!(re.captures_len(), 2, "store {}", store.title);
        }
    }

    #[test]
    fn keys_and_properties_are_unique() {
        let keys: HashSet<_> = STORES.values().map(|store| store.store_key).collect();
        let properties: HashSet<_> = STORES.values().map(|store| store.property).collect();
        assert_eq!(keys.len(), STORES.len());
        assert_eq!(properties.len(), STORES.len());

        for (key, store) in STORES.entries() {
            assert_eq!(*key, store.store_key);
        }
    }

    #[test]
    fn normalize_is_idempotent() {
        let samples = [
            (1, "220"),
            (2, "9NBLGGH4R6D3"),
            (5, "game/the_witcher"),
            (7, "66ACD000-77FE-1000-9115-D802584111F7"),
            (9, "https://ztahl.itch.io/sir-riggsby"),
        ];
        for (key, value) in samples {
            let store = StoreRegistry::lookup_by_key(key).unwrap();
            let once = store.normalize(value);
            assert_eq!(store.normalize(&once), once, "store {}", store.title);
        }
    }

    #[test]
    fn lookup_by_key_unknown_store() {
        assert!(matches!(
            StoreRegistry::lookup_by_key(10),
            Err(Status::NotFound(_))
        ));
    }

    #[test]
    fn lookup_by_property() {
        assert_eq!(StoreRegistry::lookup_by_property("P1733"), Ok(1));
        assert_eq!(StoreRegistry::lookup_by_property("P6278"), Ok(11));
        assert!(matches!(
            StoreRegistry::lookup_by_property("P9968"),
            Err(Status::InvalidArgument(_))
        ));
    }

    #[test]
    fn properties_ordered_by_store_key() {
        let properties = StoreRegistry::properties();
        assert_eq!(properties.len(), 10);
        assert_eq!(properties.first(), Some(&"P1733"));
        assert_eq!(properties.last(), Some(&"P6278"));
    }

    fn extract(key: u64, url: &str) -> Option<String> {
        StoreRegistry::lookup_by_key(key).unwrap().extract(url)
    }

    #[test]
    fn extract_steam() {
        assert_eq!(
            extract(1, "https://store.steampowered.com/app/550/Left_4_Dead_2/"),
            Some("550".to_owned())
        );
        assert_eq!(extract(1, "https://store.steampowered.com/sub/550"), None);
    }

    #[test]
    fn extract_microsoft_store_lowercases() {
        assert_eq!(
            extract(2, "https://www.microsoft.com/en-us/p/abc123xyz789"),
            Some("abc123xyz789".to_owned())
        );
        assert_eq!(
            extract(
                2,
                "https://www.microsoft.com/en-us/store/p/halo-5-guardians/9NBLGGH4R6D3"
            ),
            Some("9nblggh4r6d3".to_owned())
        );
        assert_eq!(
            extract(2, "https://www.microsoft.com/en-us/p/some-long-game-title"),
            None
        );
    }

    #[test]
    fn extract_gog_keeps_prefix() {
        assert_eq!(
            extract(5, "https://www.gog.com/en/game/the_witcher_3_wild_hunt"),
            Some("game/the_witcher_3_wild_hunt".to_owned())
        );
    }

    #[test]
    fn extract_xbox_360() {
        assert_eq!(
            extract(
                7,
                "https://marketplace.xbox.com/en-US/Product/Halo-3/66acd000-77fe-1000-9115-d802584111f7"
            ),
            Some("66acd000-77fe-1000-9115-d802584111f7".to_owned())
        );
    }

    #[test]
    fn extract_google_play() {
        assert_eq!(
            extract(
                8,
                "https://play.google.com/store/apps/details?id=com.rovio.angrybirds"
            ),
            Some("com.rovio.angrybirds".to_owned())
        );
    }

    #[test]
    fn extract_itch_keeps_full_url() {
        assert_eq!(
            extract(9, "https://ztahl.itch.io/sir-riggsby/"),
            Some("https://ztahl.itch.io/sir-riggsby".to_owned())
        );
    }

    #[test]
    fn extract_epic_games_store() {
        assert_eq!(
            extract(11, "https://www.epicgames.com/store/en-US/p/hades"),
            Some("hades".to_owned())
        );
        assert_eq!(
            extract(11, "https://store.epicgames.com/p/death-stranding"),
            Some("death-stranding".to_owned())
        );
    }
}
