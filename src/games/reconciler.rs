use std::fmt;

use async_trait::async_trait;
use itertools::Itertools;
use tracing::{debug, info, instrument};

use crate::{
    documents::{Claim, ClaimValue, Entity, ExtractionMap},
    logging::SeekCounters,
    traits::{GameDatabase, KnowledgeBase},
    Status,
};

use super::{extraction, runner::EntityProcessor, StoreRegistry};

/// Settings of a search-and-match bot.
#[derive(Debug, Clone)]
pub struct SeekerConfig {
    /// Property the bot populates with the game database id.
    pub database_property: String,

    /// Human readable name of the game database used in edit summaries.
    pub database_title: String,

    /// Matching property used when none is configured or when an entity
    /// lacks the configured one.
    pub default_matching_property: String,

    pub matching_property: Option<String>,

    pub max_results: usize,
}

impl SeekerConfig {
    pub fn rawg() -> Self {
        SeekerConfig {
            database_property: "P9968".to_owned(),
            database_title: "RAWG".to_owned(),
            default_matching_property: "P1733".to_owned(),
            matching_property: None,
            max_results: 3,
        }
    }
}

/// Connects entities to a game database through an identifier they already
/// carry, then imports the storefront identifiers the database knows about.
pub struct Reconciler<'a, K: KnowledgeBase, D: GameDatabase> {
    config: SeekerConfig,
    kb: &'a K,
    db: &'a D,
}

impl<'a, K: KnowledgeBase, D: GameDatabase> Reconciler<'a, K, D> {
    /// Fails if a matching property is not backed by a registered store.
    pub fn new(config: SeekerConfig, kb: &'a K, db: &'a D) -> Result<Self, Status> {
        let allowed = StoreRegistry::properties();
        for property in [
            Some(&config.default_matching_property),
            config.matching_property.as_ref(),
        ]
        .into_iter()
        .flatten()
        {
            if !allowed.contains(&property.as_str()) {
                return Err(Status::invalid_argument(format!(
                    "matching property {property} is not supported, expected one of: {}",
                    allowed.join(", ")
                )));
            }
            StoreRegistry::lookup_by_property(property)?;
        }
        if config.max_results == 0 {
            return Err(Status::invalid_argument("max_results must be at least 1"));
        }

        Ok(Reconciler { config, kb, db })
    }

    pub fn configured_matching_property(&self) -> &str {
        match &self.config.matching_property {
            Some(property) => property,
            None => &self.config.default_matching_property,
        }
    }

    /// Selects items that carry the matching property but lack the database
    /// property.
    pub fn query(&self) -> String {
        format!(
            "SELECT DISTINCT ?item {{\n    ?item wdt:{} [] .\n    FILTER NOT EXISTS {{ ?item wdt:{} [] }}\n}}",
            self.configured_matching_property(),
            self.config.database_property
        )
    }

    fn matching_property(&self, entity: &Entity) -> Option<&str> {
        [
            self.configured_matching_property(),
            self.config.default_matching_property.as_str(),
        ]
        .into_iter()
        .find(|property| !entity.values(property).is_empty())
    }

    #[instrument(level = "trace", skip(self, entity), fields(entity_id = %entity.id))]
    pub async fn reconcile(&self, entity: &mut Entity) -> Result<SeekOutcome, Status> {
        let property = match self.matching_property(entity) {
            Some(property) => property.to_owned(),
            None => {
                SeekCounters::no_matching_property(entity);
                return Ok(SeekOutcome::NoMatchingProperty);
            }
        };
        let seed = match entity.values(&property).first() {
            Some(seed) => seed.to_string(),
            None => return Ok(SeekOutcome::NoMatchingProperty),
        };

        let store_key = StoreRegistry::lookup_by_property(&property)?;
        let candidates = match self
            .db
            .search(&seed, store_key, self.config.max_results)
            .await
        {
            Ok(candidates) => candidates,
            Err(status) => {
                SeekCounters::search_unavailable(entity, &property, &status);
                return Err(status);
            }
        };

        let candidate = match disambiguate(
            entity.values(&self.config.database_property).as_slice(),
            &candidates,
        ) {
            Choice::Candidate(candidate) => candidate,
            Choice::NoMatch => {
                SeekCounters::no_match(entity, &property);
                return Ok(SeekOutcome::NoMatch);
            }
            Choice::Ambiguous => {
                SeekCounters::ambiguous(entity, &property, &candidates);
                return Ok(SeekOutcome::Ambiguous(candidates));
            }
            Choice::Conflict => {
                SeekCounters::conflict(entity, &property, &candidates);
                return Ok(SeekOutcome::Conflict(candidates));
            }
        };

        let extraction = extraction::fetch_and_extract(self.db, &candidate).await?;

        let store = StoreRegistry::lookup_by_key(store_key)?;
        if let Some(found) = extraction.get(&property) {
            if *found != store.normalize(&seed) {
                SeekCounters::mismatch(entity, &property, &candidate, found);
                return Ok(SeekOutcome::Mismatch {
                    candidate,
                    found: found.clone(),
                });
            }
        }

        let database_claim_added = self.link(entity, &candidate, &property, &seed).await?;
        let (added, skipped) = self.merge(entity, &candidate, extraction).await?;

        Ok(SeekOutcome::Linked {
            candidate,
            database_claim_added,
            added,
            skipped,
        })
    }

    /// Adds the database id claim unless the entity already has one.
    async fn link(
        &self,
        entity: &mut Entity,
        candidate: &str,
        property: &str,
        seed: &str,
    ) -> Result<bool, Status> {
        let database_property = &self.config.database_property;
        if entity.has_claim(database_property) {
            debug!("{}: {database_property} already set", entity.id);
            return Ok(false);
        }

        self.kb
            .add_claim(
                entity,
                Claim::new(
                    database_property.as_str(),
                    ClaimValue::String(candidate.to_owned()),
                ),
                &format!("Matched by {property} `{seed}`"),
            )
            .await?;
        SeekCounters::claim_added(entity, database_property, candidate);
        Ok(true)
    }

    /// Adds a claim for every extracted property the entity does not have
    /// yet. Existing claims are never changed.
    async fn merge(
        &self,
        entity: &mut Entity,
        candidate: &str,
        extraction: ExtractionMap,
    ) -> Result<(Vec<(String, String)>, Vec<String>), Status> {
        let summary = format!(
            "Imported from {} game ID `{candidate}`",
            self.config.database_title
        );

        let mut added = vec![];
        let mut skipped = vec![];
        for (property, value) in extraction {
            if entity.has_claim(&property) {
                match entity.values(&property).contains(&value.as_str()) {
                    true => debug!("{}: {property} already set to `{value}`", entity.id),
                    false => SeekCounters::already_has_value(entity, &property),
                }
                skipped.push(property);
                continue;
            }

            self.kb
                .add_claim(
                    entity,
                    Claim::new(property.as_str(), ClaimValue::String(value.clone())),
                    &summary,
                )
                .await?;
            SeekCounters::claim_added(entity, &property, &value);
            added.push((property, value));
        }
        Ok((added, skipped))
    }
}

#[async_trait]
impl<'a, K: KnowledgeBase, D: GameDatabase> EntityProcessor for Reconciler<'a, K, D> {
    type Outcome = SeekOutcome;

    async fn process(&self, entity: &mut Entity) -> Result<SeekOutcome, Status> {
        self.reconcile(entity).await
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Choice {
    Candidate(String),
    NoMatch,
    Ambiguous,
    Conflict,
}

/// Picks the single candidate to link. Database ids already on the entity
/// take precedence; otherwise only a lone candidate is accepted.
fn disambiguate(existing: &[&str], candidates: &[String]) -> Choice {
    if candidates.is_empty() {
        return Choice::NoMatch;
    }

    if !existing.is_empty() {
        let named: Vec<_> = candidates
            .iter()
            .filter(|candidate| existing.contains(&candidate.as_str()))
            .collect();
        return match named.as_slice() {
            [candidate] => Choice::Candidate(candidate.to_string()),
            [] => Choice::Conflict,
            _ => Choice::Ambiguous,
        };
    }

    match candidates {
        [candidate] => Choice::Candidate(candidate.clone()),
        _ => Choice::Ambiguous,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SeekOutcome {
    NoMatchingProperty,
    NoMatch,
    Ambiguous(Vec<String>),

    /// The entity's database id is not among the candidates.
    Conflict(Vec<String>),

    /// The candidate lists a different value for the matching property.
    Mismatch {
        candidate: String,
        found: String,
    },

    Linked {
        candidate: String,
        database_claim_added: bool,
        added: Vec<(String, String)>,
        skipped: Vec<String>,
    },
}

impl fmt::Display for SeekOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeekOutcome::NoMatchingProperty => write!(f, "no matching property"),
            SeekOutcome::NoMatch => write!(f, "no match"),
            SeekOutcome::Ambiguous(candidates) => {
                write!(f, "ambiguous, skipped ({})", candidates.join(", "))
            }
            SeekOutcome::Conflict(candidates) => write!(
                f,
                "existing id not among candidates ({})",
                candidates.join(", ")
            ),
            SeekOutcome::Mismatch { candidate, found } => {
                write!(f, "`{candidate}` belongs to another game ({found})")
            }
            SeekOutcome::Linked {
                candidate,
                added,
                skipped,
                ..
            } => write!(
                f,
                "matched `{candidate}`, added [{}], kept existing [{}]",
                added
                    .iter()
                    .map(|(property, value)| format!("{property}={value}"))
                    .join(", "),
                skipped.join(", ")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        documents::StoreLink,
        testing::{FakeGameDatabase, FakeKnowledgeBase},
    };

    fn entity_with(id: &str, claims: &[(&str, &str)]) -> Entity {
        let mut entity = Entity::new(id);
        for (property, value) in claims {
            entity.push(Claim::new(*property, ClaimValue::String(value.to_string())));
        }
        entity
    }

    fn link(store_id: u64, url: &str) -> StoreLink {
        StoreLink {
            store_id,
            url: url.to_owned(),
        }
    }

    fn l4d2_database() -> FakeGameDatabase {
        FakeGameDatabase::default()
            .with_search("220", vec!["left-4-dead-2"])
            .with_links(
                "left-4-dead-2",
                vec![link(2, "https://www.microsoft.com/en-us/p/abc123xyz789")],
            )
    }

    #[test]
    fn disambiguate_candidates() {
        let one = vec!["a".to_owned()];
        let two = vec!["a".to_owned(), "b".to_owned()];

        assert_eq!(disambiguate(&[], &[]), Choice::NoMatch);
        assert_eq!(disambiguate(&["a"], &[]), Choice::NoMatch);
        assert_eq!(disambiguate(&[], &one), Choice::Candidate("a".to_owned()));
        assert_eq!(disambiguate(&[], &two), Choice::Ambiguous);
        assert_eq!(disambiguate(&["b"], &two), Choice::Candidate("b".to_owned()));
        assert_eq!(disambiguate(&["a", "b"], &two), Choice::Ambiguous);
        assert_eq!(disambiguate(&["c"], &one), Choice::Conflict);
    }

    #[test]
    fn new_rejects_unsupported_matching_property() {
        let kb = FakeKnowledgeBase::default();
        let db = FakeGameDatabase::default();

        let mut config = SeekerConfig::rawg();
        config.matching_property = Some("P9968".to_owned());
        assert!(matches!(
            Reconciler::new(config, &kb, &db),
            Err(Status::InvalidArgument(_))
        ));

        let mut config = SeekerConfig::rawg();
        config.matching_property = Some("P5885".to_owned());
        assert!(Reconciler::new(config, &kb, &db).is_ok());
    }

    #[test]
    fn query_filters_on_matching_and_database_properties() {
        let kb = FakeKnowledgeBase::default();
        let db = FakeGameDatabase::default();
        let mut config = SeekerConfig::rawg();
        config.matching_property = Some("P2725".to_owned());

        let query = Reconciler::new(config, &kb, &db).unwrap().query();
        assert!(query.contains("?item wdt:P2725 []"));
        assert!(query.contains("FILTER NOT EXISTS { ?item wdt:P9968 [] }"));
    }

    #[tokio::test]
    async fn steam_seed_imports_microsoft_store_id() {
        let kb = FakeKnowledgeBase::default();
        let db = l4d2_database();
        let reconciler = Reconciler::new(SeekerConfig::rawg(), &kb, &db).unwrap();

        let mut entity = entity_with("Q104196", &[("P1733", "220")]);
        let outcome = reconciler.reconcile(&mut entity).await.unwrap();

        assert_eq!(
            outcome,
            SeekOutcome::Linked {
                candidate: "left-4-dead-2".to_owned(),
                database_claim_added: true,
                added: vec![("P5885".to_owned(), "abc123xyz789".to_owned())],
                skipped: vec![],
            }
        );
        assert_eq!(entity.values("P5885"), vec!["abc123xyz789"]);
        assert_eq!(entity.values("P9968"), vec!["left-4-dead-2"]);
        assert_eq!(db.searches(), vec![("220".to_owned(), 1, 3)]);
        assert_eq!(
            kb.writes(),
            vec![
                (
                    "Q104196".to_owned(),
                    "P9968".to_owned(),
                    ClaimValue::String("left-4-dead-2".to_owned())
                ),
                (
                    "Q104196".to_owned(),
                    "P5885".to_owned(),
                    ClaimValue::String("abc123xyz789".to_owned())
                ),
            ]
        );
        assert!(kb.summaries()[1].contains("left-4-dead-2"));
    }

    #[tokio::test]
    async fn no_candidates_adds_nothing() {
        let kb = FakeKnowledgeBase::default();
        let db = FakeGameDatabase::default().with_search("220", vec![]);
        let reconciler = Reconciler::new(SeekerConfig::rawg(), &kb, &db).unwrap();

        let mut entity = entity_with("Q104196", &[("P1733", "220")]);
        assert_eq!(
            reconciler.reconcile(&mut entity).await,
            Ok(SeekOutcome::NoMatch)
        );
        assert!(kb.writes().is_empty());
    }

    #[tokio::test]
    async fn two_candidates_are_never_guessed() {
        let kb = FakeKnowledgeBase::default();
        let db = l4d2_database().with_search("220", vec!["left-4-dead-2", "left-4-dead"]);
        let reconciler = Reconciler::new(SeekerConfig::rawg(), &kb, &db).unwrap();

        let mut entity = entity_with("Q104196", &[("P1733", "220")]);
        assert_eq!(
            reconciler.reconcile(&mut entity).await,
            Ok(SeekOutcome::Ambiguous(vec![
                "left-4-dead-2".to_owned(),
                "left-4-dead".to_owned()
            ]))
        );
        assert!(kb.writes().is_empty());
        assert!(db.fetched().is_empty());
    }

    #[tokio::test]
    async fn existing_database_id_disambiguates() {
        let kb = FakeKnowledgeBase::default();
        let db = l4d2_database().with_search("220", vec!["left-4-dead", "left-4-dead-2"]);
        let reconciler = Reconciler::new(SeekerConfig::rawg(), &kb, &db).unwrap();

        let mut entity = entity_with(
            "Q104196",
            &[("P1733", "220"), ("P9968", "left-4-dead-2")],
        );
        let outcome = reconciler.reconcile(&mut entity).await.unwrap();

        assert!(matches!(
            outcome,
            SeekOutcome::Linked {
                database_claim_added: false,
                ..
            }
        ));
        assert_eq!(db.fetched(), vec!["left-4-dead-2".to_owned()]);
        assert_eq!(kb.writes().len(), 1);
        assert_eq!(entity.values("P9968"), vec!["left-4-dead-2"]);
    }

    #[tokio::test]
    async fn existing_value_is_never_overwritten() {
        let kb = FakeKnowledgeBase::default();
        let db = FakeGameDatabase::default()
            .with_search("220", vec!["left-4-dead-2"])
            .with_links(
                "left-4-dead-2",
                vec![link(2, "https://www.microsoft.com/en-us/p/xyz2xyz2xyz2")],
            );
        let reconciler = Reconciler::new(SeekerConfig::rawg(), &kb, &db).unwrap();

        let mut entity = entity_with("Q104196", &[("P1733", "220"), ("P5885", "xyz")]);
        let outcome = reconciler.reconcile(&mut entity).await.unwrap();

        assert_eq!(
            outcome,
            SeekOutcome::Linked {
                candidate: "left-4-dead-2".to_owned(),
                database_claim_added: true,
                added: vec![],
                skipped: vec!["P5885".to_owned()],
            }
        );
        assert_eq!(entity.values("P5885"), vec!["xyz"]);
        assert!(kb.writes().iter().all(|(_, property, _)| property != "P5885"));
    }

    #[tokio::test]
    async fn contradicting_seed_is_a_mismatch() {
        let kb = FakeKnowledgeBase::default();
        let db = FakeGameDatabase::default()
            .with_search("220", vec!["half-life-2"])
            .with_links(
                "half-life-2",
                vec![link(1, "https://store.steampowered.com/app/221/")],
            );
        let reconciler = Reconciler::new(SeekerConfig::rawg(), &kb, &db).unwrap();

        let mut entity = entity_with("Q104196", &[("P1733", "220")]);
        assert_eq!(
            reconciler.reconcile(&mut entity).await,
            Ok(SeekOutcome::Mismatch {
                candidate: "half-life-2".to_owned(),
                found: "221".to_owned(),
            })
        );
        assert!(kb.writes().is_empty());
    }

    #[tokio::test]
    async fn matching_seed_is_kept_as_is() {
        let kb = FakeKnowledgeBase::default();
        let db = FakeGameDatabase::default()
            .with_search("220", vec!["half-life-2"])
            .with_links(
                "half-life-2",
                vec![
                    link(1, "https://store.steampowered.com/app/220/"),
                    link(5, "https://www.gog.com/game/half_life_2"),
                ],
            );
        let reconciler = Reconciler::new(SeekerConfig::rawg(), &kb, &db).unwrap();

        let mut entity = entity_with("Q18951", &[("P1733", "220")]);
        let outcome = reconciler.reconcile(&mut entity).await.unwrap();

        assert_eq!(
            outcome,
            SeekOutcome::Linked {
                candidate: "half-life-2".to_owned(),
                database_claim_added: true,
                added: vec![("P2725".to_owned(), "game/half_life_2".to_owned())],
                skipped: vec!["P1733".to_owned()],
            }
        );
        assert_eq!(entity.values("P1733"), vec!["220"]);
    }

    #[tokio::test]
    async fn falls_back_to_default_matching_property() {
        let kb = FakeKnowledgeBase::default();
        let db = l4d2_database();
        let mut config = SeekerConfig::rawg();
        config.matching_property = Some("P2725".to_owned());
        let reconciler = Reconciler::new(config, &kb, &db).unwrap();

        let mut entity = entity_with("Q104196", &[("P1733", "220")]);
        let outcome = reconciler.reconcile(&mut entity).await.unwrap();

        assert!(matches!(outcome, SeekOutcome::Linked { .. }));
        assert_eq!(db.searches(), vec![("220".to_owned(), 1, 3)]);
    }

    #[tokio::test]
    async fn prefers_configured_matching_property() {
        let kb = FakeKnowledgeBase::default();
        let db = FakeGameDatabase::default().with_search("game/half_life_2", vec![]);
        let mut config = SeekerConfig::rawg();
        config.matching_property = Some("P2725".to_owned());
        let reconciler = Reconciler::new(config, &kb, &db).unwrap();

        let mut entity = entity_with(
            "Q18951",
            &[("P1733", "220"), ("P2725", "game/half_life_2")],
        );
        assert_eq!(
            reconciler.reconcile(&mut entity).await,
            Ok(SeekOutcome::NoMatch)
        );
        assert_eq!(db.searches(), vec![("game/half_life_2".to_owned(), 5, 3)]);
    }

    #[tokio::test]
    async fn entity_without_matching_property_is_skipped() {
        let kb = FakeKnowledgeBase::default();
        let db = FakeGameDatabase::default();
        let reconciler = Reconciler::new(SeekerConfig::rawg(), &kb, &db).unwrap();

        let mut entity = entity_with("Q1", &[("P5944", "UP0001-CUSA00001_00-0000000000000001")]);
        assert_eq!(
            reconciler.reconcile(&mut entity).await,
            Ok(SeekOutcome::NoMatchingProperty)
        );
        assert!(db.searches().is_empty());
    }

    #[tokio::test]
    async fn search_unavailable_is_entity_local_error() {
        let kb = FakeKnowledgeBase::default();
        let db = FakeGameDatabase::default()
            .with_search_error("220", Status::unavailable("503"));
        let reconciler = Reconciler::new(SeekerConfig::rawg(), &kb, &db).unwrap();

        let mut entity = entity_with("Q104196", &[("P1733", "220")]);
        assert!(matches!(
            reconciler.reconcile(&mut entity).await,
            Err(Status::Unavailable(_))
        ));
        assert!(kb.writes().is_empty());
    }
}
