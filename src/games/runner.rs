use std::fmt;

use async_trait::async_trait;
use tracing::{info, info_span, warn, Instrument};

use crate::{documents::Entity, traits::KnowledgeBase, Status};

/// A bot workflow applied to one entity at a time.
#[async_trait]
pub trait EntityProcessor: Send + Sync {
    type Outcome: fmt::Display + Send;

    async fn process(&self, entity: &mut Entity) -> Result<Self::Outcome, Status>;
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub processed: usize,
    pub failed: usize,
}

/// Returns the explicitly requested `items`, or the result of `query` when
/// none were given, capped at `limit`.
pub async fn select_items<K: KnowledgeBase>(
    kb: &K,
    query: &str,
    items: Vec<String>,
    limit: Option<usize>,
) -> Result<Vec<String>, Status> {
    let mut items = match items.is_empty() {
        true => kb.query_items(query).await?,
        false => items,
    };
    if let Some(limit) = limit {
        items.truncate(limit);
    }
    info!("Selected {} items", items.len());
    Ok(items)
}

/// Processes `items` in order. Failures are logged and do not stop the run.
pub async fn run<K, P>(kb: &K, processor: &P, items: &[String]) -> RunSummary
where
    K: KnowledgeBase,
    P: EntityProcessor,
{
    let mut summary = RunSummary::default();
    for item in items {
        let result = async {
            let mut entity = kb.get_entity(item).await?;
            processor.process(&mut entity).await
        }
        .instrument(info_span!("entity", id = %item))
        .await;

        match result {
            Ok(outcome) => {
                info!("{item}: {outcome}");
                summary.processed += 1;
            }
            Err(status) => {
                warn!("{item}: {status}");
                summary.failed += 1;
            }
        }
    }

    info!(
        "Processed {} items, {} failed",
        summary.processed, summary.failed
    );
    summary
}
