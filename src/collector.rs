//! Collection stage: roster fetch, fan-out over entities, schema mapping.
//!
//! The sequential [`collect`] works over any [`ScoreSource`] and is what the
//! demo and the tests use. [`collect_bounded`] runs the per-entity detail
//! requests concurrently on the HTTP client with a semaphore cap and then
//! restores roster order, so both paths produce identical output.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::api::{ApiError, RoundScore, ScoreSource, StatsClient};
use crate::config::SourceConfig;
use crate::error::PipelineError;
use crate::flow::{EntityId, ScoreRecord};
use crate::ui::FetchProgress;

/// Collection policy, resolved from the config file and CLI flags.
#[derive(Debug, Clone)]
pub struct CollectOptions {
    /// Truncate the deduplicated roster to this many entities.
    pub limit: Option<usize>,
    /// Record entities whose detail request failed instead of aborting.
    pub skip_failed: bool,
    /// Concurrent detail requests on the bounded path.
    pub max_in_flight: usize,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            limit: None,
            skip_failed: false,
            max_in_flight: 4,
        }
    }
}

impl From<&SourceConfig> for CollectOptions {
    fn from(cfg: &SourceConfig) -> Self {
        Self {
            limit: cfg.limit,
            skip_failed: cfg.skip_failed,
            max_in_flight: cfg.max_in_flight,
        }
    }
}

/// What a collection run produced.
#[derive(Debug, Clone)]
pub struct Collection {
    /// Flat score table, entity-contiguous, entities in roster order.
    pub records: Vec<ScoreRecord>,
    /// Roster size after dedup and the limit.
    pub roster_len: usize,
    /// Entities dropped under the skip-failed policy, in roster order.
    pub skipped: Vec<EntityId>,
}

/// Dedup the roster keeping the first occurrence, then apply the limit.
fn prepare_roster(mut ids: Vec<EntityId>, limit: Option<usize>) -> Vec<EntityId> {
    let mut seen = HashSet::new();
    ids.retain(|id| seen.insert(*id));
    if let Some(limit) = limit {
        ids.truncate(limit);
    }
    ids
}

fn map_rows(id: EntityId, rows: Vec<RoundScore>) -> impl Iterator<Item = ScoreRecord> {
    rows.into_iter()
        .map(move |row| ScoreRecord::new(id, row.round, row.total_points))
}

/// Folds one entity's fetch outcome into the running collection.
///
/// Returns the error unchanged when the skip policy is off, so the caller
/// aborts on the first failing entity.
fn absorb_outcome(
    id: EntityId,
    outcome: Result<Vec<RoundScore>, ApiError>,
    opts: &CollectOptions,
    progress: Option<&FetchProgress>,
    records: &mut Vec<ScoreRecord>,
    skipped: &mut Vec<EntityId>,
) -> Result<(), PipelineError> {
    match outcome {
        Ok(rows) => records.extend(map_rows(id, rows)),
        Err(err) if opts.skip_failed => {
            if let Some(p) = progress {
                p.warn_skip(id, &err.to_string());
            }
            skipped.push(id);
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

/// Sequential collection over any source.
pub async fn collect<S: ScoreSource>(
    source: &S,
    opts: &CollectOptions,
    progress: Option<&FetchProgress>,
) -> Result<Collection, PipelineError> {
    let roster = prepare_roster(source.roster().await?, opts.limit);
    if roster.is_empty() {
        return Err(PipelineError::EmptyRoster);
    }
    if let Some(p) = progress {
        p.roster_ready(roster.len() as u64);
    }

    let mut records = Vec::new();
    let mut skipped = Vec::new();
    for id in roster.iter().copied() {
        let outcome = source.history(id).await;
        absorb_outcome(id, outcome, opts, progress, &mut records, &mut skipped)?;
        if let Some(p) = progress {
            p.entity_done();
        }
    }

    Ok(Collection {
        records,
        roster_len: roster.len(),
        skipped,
    })
}

/// Bounded-concurrency collection on the HTTP client.
///
/// Detail requests run as spawned tasks gated by a semaphore. Outcomes are
/// slotted back into roster order before folding, so record order and the
/// error reported on failure match the sequential path.
pub async fn collect_bounded(
    client: &StatsClient,
    opts: &CollectOptions,
    progress: Option<&FetchProgress>,
) -> Result<Collection, PipelineError> {
    let roster = prepare_roster(client.roster().await?, opts.limit);
    if roster.is_empty() {
        return Err(PipelineError::EmptyRoster);
    }
    if let Some(p) = progress {
        p.roster_ready(roster.len() as u64);
    }

    let semaphore = Arc::new(Semaphore::new(opts.max_in_flight));
    let mut tasks: JoinSet<(usize, Result<Vec<RoundScore>, ApiError>)> = JoinSet::new();
    for (idx, id) in roster.iter().copied().enumerate() {
        let client = client.clone();
        let semaphore = Arc::clone(&semaphore);
        tasks.spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .expect("semaphore closed while collecting");
            (idx, client.history(id).await)
        });
    }

    let mut slots: Vec<Option<Result<Vec<RoundScore>, ApiError>>> =
        (0..roster.len()).map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        let (idx, outcome) = joined.expect("history task panicked");
        slots[idx] = Some(outcome);
        if let Some(p) = progress {
            p.entity_done();
        }
    }

    let mut records = Vec::new();
    let mut skipped = Vec::new();
    for (idx, id) in roster.iter().copied().enumerate() {
        let outcome = slots[idx].take().expect("missing fan-out slot");
        absorb_outcome(id, outcome, opts, progress, &mut records, &mut skipped)?;
    }

    Ok(Collection {
        records,
        roster_len: roster.len(),
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Source with canned data and configurable failures.
    struct MockSource {
        roster: Vec<EntityId>,
        histories: HashMap<EntityId, Vec<RoundScore>>,
        fail_ids: Vec<EntityId>,
    }

    impl MockSource {
        fn new(roster: Vec<EntityId>) -> Self {
            Self {
                roster,
                histories: HashMap::new(),
                fail_ids: Vec::new(),
            }
        }

        fn with_history(mut self, id: EntityId, rows: &[(u32, i32)]) -> Self {
            let rows = rows
                .iter()
                .map(|&(round, total_points)| RoundScore {
                    round,
                    total_points,
                })
                .collect();
            self.histories.insert(id, rows);
            self
        }

        fn failing(mut self, id: EntityId) -> Self {
            self.fail_ids.push(id);
            self
        }
    }

    impl ScoreSource for MockSource {
        async fn roster(&self) -> Result<Vec<EntityId>, ApiError> {
            Ok(self.roster.clone())
        }

        async fn history(&self, id: EntityId) -> Result<Vec<RoundScore>, ApiError> {
            if self.fail_ids.contains(&id) {
                return Err(ApiError::Status {
                    url: format!("mock://entity/{id}"),
                    status: 500,
                    message: "mock failure".to_string(),
                });
            }
            Ok(self.histories.get(&id).cloned().unwrap_or_default())
        }
    }

    #[tokio::test]
    async fn maps_rows_into_entity_contiguous_records() {
        let source = MockSource::new(vec![7, 9])
            .with_history(7, &[(1, 5), (2, 3)])
            .with_history(9, &[(1, 0)]);

        let collection = collect(&source, &CollectOptions::default(), None)
            .await
            .unwrap();

        assert_eq!(collection.roster_len, 2);
        assert!(collection.skipped.is_empty());
        assert_eq!(
            collection.records,
            vec![
                ScoreRecord::new(7, 1, 5),
                ScoreRecord::new(7, 2, 3),
                ScoreRecord::new(9, 1, 0),
            ]
        );
    }

    #[tokio::test]
    async fn preserves_source_row_order_within_entity() {
        let source = MockSource::new(vec![1]).with_history(1, &[(3, 1), (1, 2)]);

        let collection = collect(&source, &CollectOptions::default(), None)
            .await
            .unwrap();

        assert_eq!(
            collection.records,
            vec![ScoreRecord::new(1, 3, 1), ScoreRecord::new(1, 1, 2)]
        );
    }

    #[tokio::test]
    async fn dedups_roster_keeping_first_occurrence() {
        let source = MockSource::new(vec![1, 2, 1]).with_history(1, &[(1, 4)]);

        let collection = collect(&source, &CollectOptions::default(), None)
            .await
            .unwrap();

        assert_eq!(collection.roster_len, 2);
        assert_eq!(collection.records, vec![ScoreRecord::new(1, 1, 4)]);
    }

    #[tokio::test]
    async fn limit_truncates_the_roster() {
        let source = MockSource::new(vec![1, 2, 3])
            .with_history(1, &[(1, 1)])
            .with_history(2, &[(1, 2)])
            .with_history(3, &[(1, 3)]);
        let opts = CollectOptions {
            limit: Some(2),
            ..CollectOptions::default()
        };

        let collection = collect(&source, &opts, None).await.unwrap();

        assert_eq!(collection.roster_len, 2);
        assert_eq!(
            collection.records,
            vec![ScoreRecord::new(1, 1, 1), ScoreRecord::new(2, 1, 2)]
        );
    }

    #[tokio::test]
    async fn empty_roster_is_fatal() {
        let source = MockSource::new(vec![]);

        let err = collect(&source, &CollectOptions::default(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::EmptyRoster));
    }

    #[tokio::test]
    async fn detail_failure_aborts_by_default() {
        let source = MockSource::new(vec![1, 2, 3])
            .with_history(1, &[(1, 1)])
            .failing(2);

        let err = collect(&source, &CollectOptions::default(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Api(ApiError::Status { .. })));
    }

    #[tokio::test]
    async fn detail_failure_recorded_when_skip_enabled() {
        let source = MockSource::new(vec![1, 2, 3])
            .with_history(1, &[(1, 1)])
            .failing(2)
            .with_history(3, &[(1, 3)]);
        let opts = CollectOptions {
            skip_failed: true,
            ..CollectOptions::default()
        };

        let collection = collect(&source, &opts, None).await.unwrap();

        assert_eq!(collection.skipped, vec![2]);
        assert_eq!(
            collection.records,
            vec![ScoreRecord::new(1, 1, 1), ScoreRecord::new(3, 1, 3)]
        );
    }

    #[tokio::test]
    async fn entity_without_rows_contributes_nothing() {
        let source = MockSource::new(vec![1, 2]).with_history(2, &[(1, 6)]);

        let collection = collect(&source, &CollectOptions::default(), None)
            .await
            .unwrap();

        assert!(collection.skipped.is_empty());
        assert_eq!(collection.records, vec![ScoreRecord::new(2, 1, 6)]);
    }

    #[test]
    fn options_resolve_from_source_config() {
        let cfg = SourceConfig {
            limit: Some(5),
            skip_failed: true,
            max_in_flight: 2,
            ..SourceConfig::default()
        };

        let opts = CollectOptions::from(&cfg);

        assert_eq!(opts.limit, Some(5));
        assert!(opts.skip_failed);
        assert_eq!(opts.max_in_flight, 2);
    }
}
