use std::collections::{BTreeMap, HashMap};

use super::record::{Edge, EntityId, ScoreRecord, Transition};

/// Folds collected score records into the aggregated edge table.
///
/// The fold is a strict one-way pipeline: group by entity, pair adjacent
/// records, label, aggregate, sort. No entity influences another except
/// through the shared aggregation counters.
pub struct Transformer {
    period_label: String,
}

impl Transformer {
    pub fn new(period_label: impl Into<String>) -> Self {
        Self {
            period_label: period_label.into(),
        }
    }

    /// Pair each record with the next record of the same entity.
    ///
    /// Entities keep their first-seen order and records keep their source
    /// order within an entity; periods are not re-sorted. An entity with a
    /// single record contributes nothing.
    pub fn transitions(records: &[ScoreRecord]) -> Vec<Transition> {
        let mut order: Vec<EntityId> = Vec::new();
        let mut groups: HashMap<EntityId, Vec<&ScoreRecord>> = HashMap::new();

        for rec in records {
            let id = rec.entity_id;
            groups
                .entry(id)
                .or_insert_with(|| {
                    order.push(id);
                    Vec::new()
                })
                .push(rec);
        }

        let mut out = Vec::new();
        for id in order {
            for pair in groups[&id].windows(2) {
                out.push(Transition {
                    entity_id: id,
                    period: pair[0].period,
                    score: pair[0].score,
                    next_period: pair[1].period,
                    next_score: pair[1].score,
                });
            }
        }
        out
    }

    /// Aggregate transitions into weighted edges.
    ///
    /// The key is the numeric `(score, next_score)` pair, so transitions
    /// from different periods that share the same scores collapse into one
    /// edge; the first transition encountered names it. The `BTreeMap`
    /// doubles as the sort: edges come out ascending by key.
    pub fn aggregate(&self, transitions: &[Transition]) -> Vec<Edge> {
        let mut agg: BTreeMap<(i32, i32), Edge> = BTreeMap::new();

        for t in transitions {
            agg.entry(t.key())
                .and_modify(|e| e.weight += 1)
                .or_insert_with(|| Edge {
                    from_label: t.from_label(&self.period_label),
                    to_label: t.to_label(&self.period_label),
                    weight: 1,
                });
        }

        agg.into_values().collect()
    }

    /// Full fold: records → transitions → sorted edge table.
    pub fn edges(&self, records: &[ScoreRecord]) -> Vec<Edge> {
        self.aggregate(&Self::transitions(records))
    }
}
