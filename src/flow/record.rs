use serde::{Deserialize, Serialize};

/// Identifier of a tracked subject in the source API (a player, in the
/// default data source).
pub type EntityId = u32;

/// One observed (entity, period, score) data point.
///
/// Records are immutable once collected and are kept per entity in the
/// order the source returned them, which is not guaranteed to be
/// monotonic by period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub entity_id: EntityId,
    pub period: u32,
    pub score: i32,
}

impl ScoreRecord {
    pub fn new(entity_id: EntityId, period: u32, score: i32) -> Self {
        Self {
            entity_id,
            period,
            score,
        }
    }
}

/// A score paired with the same entity's next observed score.
///
/// The last record of an entity has no successor and therefore yields no
/// transition, so a dangling half-pair can never reach aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub entity_id: EntityId,
    pub period: u32,
    pub score: i32,
    pub next_period: u32,
    pub next_score: i32,
}

impl Transition {
    /// Node label for the outgoing side, e.g. `"Round 3: 7"`.
    pub fn from_label(&self, prefix: &str) -> String {
        format!("{prefix} {}: {}", self.period, self.score)
    }

    /// Node label for the incoming side, e.g. `"Round 4: 2"`.
    pub fn to_label(&self, prefix: &str) -> String {
        format!("{prefix} {}: {}", self.next_period, self.next_score)
    }

    /// Aggregation key: the numeric score pair, not the labels.
    pub fn key(&self) -> (i32, i32) {
        (self.score, self.next_score)
    }
}

/// One aggregated row of the flow diagram: a directed, weighted pairing
/// of two labelled score states. This is the three-column contract the
/// renderer consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from_label: String,
    pub to_label: String,
    pub weight: u32,
}
