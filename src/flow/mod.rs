mod record;
mod transform;

pub use record::{Edge, EntityId, ScoreRecord, Transition};
pub use transform::Transformer;
