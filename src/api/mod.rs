pub mod client;
pub mod error;
pub mod types;

pub use client::{
    DEFAULT_BASE_URL, DEFAULT_HISTORY_PATH, DEFAULT_ROSTER_PATH, ScoreSource, StatsClient,
};
pub use error::ApiError;
pub use types::{HistoryResponse, RosterEntry, RosterResponse, RoundScore};
