pub mod aggregation;
pub mod rank_index;
pub mod score_store;

pub use aggregation::AggregationPolicy;
pub use rank_index::RankIndex;
pub use score_store::{PlayerScore, ScoreStore};
