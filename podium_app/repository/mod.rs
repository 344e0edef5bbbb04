mod rank_repository;
mod score_repository;

pub use rank_repository::RankRepository;
pub use score_repository::ScoreRepository;
