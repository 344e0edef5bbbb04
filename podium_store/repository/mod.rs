mod rank_repository;
mod score_repository;

pub use rank_repository::InMemoryRankRepository;
pub use score_repository::InMemoryScoreRepository;
