use podium_types::{
    common::{PlayerId, RankedPlayer, Score},
    errors::ApplicationError,
};

#[async_trait::async_trait]
pub trait RankRepository: Send + Sync {
    /// Moves a player to a new score, replacing any previous entry.
    async fn upsert(&self, player_id: PlayerId, score: Score) -> Result<(), ApplicationError>;

    /// Returns up to `limit` players in rank order.
    async fn top(&self, limit: usize) -> Result<Vec<RankedPlayer>, ApplicationError>;

    /// Returns the rank entry of a player.
    async fn rank_of(&self, player_id: PlayerId) -> Result<RankedPlayer, ApplicationError>;

    /// Number of ranked players.
    async fn count(&self) -> Result<usize, ApplicationError>;
}
