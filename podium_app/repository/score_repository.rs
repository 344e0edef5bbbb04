use podium_ranking::PlayerScore;
use podium_types::{
    common::{GameMode, PlayerId, Score},
    errors::ApplicationError,
};

#[async_trait::async_trait]
pub trait ScoreRepository: Send + Sync {
    /// Aggregates a score contribution into the player's total.
    /// Creates the player record on the first contribution.
    async fn upsert(
        &self,
        player_id: PlayerId,
        contribution: Score,
        mode: GameMode,
    ) -> Result<PlayerScore, ApplicationError>;

    /// Returns a player record by id.
    async fn get(&self, player_id: PlayerId) -> Result<PlayerScore, ApplicationError>;

    /// Number of players with at least one accepted submission.
    async fn count(&self) -> Result<usize, ApplicationError>;
}
