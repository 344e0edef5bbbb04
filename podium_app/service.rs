use std::sync::Arc;

use podium_types::{
    Result,
    common::{GameMode, PlayerId, RankedPlayer, Score},
};

use crate::{
    app::AppBus,
    command_handlers::SubmitScoreCommandHandler,
    cqrs::{
        commands::SubmitScore,
        queries::{GetPlayerRank, GetTopPlayers},
    },
    queries_handlers::{GetPlayerRankHandler, GetTopPlayersHandler},
};

/// Acknowledgement returned for every accepted submission.
pub const SUBMIT_ACK: &str = "Score submitted successfully";

/// The leaderboard operations, dispatched through the [`AppBus`].
#[derive(Clone)]
pub struct LeaderboardService {
    app_bus: Arc<AppBus>,
}

impl LeaderboardService {
    pub fn new(app_bus: Arc<AppBus>) -> Self {
        Self { app_bus }
    }

    /// Adds one played session to a player's total.
    pub async fn submit_score(
        &self,
        player_id: PlayerId,
        score: Score,
        mode: GameMode,
    ) -> Result<&'static str> {
        self.app_bus
            .execute(
                SubmitScore::new(player_id, score, mode),
                SubmitScoreCommandHandler::new(),
            )
            .await?;

        Ok(SUBMIT_ACK)
    }

    /// Best ranked players. `None` uses the configured default size.
    pub async fn get_top(&self, n: Option<i64>) -> Result<Vec<RankedPlayer>> {
        let limit = n.unwrap_or(self.app_bus.config().top_default);

        self.app_bus
            .query(GetTopPlayers { limit }, GetTopPlayersHandler::new())
            .await
    }

    pub async fn get_rank(&self, player_id: PlayerId) -> Result<RankedPlayer> {
        self.app_bus
            .query(GetPlayerRank { player_id }, GetPlayerRankHandler::new())
            .await
    }
}

#[cfg(test)]
mod tests {
    use podium_types::errors::{AppError, ApplicationError, StoreError};

    use super::*;
    use crate::{config::Config, test_utils::MockUnitOfWorkProvider};

    fn service_with(config: Config) -> LeaderboardService {
        let provider = Arc::new(MockUnitOfWorkProvider::new());
        LeaderboardService::new(Arc::new(AppBus::new(Arc::new(config), provider)))
    }

    #[tokio::test]
    async fn test_two_players_scenario() -> Result<()> {
        let service = service_with(Config::default());

        assert_eq!(service.submit_score(7, 50, GameMode::Solo).await?, SUBMIT_ACK);
        assert_eq!(
            service.get_rank(7).await?,
            RankedPlayer {
                player_id: 7,
                total_score: 50,
                rank: 1
            }
        );

        service.submit_score(8, 100, GameMode::Team).await?;
        assert_eq!(service.get_rank(7).await?.rank, 2);
        assert_eq!(
            service.get_top(Some(10)).await?,
            vec![
                RankedPlayer {
                    player_id: 8,
                    total_score: 100,
                    rank: 1
                },
                RankedPlayer {
                    player_id: 7,
                    total_score: 50,
                    rank: 2
                },
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_default_top_size() -> Result<()> {
        let service = service_with(Config {
            top_default: 2,
            ..Config::default()
        });
        for player_id in 1..=5 {
            service
                .submit_score(player_id, player_id * 10, GameMode::Solo)
                .await?;
        }

        let top = service.get_top(None).await?;
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].player_id, 5);
        Ok(())
    }

    #[tokio::test]
    async fn test_errors() {
        let service = service_with(Config::default());

        assert!(matches!(
            service.submit_score(0, 10, GameMode::Solo).await,
            Err(ApplicationError::App(AppError::InvalidPlayerId(0)))
        ));
        assert!(matches!(
            service.get_rank(999).await,
            Err(ApplicationError::Store(StoreError::PlayerNotFound(999)))
        ));
    }
}
