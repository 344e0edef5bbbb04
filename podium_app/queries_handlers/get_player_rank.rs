use async_trait::async_trait;
use std::sync::Arc;

use podium_types::errors::{ApplicationError, ErrorKind, StoreError};

use crate::{
    config::Config,
    cqrs::{Query, QueryHandler, queries::GetPlayerRank},
    uow::UnitOfWork,
};

pub struct GetPlayerRankHandler {}

impl GetPlayerRankHandler {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl QueryHandler<GetPlayerRank> for GetPlayerRankHandler {
    async fn handle(
        &self,
        query: GetPlayerRank,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        config: &Arc<Config>,
    ) -> Result<<GetPlayerRank as Query>::Output, ApplicationError> {
        let player_id = query.player_id;
        config.check_player_id(player_id)?;

        let stored = found(uow.scores().get(player_id).await)?;
        let ranked = found(uow.ranks().rank_of(player_id).await)?;

        match (stored, ranked) {
            (None, None) => Err(StoreError::PlayerNotFound(player_id).into()),
            (Some(record), Some(entry)) if record.total_score == entry.total_score => Ok(entry),
            (stored, ranked) => Err(StoreError::PlayerOutOfSync {
                player_id,
                stored: stored.map(|r| r.total_score),
                ranked: ranked.map(|r| r.total_score),
            }
            .into()),
        }
    }
}

/// Turns a not found error into `None`, keeping any other error.
fn found<T>(result: Result<T, ApplicationError>) -> Result<Option<T>, ApplicationError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use podium_types::{
        Result,
        common::{PlayerId, RankedPlayer},
    };

    use super::*;
    use crate::{test_utils::MockUnitOfWorkProvider, uow::UnitOfWorkProvider};

    async fn rank(provider: &MockUnitOfWorkProvider, player_id: PlayerId) -> Result<RankedPlayer> {
        let uow = provider.begin_read().await?;
        GetPlayerRankHandler::new()
            .handle(GetPlayerRank { player_id }, &uow, &Arc::new(Config::default()))
            .await
    }

    #[tokio::test]
    async fn test_player_rank() -> Result<()> {
        let provider = MockUnitOfWorkProvider::new();
        provider.seed(&[(7, 50), (8, 100)]);

        assert_eq!(
            rank(&provider, 7).await?,
            RankedPlayer {
                player_id: 7,
                total_score: 50,
                rank: 2
            }
        );
        assert_eq!(rank(&provider, 8).await?.rank, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_player() {
        let provider = MockUnitOfWorkProvider::new();
        provider.seed(&[(7, 50)]);

        let result = rank(&provider, 999).await;
        assert!(matches!(
            result,
            Err(ApplicationError::Store(StoreError::PlayerNotFound(999)))
        ));
    }

    #[tokio::test]
    async fn test_rejects_out_of_range_ids() {
        let provider = MockUnitOfWorkProvider::new();

        for player_id in [0, -1, 1_000_001] {
            let err = rank(&provider, player_id).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput);
        }
    }

    #[tokio::test]
    async fn test_diverged_structures_are_internal_errors() {
        let provider = MockUnitOfWorkProvider::new();
        provider.seed(&[(7, 50)]);
        provider.seed_index_only(8, 70);

        let result = rank(&provider, 8).await;
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(matches!(
            err,
            ApplicationError::Store(StoreError::PlayerOutOfSync {
                player_id: 8,
                stored: None,
                ranked: Some(70)
            })
        ));
    }
}
