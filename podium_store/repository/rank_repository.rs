use std::sync::Arc;
use tokio::sync::Mutex;

use podium_app::repository::RankRepository;
use podium_types::{
    Result,
    common::{PlayerId, RankedPlayer, Score},
    errors::{ApplicationError, StoreError},
};

use crate::uow::{Transaction, Undo};

/// Implements RankRepository and operates on a unit of work.
#[derive(Clone)]
pub struct InMemoryRankRepository<'a> {
    tx: Arc<Mutex<Transaction<'a>>>,
}

impl<'a> InMemoryRankRepository<'a> {
    pub(crate) fn new(tx: Arc<Mutex<Transaction<'a>>>) -> Self {
        Self { tx }
    }
}

#[async_trait::async_trait]
impl<'a> RankRepository for InMemoryRankRepository<'a> {
    async fn upsert(&self, player_id: PlayerId, score: Score) -> Result<(), ApplicationError> {
        let mut tx = self.tx.lock().await;
        let state = tx.state_mut()?;

        let previous = state.index.score_of(player_id);
        state.index.upsert(player_id, score);
        tx.record(Undo::Rank {
            player_id,
            previous,
        });

        Ok(())
    }

    async fn top(&self, limit: usize) -> Result<Vec<RankedPlayer>, ApplicationError> {
        let tx = self.tx.lock().await;
        Ok(tx.state().index.top_k(limit))
    }

    async fn rank_of(&self, player_id: PlayerId) -> Result<RankedPlayer, ApplicationError> {
        let tx = self.tx.lock().await;
        let index = &tx.state().index;

        let total_score = index
            .score_of(player_id)
            .ok_or(StoreError::PlayerNotFound(player_id))?;
        let rank = index.rank_of(player_id).ok_or(StoreError::IndexOutOfSync {
            scores: tx.state().scores.len(),
            ranked: index.len(),
        })?;

        Ok(RankedPlayer {
            player_id,
            total_score,
            rank,
        })
    }

    async fn count(&self) -> Result<usize, ApplicationError> {
        let tx = self.tx.lock().await;
        Ok(tx.state().index.len())
    }
}
