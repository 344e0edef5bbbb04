use std::sync::Arc;
use tokio::sync::Mutex;

use podium_app::repository::ScoreRepository;
use podium_ranking::PlayerScore;
use podium_types::{
    Result,
    common::{GameMode, PlayerId, Score},
    errors::ApplicationError,
};

use crate::uow::{Transaction, Undo};

/// Implements ScoreRepository and operates on a unit of work.
#[derive(Clone)]
pub struct InMemoryScoreRepository<'a> {
    tx: Arc<Mutex<Transaction<'a>>>,
}

impl<'a> InMemoryScoreRepository<'a> {
    pub(crate) fn new(tx: Arc<Mutex<Transaction<'a>>>) -> Self {
        Self { tx }
    }
}

#[async_trait::async_trait]
impl<'a> ScoreRepository for InMemoryScoreRepository<'a> {
    async fn upsert(
        &self,
        player_id: PlayerId,
        contribution: Score,
        mode: GameMode,
    ) -> Result<PlayerScore, ApplicationError> {
        let mut tx = self.tx.lock().await;
        let state = tx.state_mut()?;

        let previous = state.scores.get(player_id).ok();
        let record = state.scores.upsert(player_id, contribution, mode)?;
        tx.record(Undo::Score {
            player_id,
            previous,
        });

        Ok(record)
    }

    async fn get(&self, player_id: PlayerId) -> Result<PlayerScore, ApplicationError> {
        let tx = self.tx.lock().await;
        Ok(tx.state().scores.get(player_id)?)
    }

    async fn count(&self) -> Result<usize, ApplicationError> {
        let tx = self.tx.lock().await;
        Ok(tx.state().scores.len())
    }
}
